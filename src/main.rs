use std::process::ExitCode;

use tracing::error;
use tsok_portal_lib::core::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    tsok_portal_lib::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = tsok_portal_lib::run(config).await {
        error!(%error, "portal stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
