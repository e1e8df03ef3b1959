use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://portal.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_ICON_PATH: &str = "/icon-192.png";
pub const LOGO_PATH: &str = "/tsok-logo.png";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Where catalog documents are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite {
        database_url: String,
    },
    Remote {
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    },
}

#[derive(Clone)]
pub struct AppConfig {
    pub admin_password: String,
    pub store: StoreConfig,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store", &self.store)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Reads `PORTAL_*` variables, after loading `.env.local` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let admin_password =
            value("PORTAL_ADMIN_PASSWORD").ok_or(ConfigError::Missing("PORTAL_ADMIN_PASSWORD"))?;

        let store = match value("PORTAL_STORE_URL") {
            Some(base_url) => {
                let timeout_secs = match value("PORTAL_STORE_TIMEOUT_SECS") {
                    Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                        key: "PORTAL_STORE_TIMEOUT_SECS",
                        value: raw,
                    })?,
                    None => DEFAULT_STORE_TIMEOUT_SECS,
                };
                StoreConfig::Remote {
                    base_url,
                    token: value("PORTAL_STORE_TOKEN"),
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            None => StoreConfig::Sqlite {
                database_url: value("PORTAL_DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            },
        };

        let raw_bind = value("PORTAL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                key: "PORTAL_BIND_ADDR",
                value: raw_bind.clone(),
            })?;

        Ok(Self {
            admin_password,
            store,
            bind_addr,
        })
    }
}
