pub mod auth;
pub mod catalog;
pub mod config;
pub mod store;
pub mod view;

use config::{AppConfig, StoreConfig};
use store::remote::RemoteDocumentStore;
use store::sqlite::SqliteDocumentStore;
use store::{CatalogBackend, StoreError};

/// Opens the document store named by the configuration.
pub async fn connect_backend(config: &AppConfig) -> Result<CatalogBackend, StoreError> {
    match &config.store {
        StoreConfig::Sqlite { database_url } => {
            let store = SqliteDocumentStore::connect(database_url).await?;
            Ok(CatalogBackend::Sqlite(store))
        }
        StoreConfig::Remote {
            base_url,
            token,
            timeout,
        } => {
            let store = RemoteDocumentStore::new(base_url, token.clone(), *timeout)?;
            Ok(CatalogBackend::Remote(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::models::WebsiteFields;
    use crate::core::catalog::CatalogService;
    use std::time::Duration;

    fn config(store: StoreConfig) -> AppConfig {
        AppConfig {
            admin_password: "pw".to_string(),
            store,
            bind_addr: "127.0.0.1:0".parse().expect("address should parse"),
        }
    }

    #[tokio::test]
    async fn sqlite_config_yields_working_backend() {
        let backend = connect_backend(&config(StoreConfig::Sqlite {
            database_url: "sqlite::memory:".to_string(),
        }))
        .await
        .expect("backend should connect");
        assert_eq!(backend.name(), "sqlite");

        let catalog = CatalogService::new(backend);
        let id = catalog
            .create_entry(&WebsiteFields {
                title: "Foo".to_string(),
                description: "d".to_string(),
                url: "https://foo.test".to_string(),
                ..WebsiteFields::default()
            })
            .await
            .expect("create should succeed");
        let listed = catalog.list_entries().await.expect("list should succeed");
        assert_eq!(listed[0].id, id);
    }

    #[tokio::test]
    async fn remote_config_builds_client_without_connecting() {
        let backend = connect_backend(&config(StoreConfig::Remote {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            token: None,
            timeout: Duration::from_secs(1),
        }))
        .await
        .expect("client should build");
        assert_eq!(backend.name(), "remote");
    }
}
