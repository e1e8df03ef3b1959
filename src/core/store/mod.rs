pub mod remote;
pub mod sqlite;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use remote::RemoteDocumentStore;
use sqlite::SqliteDocumentStore;

/// A stored document: the store-assigned id plus its field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("document not found")]
    NotFound,
}

/// Minimal contract of a hosted document database.
///
/// Ids are assigned by the store on insert. `update` replaces the whole field
/// set of an existing document. `list_ordered` returns every document of the
/// collection sorted by `sort_field`; documents with equal keys come back in
/// the store's natural (insertion) order.
pub trait DocumentStore: Send + Sync {
    fn insert(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        direction: SortDirection,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;
}

/// The concrete store selected at startup.
#[derive(Debug, Clone)]
pub enum CatalogBackend {
    Sqlite(SqliteDocumentStore),
    Remote(RemoteDocumentStore),
}

impl CatalogBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Remote(_) => "remote",
        }
    }
}

impl DocumentStore for CatalogBackend {
    async fn insert(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> Result<String, StoreError> {
        match self {
            Self::Sqlite(store) => store.insert(collection, fields).await,
            Self::Remote(store) => store.insert(collection, fields).await,
        }
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.update(collection, id, fields).await,
            Self::Remote(store) => store.update(collection, id, fields).await,
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.delete(collection, id).await,
            Self::Remote(store) => store.delete(collection, id).await,
        }
    }

    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        match self {
            Self::Sqlite(store) => store.list_ordered(collection, sort_field, direction).await,
            Self::Remote(store) => store.list_ordered(collection, sort_field, direction).await,
        }
    }
}

/// Sort fields are spliced into a JSON path or a query string, so only plain
/// identifiers are accepted.
pub(crate) fn validate_sort_field(sort_field: &str) -> Result<(), StoreError> {
    let valid = !sort_field.is_empty()
        && sort_field
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidSortField(sort_field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_accepts_plain_identifiers_only() {
        assert!(validate_sort_field("order").is_ok());
        assert!(validate_sort_field("is_new2").is_ok());
        assert!(matches!(
            validate_sort_field("order') --"),
            Err(StoreError::InvalidSortField(_))
        ));
        assert!(validate_sort_field("").is_err());
    }
}
