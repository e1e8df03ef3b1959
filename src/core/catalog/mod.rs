pub mod filter;
pub mod models;

use tracing::{debug, info, warn};

use crate::core::store::{DocumentStore, SortDirection, StoreError};
use models::{ValidationError, WebsiteEntry, WebsiteFields, ORDER_FIELD, WEBSITES_COLLECTION};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::StoreUnavailable(StoreError::Serialization(error))
    }
}

/// Website catalog operations over the `websites` collection.
#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: DocumentStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every entry, ascending by `order`. One attempt, no retry.
    pub async fn list_entries(&self) -> Result<Vec<WebsiteEntry>, CatalogError> {
        let documents = self
            .store
            .list_ordered(WEBSITES_COLLECTION, ORDER_FIELD, SortDirection::Ascending)
            .await?;
        let entries = documents
            .into_iter()
            .map(WebsiteEntry::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "loaded website entries");
        Ok(entries)
    }

    pub async fn create_entry(&self, fields: &WebsiteFields) -> Result<String, CatalogError> {
        fields.validate()?;
        let document = fields.to_document_fields()?;
        let id = self.store.insert(WEBSITES_COLLECTION, &document).await?;
        info!(%id, title = %fields.title, "created website entry");
        Ok(id)
    }

    /// Replaces the whole document. A missing id is reported as
    /// `StoreUnavailable`, like any other store failure.
    pub async fn update_entry(&self, id: &str, fields: &WebsiteFields) -> Result<(), CatalogError> {
        fields.validate()?;
        let document = fields.to_document_fields()?;
        self.store
            .update(WEBSITES_COLLECTION, id, &document)
            .await?;
        info!(%id, title = %fields.title, "updated website entry");
        Ok(())
    }

    /// Deleting an id the store no longer knows succeeds.
    pub async fn delete_entry(&self, id: &str) -> Result<(), CatalogError> {
        match self.store.delete(WEBSITES_COLLECTION, id).await {
            Ok(()) => {
                info!(%id, "deleted website entry");
                Ok(())
            }
            Err(StoreError::NotFound) => {
                warn!(%id, "website entry already absent on delete");
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }
}
