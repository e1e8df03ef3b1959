use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{validate_sort_field, Document, DocumentStore, SortDirection, StoreError};

#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

/// Client for a hosted document service speaking JSON over HTTP.
///
/// Documents live under `{base_url}/collections/{collection}/documents`.
#[derive(Debug, Clone)]
pub struct RemoteDocumentStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteDocumentStore {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!("{}/collections/{collection}/documents", self.base_url)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{id}", self.documents_url(collection))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }
        if !status.is_success() {
            return Err(StoreError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }
}

impl DocumentStore for RemoteDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> Result<String, StoreError> {
        let request = self.client.post(self.documents_url(collection)).json(fields);
        let created: InsertResponse = self.send(request).await?.json().await?;
        Ok(created.id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let request = self.client.put(self.document_url(collection, id)).json(fields);
        self.send(request).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let request = self.client.delete(self.document_url(collection, id));
        self.send(request).await?;
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &str,
        sort_field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        validate_sort_field(sort_field)?;
        let request = self
            .client
            .get(self.documents_url(collection))
            .query(&[("orderBy", sort_field), ("direction", direction.as_str())]);
        let documents: Vec<Document> = self.send(request).await?.json().await?;
        Ok(documents)
    }
}
