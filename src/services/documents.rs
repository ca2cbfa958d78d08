use crate::core::table::{CandidateTable, TableError};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading from the document store
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("document store returned {0}")]
    ApiError(reqwest::StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No pets found in the database")]
    NoCandidates,

    #[error("Invalid candidate records: {0}")]
    InvalidCandidates(TableError),
}

impl From<TableError> for DocumentStoreError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Empty => DocumentStoreError::NoCandidates,
            other => DocumentStoreError::InvalidCandidates(other),
        }
    }
}

/// Connection details for the document store
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    pub collection: String,
    pub page_size: usize,
    pub timeout: Duration,
}

/// Document store REST client
///
/// Long-lived and shared by every request; each call issues its own listing.
pub struct DocumentStoreClient {
    config: DocumentStoreConfig,
    client: Client,
}

impl DocumentStoreClient {
    pub fn new(config: DocumentStoreConfig) -> Result<Self, DocumentStoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&self.config.database_id),
            urlencoding::encode(&self.config.collection),
        )
    }

    /// Fetch every document of the collection, following pagination
    pub async fn list_documents(&self) -> Result<Vec<Map<String, Value>>, DocumentStoreError> {
        let url = self.documents_url();
        let page_size = self.config.page_size.max(1);
        let mut documents = Vec::new();
        let mut previous_page: Vec<Map<String, Value>> = Vec::new();

        loop {
            let offset = documents.len();
            tracing::debug!("Listing documents from {} (offset {})", url, offset);

            let response = self
                .client
                .get(&url)
                .query(&[("limit", page_size), ("offset", offset)])
                .header("X-Appwrite-Key", &self.config.api_key)
                .header("X-Appwrite-Project", &self.config.project_id)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Document listing failed: {} - {}", status, body);
                return Err(DocumentStoreError::ApiError(status));
            }

            let json: Value = response.json().await?;
            let total = json.get("total").and_then(|t| t.as_u64());
            let page = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| DocumentStoreError::InvalidResponse("Missing documents array".into()))?
                .iter()
                .enumerate()
                .map(|(position, doc)| document_fields(doc, offset + position))
                .collect::<Result<Vec<_>, _>>()?;

            // A store that ignores `offset` serves the same page again
            if !page.is_empty() && page == previous_page {
                tracing::warn!("Store repeated the page at offset {}; stopping", offset);
                break;
            }

            let page_len = page.len();
            documents.extend(page.iter().cloned());
            previous_page = page;

            let exhausted = page_len < page_size
                || total.map_or(false, |t| documents.len() as u64 >= t);
            if exhausted {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), self.config.collection);
        Ok(documents)
    }

    /// Load every candidate into a table. An empty collection is an error.
    pub async fn load_candidates(&self) -> Result<CandidateTable, DocumentStoreError> {
        let documents = self.list_documents().await?;
        Ok(CandidateTable::from_documents(documents)?)
    }
}

/// Pet fields of a listed document. Stores may nest them under a `data` object.
fn document_fields(doc: &Value, position: usize) -> Result<Map<String, Value>, DocumentStoreError> {
    let data = match doc.get("data") {
        Some(inner @ Value::Object(_)) => inner,
        _ => doc,
    };
    data.as_object().cloned().ok_or_else(|| {
        DocumentStoreError::InvalidResponse(format!("document {} is not an object", position))
    })
}
