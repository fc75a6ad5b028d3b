use crate::domain::ports::embedding_store::{EmbeddingStore, StoreError};
use crate::domain::values::embedding::Embedding;
use crate::domain::values::user_id::UserId;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Reads embeddings from an HTTP endpoint that answers `GET` with a JSON
/// object of `{"<user_id>": [f32, ...]}`.
pub struct HttpEmbeddingStore {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpEmbeddingStore {
    pub fn new(url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Connection(format!("HTTP client error: {e}")))?;
        Ok(Self { client, url, api_key })
    }
}

#[async_trait]
impl EmbeddingStore for HttpEmbeddingStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn load_all(&self) -> Result<HashMap<UserId, Embedding>, StoreError> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| StoreError::Connection(format!("Embedding store request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Query(format!("Embedding store {status}: {body}")));
        }

        let raw: HashMap<String, Vec<f32>> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("Parse error: {e}")))?;
        Ok(raw
            .into_iter()
            .map(|(id, vector)| (UserId::new(id), Embedding::new(vector)))
            .collect())
    }
}
