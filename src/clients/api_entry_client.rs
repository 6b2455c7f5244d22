use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::models::ServerError;

/// Resolves which server hosts a knowledge base
#[async_trait]
pub trait ApiEntry: Send + Sync {
    async fn kb_server_url(&self, token: &str, kb_guid: &str) -> Result<String, ServerError>;
}

#[derive(Debug, Clone)]
pub struct HttpApiEntry {
    client: Client,
    base_url: Option<String>,
}

impl HttpApiEntry {
    pub fn new(client: Client, base_url: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

#[async_trait]
impl ApiEntry for HttpApiEntry {
    async fn kb_server_url(&self, token: &str, kb_guid: &str) -> Result<String, ServerError> {
        let Some(base_url) = &self.base_url else {
            error!("No API entry configured, cannot resolve server for kb {}", kb_guid);
            return Err(ServerError::NoRoute(kb_guid.to_string()));
        };

        let response = self.client
            .get(format!("{}/kb-server", base_url))
            .query(&[("kb_guid", kb_guid), ("token", token)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::Status(status.as_u16()));
        }

        let url = response.text().await?.trim().to_string();
        if url.is_empty() {
            return Err(ServerError::NoRoute(kb_guid.to_string()));
        }
        debug!("Resolved server for kb {}: {}", kb_guid, url);
        Ok(url)
    }
}
