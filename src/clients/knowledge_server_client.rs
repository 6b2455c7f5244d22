use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::{ObjectVersion, RemoteDocument, ServerError, ServerRoute};

/// Read-only view of a knowledge base server
#[async_trait]
pub trait KnowledgeServer: Send + Sync {
    /// Object version counters of the routed knowledge base
    async fn remote_version(&self, route: &ServerRoute) -> Result<ObjectVersion, ServerError>;

    /// Document info for `guid` in the routed knowledge base
    async fn remote_document_info(
        &self,
        route: &ServerRoute,
        guid: &str,
    ) -> Result<RemoteDocument, ServerError>;
}

#[derive(Debug, Clone)]
pub struct HttpKnowledgeServer {
    client: Client,
}

impl HttpKnowledgeServer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, ServerError> {
        let response = self.client.get(url).query(&[("token", token)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl KnowledgeServer for HttpKnowledgeServer {
    async fn remote_version(&self, route: &ServerRoute) -> Result<ObjectVersion, ServerError> {
        let url = format!(
            "{}/ks/kb/{}/version",
            route.database_server.trim_end_matches('/'),
            route.kb_guid
        );
        debug!("Fetching object version for kb {}", route.kb_guid);
        self.get_json(&url, &route.token).await
    }

    async fn remote_document_info(
        &self,
        route: &ServerRoute,
        guid: &str,
    ) -> Result<RemoteDocument, ServerError> {
        let url = format!(
            "{}/ks/note/{}/{}/info",
            route.database_server.trim_end_matches('/'),
            route.kb_guid,
            guid
        );
        debug!("Fetching document info for {}/{}", route.kb_guid, guid);
        self.get_json(&url, &route.token).await
    }
}
