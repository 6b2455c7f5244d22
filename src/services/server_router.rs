use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clients::ApiEntry;
use crate::models::{ServerError, ServerRoute};
use super::document_store::DocumentStore;
use super::session::TokenProvider;

/// Picks the server hosting a knowledge base.
///
/// Personal knowledge bases live on the session's server. Groups carry their
/// own server, or have it resolved through the API entry and cached.
pub struct ServerRouter {
    docs: Arc<dyn DocumentStore>,
    tokens: Arc<dyn TokenProvider>,
    api_entry: Arc<dyn ApiEntry>,
    group_servers: Cache<String, String>,
}

impl ServerRouter {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        tokens: Arc<dyn TokenProvider>,
        api_entry: Arc<dyn ApiEntry>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            docs,
            tokens,
            api_entry,
            group_servers: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(cache_ttl)
                .build(),
        }
    }

    pub async fn route_for(&self, kb_guid: &str) -> Result<ServerRoute, ServerError> {
        let user = self.tokens.user_info();

        if !self.docs.is_group(kb_guid) {
            if user.database_server.is_empty() {
                return Err(ServerError::NoRoute(kb_guid.to_string()));
            }
            let personal_kb = if user.kb_guid.is_empty() {
                kb_guid.to_string()
            } else {
                user.kb_guid
            };
            return Ok(ServerRoute {
                kb_guid: personal_kb,
                database_server: user.database_server,
                token: user.token,
            });
        }

        let group = self
            .docs
            .group_data(kb_guid)
            .ok_or_else(|| ServerError::NoRoute(kb_guid.to_string()))?;

        let database_server = if !group.database_server.is_empty() {
            group.database_server
        } else if let Some(cached) = self.group_servers.get(&group.group_guid) {
            cached
        } else {
            let resolved = self.api_entry.kb_server_url(&user.token, &group.group_guid).await?;
            debug!("Caching server for group {}", group.group_guid);
            self.group_servers.insert(group.group_guid.clone(), resolved.clone());
            resolved
        };

        Ok(ServerRoute {
            kb_guid: group.group_guid,
            database_server,
            token: user.token,
        })
    }
}
