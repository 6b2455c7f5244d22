use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::EditStatusError;

/// Calls understood by the edit-status service
#[async_trait]
pub trait EditStatusTransport: Send + Sync {
    /// Announce that `user_alias` is editing `obj_id`
    async fn add(
        &self,
        obj_id: &str,
        user_alias: &str,
        t: i64,
        token: &str,
    ) -> Result<(), EditStatusError>;

    /// Clear the editing status of `user_alias` on `obj_id`
    async fn delete(
        &self,
        obj_id: &str,
        user_alias: &str,
        t: i64,
        token: &str,
    ) -> Result<(), EditStatusError>;

    /// Aliases currently editing `obj_id`
    async fn editors(&self, obj_id: &str, t: i64) -> Result<Vec<String>, EditStatusError>;
}

#[derive(Debug, Clone)]
pub struct HttpEditStatusClient {
    client: Client,
    base_url: String,
}

impl HttpEditStatusClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, action: &str, params: &[(&str, &str)]) -> Result<Url, EditStatusError> {
        let raw = format!("{}/{}", self.base_url, action);
        Url::parse_with_params(&raw, params).map_err(|_| EditStatusError::Url(raw))
    }

    async fn notify(
        &self,
        action: &str,
        obj_id: &str,
        user_alias: &str,
        t: i64,
        token: &str,
    ) -> Result<(), EditStatusError> {
        let t = t.to_string();
        let params = [
            ("obj_id", obj_id),
            ("user_id", user_alias),
            ("t", t.as_str()),
            ("token", token),
        ];
        let url = self.url(action, &params)?;
        debug!("[EditStatus] {} {}", action, obj_id);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EditStatusError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl EditStatusTransport for HttpEditStatusClient {
    async fn add(
        &self,
        obj_id: &str,
        user_alias: &str,
        t: i64,
        token: &str,
    ) -> Result<(), EditStatusError> {
        self.notify("add", obj_id, user_alias, t, token).await
    }

    async fn delete(
        &self,
        obj_id: &str,
        user_alias: &str,
        t: i64,
        token: &str,
    ) -> Result<(), EditStatusError> {
        self.notify("delete", obj_id, user_alias, t, token).await
    }

    async fn editors(&self, obj_id: &str, t: i64) -> Result<Vec<String>, EditStatusError> {
        let t = t.to_string();
        let url = self.url("get", &[("obj_id", obj_id), ("t", t.as_str())])?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EditStatusError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(parse_editor_list(&body))
    }
}

/// Parse the editor list returned by the `get` call.
///
/// Anything that is not a JSON array means nobody else is editing. Non-string
/// elements are skipped.
pub fn parse_editor_list(body: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(alias) => Some(alias),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(e) => {
            warn!("[EditStatus] Unreadable editor list: {}", e);
            Vec::new()
        }
    }
}
