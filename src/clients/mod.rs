pub mod edit_status_client;
pub mod knowledge_server_client;
pub mod api_entry_client;

pub use edit_status_client::{EditStatusTransport, HttpEditStatusClient};
pub use knowledge_server_client::{HttpKnowledgeServer, KnowledgeServer};
pub use api_entry_client::{ApiEntry, HttpApiEntry};

use std::time::Duration;

/// Shared HTTP client for every outgoing call
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
}
