use serde::{Deserialize, Serialize};

/// Local version of a document that has never been uploaded
pub const UNSYNCED_VERSION: i64 = -1;

/// Document record as cached by the desktop client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDocument {
    pub guid: String,
    pub title: String,
    pub version: i64,
    pub editable: bool,
}

impl LocalDocument {
    pub fn is_unsynced(&self) -> bool {
        self.version == UNSYNCED_VERSION
    }
}

/// Group knowledge base metadata. An empty `database_server` is resolved
/// through the API entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub group_guid: String,
    pub database_server: String,
}

/// Local metadata of a knowledge base
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseInfo {
    /// Last document object version seen locally
    pub document_version: i64,
    pub group: Option<GroupInfo>,
}

/// Object version counters reported by a knowledge base server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVersion {
    pub document_version: i64,
}

/// Document info reported by a knowledge base server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub guid: String,
    #[serde(default)]
    pub title: String,
    pub version: i64,
}

/// Where and how to reach the server holding a knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRoute {
    pub kb_guid: String,
    pub database_server: String,
    pub token: String,
}
