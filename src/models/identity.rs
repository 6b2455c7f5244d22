use serde::{Deserialize, Serialize};
use std::fmt;

/// A document addressed by knowledge base and document GUID.
///
/// On the wire it is the object id `"<kb_guid>/<guid>"`. An empty knowledge
/// base GUID never forms an identity, so every operation taking one is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentIdentity {
    pub kb_guid: String,
    pub guid: String,
}

impl DocumentIdentity {
    pub fn new(kb_guid: &str, guid: &str) -> Option<Self> {
        if kb_guid.is_empty() {
            return None;
        }
        Some(Self {
            kb_guid: kb_guid.to_string(),
            guid: guid.to_string(),
        })
    }

    /// Object id used by the edit-status service
    pub fn obj_id(&self) -> String {
        format!("{}/{}", self.kb_guid, self.guid)
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kb_guid, self.guid)
    }
}
