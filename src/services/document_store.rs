use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::{DocumentIdentity, GroupInfo, KnowledgeBaseInfo, LocalDocument};

/// Object kind whose version counter tracks documents
pub const DOCUMENT_OBJECT: &str = "document";

/// Lookups into the desktop client's local database
pub trait DocumentStore: Send + Sync {
    fn document_by_guid(&self, kb_guid: &str, guid: &str) -> Option<LocalDocument>;

    /// Local permission rules for editing `doc`
    fn can_edit_document(&self, doc: &LocalDocument) -> bool;

    /// Last synced object version counter of kind `object` in the knowledge base
    fn object_version(&self, kb_guid: &str, object: &str) -> i64;

    fn is_group(&self, kb_guid: &str) -> bool;

    fn group_data(&self, kb_guid: &str) -> Option<GroupInfo>;
}

/// Mirror of the client's local database, fed through the local API
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentIdentity, LocalDocument>>,
    knowledge_bases: RwLock<HashMap<String, KnowledgeBaseInfo>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_document(&self, identity: DocumentIdentity, doc: LocalDocument) {
        self.documents.write().insert(identity, doc);
    }

    pub fn upsert_knowledge_base(&self, kb_guid: &str, info: KnowledgeBaseInfo) {
        self.knowledge_bases.write().insert(kb_guid.to_string(), info);
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn document_by_guid(&self, kb_guid: &str, guid: &str) -> Option<LocalDocument> {
        let identity = DocumentIdentity::new(kb_guid, guid)?;
        self.documents.read().get(&identity).cloned()
    }

    fn can_edit_document(&self, doc: &LocalDocument) -> bool {
        doc.editable
    }

    fn object_version(&self, kb_guid: &str, object: &str) -> i64 {
        if object != DOCUMENT_OBJECT {
            return 0;
        }
        self.knowledge_bases
            .read()
            .get(kb_guid)
            .map_or(0, |kb| kb.document_version)
    }

    fn is_group(&self, kb_guid: &str) -> bool {
        self.knowledge_bases
            .read()
            .get(kb_guid)
            .is_some_and(|kb| kb.group.is_some())
    }

    fn group_data(&self, kb_guid: &str) -> Option<GroupInfo> {
        self.knowledge_bases.read().get(kb_guid)?.group.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_knowledge_base_is_personal_with_zero_version() {
        let store = MemoryDocumentStore::new();
        assert!(!store.is_group("kb1"));
        assert_eq!(store.object_version("kb1", DOCUMENT_OBJECT), 0);
        assert!(store.group_data("kb1").is_none());
    }

    #[test]
    fn test_registered_group_and_document() {
        let store = MemoryDocumentStore::new();
        store.upsert_knowledge_base("kb1", KnowledgeBaseInfo {
            document_version: 12,
            group: Some(GroupInfo {
                group_guid: "kb1".to_string(),
                database_server: String::new(),
            }),
        });
        store.upsert_document(DocumentIdentity::new("kb1", "g1").unwrap(), LocalDocument {
            guid: "g1".to_string(),
            title: "Plan".to_string(),
            version: 3,
            editable: false,
        });

        assert!(store.is_group("kb1"));
        assert_eq!(store.object_version("kb1", DOCUMENT_OBJECT), 12);
        assert_eq!(store.object_version("kb1", "attachment"), 0);
        let doc = store.document_by_guid("kb1", "g1").unwrap();
        assert!(!store.can_edit_document(&doc));
        assert!(store.document_by_guid("", "g1").is_none());
    }
}
