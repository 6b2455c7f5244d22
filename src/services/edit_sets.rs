use std::collections::BTreeMap;

use crate::models::{DocumentIdentity, EditEntry};

/// Local editing state waiting to be reported to the edit-status service.
///
/// An identity is active when it sits in `editing` or `modified`. `done`
/// holds identities whose status must be cleared remotely; re-entering
/// `editing` or `modified` evicts it from `done`.
#[derive(Debug, Default, Clone)]
pub struct EditSets {
    editing: BTreeMap<DocumentIdentity, String>,
    modified: BTreeMap<DocumentIdentity, String>,
    done: BTreeMap<DocumentIdentity, String>,
}

/// Copy of the three sets for reporting
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EditSetsSnapshot {
    pub editing: Vec<EditEntry>,
    pub modified: Vec<EditEntry>,
    pub done: Vec<EditEntry>,
}

impl EditSets {
    pub fn start_editing(&mut self, user_alias: &str, identity: DocumentIdentity) {
        self.done.remove(&identity);
        self.editing.insert(identity, user_alias.to_string());
    }

    pub fn stop_editing(&mut self, identity: &DocumentIdentity, modified: bool) {
        let Some(user_alias) = self.editing.remove(identity) else {
            return;
        };
        if modified {
            self.modified.insert(identity.clone(), user_alias);
        } else if !self.modified.contains_key(identity) {
            self.done.insert(identity.clone(), user_alias);
        }
    }

    pub fn document_saved(&mut self, user_alias: &str, identity: DocumentIdentity) {
        self.done.remove(&identity);
        self.modified.insert(identity, user_alias.to_string());
    }

    pub fn document_uploaded(&mut self, identity: &DocumentIdentity) {
        let Some(user_alias) = self.modified.remove(identity) else {
            return;
        };
        if !self.editing.contains_key(identity) {
            self.done.insert(identity.clone(), user_alias);
        }
    }

    /// Every active identity with the alias to announce.
    ///
    /// When an identity is both editing and modified, the modified alias wins.
    pub fn active(&self) -> BTreeMap<DocumentIdentity, String> {
        let mut active = self.editing.clone();
        for (identity, user_alias) in &self.modified {
            active.insert(identity.clone(), user_alias.clone());
        }
        active
    }

    pub fn pending_done(&self) -> Vec<(DocumentIdentity, String)> {
        self.done
            .iter()
            .map(|(identity, user_alias)| (identity.clone(), user_alias.clone()))
            .collect()
    }

    /// Drop a done entry once its clear notification went through
    pub fn acknowledge_done(&mut self, identity: &DocumentIdentity) {
        self.done.remove(identity);
    }

    pub fn snapshot(&self) -> EditSetsSnapshot {
        fn entries(map: &BTreeMap<DocumentIdentity, String>) -> Vec<EditEntry> {
            map.iter()
                .map(|(identity, user_alias)| EditEntry {
                    obj_id: identity.obj_id(),
                    user_alias: user_alias.clone(),
                })
                .collect()
        }
        EditSetsSnapshot {
            editing: entries(&self.editing),
            modified: entries(&self.modified),
            done: entries(&self.done),
        }
    }

    #[cfg(test)]
    pub fn is_done(&self, identity: &DocumentIdentity) -> bool {
        self.done.contains_key(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(guid: &str) -> DocumentIdentity {
        DocumentIdentity::new("kb1", guid).unwrap()
    }

    #[test]
    fn test_stop_without_changes_moves_to_done() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), false);

        let snapshot = sets.snapshot();
        assert!(snapshot.editing.is_empty());
        assert!(snapshot.modified.is_empty());
        assert_eq!(
            snapshot.done,
            vec![EditEntry { obj_id: "kb1/g1".to_string(), user_alias: "alice".to_string() }]
        );
    }

    #[test]
    fn test_stop_with_changes_waits_for_upload() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), true);

        assert!(!sets.is_done(&id("g1")));
        assert_eq!(sets.snapshot().modified.len(), 1);

        sets.document_uploaded(&id("g1"));
        assert!(sets.is_done(&id("g1")));
        assert!(sets.snapshot().modified.is_empty());
    }

    #[test]
    fn test_stop_unmodified_keeps_pending_upload() {
        let mut sets = EditSets::default();
        sets.document_saved("alice", id("g1"));
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), false);

        assert!(!sets.is_done(&id("g1")));
        assert_eq!(sets.snapshot().modified.len(), 1);
    }

    #[test]
    fn test_stop_unknown_document_changes_nothing() {
        let mut sets = EditSets::default();
        sets.stop_editing(&id("g1"), false);
        assert_eq!(sets.snapshot(), EditSetsSnapshot::default());
    }

    #[test]
    fn test_save_clears_pending_done() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), false);
        assert!(sets.is_done(&id("g1")));

        sets.document_saved("alice", id("g1"));
        assert!(!sets.is_done(&id("g1")));
        assert_eq!(sets.snapshot().modified.len(), 1);
    }

    #[test]
    fn test_start_clears_pending_done() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), false);
        sets.start_editing("alice", id("g1"));

        assert!(!sets.is_done(&id("g1")));
        assert_eq!(sets.active().len(), 1);
    }

    #[test]
    fn test_upload_of_unmodified_document_is_noop() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        let before = sets.snapshot();

        sets.document_uploaded(&id("g1"));
        assert_eq!(sets.snapshot(), before);
    }

    #[test]
    fn test_upload_while_still_editing_only_clears_modified() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.document_saved("alice", id("g1"));
        sets.document_uploaded(&id("g1"));

        let snapshot = sets.snapshot();
        assert_eq!(snapshot.editing.len(), 1);
        assert!(snapshot.modified.is_empty());
        assert!(snapshot.done.is_empty());
    }

    #[test]
    fn test_modified_alias_takes_precedence() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.document_saved("alice@team", id("g1"));
        sets.start_editing("carol", id("g2"));

        let active = sets.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[&id("g1")], "alice@team");
        assert_eq!(active[&id("g2")], "carol");
    }

    #[test]
    fn test_acknowledge_done_removes_entry() {
        let mut sets = EditSets::default();
        sets.start_editing("alice", id("g1"));
        sets.stop_editing(&id("g1"), false);
        assert_eq!(sets.pending_done(), vec![(id("g1"), "alice".to_string())]);

        sets.acknowledge_done(&id("g1"));
        assert!(sets.pending_done().is_empty());
    }
}
