//! In-memory fakes shared by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{oneshot, Notify};

use crate::clients::{ApiEntry, EditStatusTransport, KnowledgeServer};
use crate::models::{
    EditStatusError, ObjectVersion, RemoteDocument, ServerError, ServerRoute, UserInfo,
};
use crate::services::session::TokenProvider;

pub struct StaticTokens(pub String);

impl TokenProvider for StaticTokens {
    fn token(&self) -> String {
        self.0.clone()
    }

    fn user_info(&self) -> UserInfo {
        UserInfo {
            token: self.0.clone(),
            ..UserInfo::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub action: &'static str,
    pub obj_id: String,
    pub user_alias: String,
}

impl Call {
    pub fn add(obj_id: &str, user_alias: &str) -> Self {
        Self { action: "add", obj_id: obj_id.to_string(), user_alias: user_alias.to_string() }
    }

    pub fn delete(obj_id: &str, user_alias: &str) -> Self {
        Self { action: "delete", obj_id: obj_id.to_string(), user_alias: user_alias.to_string() }
    }
}

/// Records notifications and serves a configurable editor list
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    tokens: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
    fail_editors: AtomicBool,
    editors: Mutex<Vec<String>>,
    editor_requests: Mutex<Vec<String>>,
    editor_gate: Mutex<Option<oneshot::Receiver<()>>>,
    editor_entered: Notify,
}

impl RecordingTransport {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_editors(&self, fail: bool) {
        self.fail_editors.store(fail, Ordering::SeqCst);
    }

    pub fn set_editors(&self, editors: Vec<String>) {
        *self.editors.lock() = editors;
    }

    pub fn editor_requests(&self) -> Vec<String> {
        self.editor_requests.lock().clone()
    }

    /// The next editor lookup waits until the returned sender fires
    pub fn hold_editor_requests(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.editor_gate.lock() = Some(rx);
        tx
    }

    pub async fn wait_for_editor_request(&self) {
        self.editor_entered.notified().await;
    }
}

#[async_trait]
impl EditStatusTransport for RecordingTransport {
    async fn add(
        &self,
        obj_id: &str,
        user_alias: &str,
        _t: i64,
        token: &str,
    ) -> Result<(), EditStatusError> {
        self.calls.lock().push(Call::add(obj_id, user_alias));
        self.tokens.lock().push(token.to_string());
        Ok(())
    }

    async fn delete(
        &self,
        obj_id: &str,
        user_alias: &str,
        _t: i64,
        token: &str,
    ) -> Result<(), EditStatusError> {
        self.calls.lock().push(Call::delete(obj_id, user_alias));
        self.tokens.lock().push(token.to_string());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(EditStatusError::Status(503));
        }
        Ok(())
    }

    async fn editors(&self, obj_id: &str, _t: i64) -> Result<Vec<String>, EditStatusError> {
        self.editor_requests.lock().push(obj_id.to_string());
        self.editor_entered.notify_one();
        let gate = self.editor_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_editors.load(Ordering::SeqCst) {
            return Err(EditStatusError::Status(502));
        }
        Ok(self.editors.lock().clone())
    }
}

/// Knowledge server with a settable counter and document table
#[derive(Default)]
pub struct FakeKnowledgeServer {
    document_version: Mutex<i64>,
    documents: Mutex<HashMap<String, RemoteDocument>>,
    version_calls: AtomicUsize,
    info_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    version_gate: Mutex<Option<oneshot::Receiver<()>>>,
    version_entered: Notify,
}

impl FakeKnowledgeServer {
    pub fn set_document_version(&self, version: i64) {
        *self.document_version.lock() = version;
    }

    pub fn put_document(&self, doc: RemoteDocument) {
        self.documents.lock().insert(doc.guid.clone(), doc);
    }

    /// Serve `doc` when `guid` is requested
    pub fn put_document_as(&self, guid: &str, doc: RemoteDocument) {
        self.documents.lock().insert(guid.to_string(), doc);
    }

    /// Every version request sleeps this long first
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn hold_version_requests(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.version_gate.lock() = Some(rx);
        tx
    }

    pub async fn wait_for_version_request(&self) {
        self.version_entered.notified().await;
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeServer for FakeKnowledgeServer {
    async fn remote_version(&self, _route: &ServerRoute) -> Result<ObjectVersion, ServerError> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.version_entered.notify_one();
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let gate = self.version_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(ObjectVersion {
            document_version: *self.document_version.lock(),
        })
    }

    async fn remote_document_info(
        &self,
        _route: &ServerRoute,
        guid: &str,
    ) -> Result<RemoteDocument, ServerError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .get(guid)
            .cloned()
            .ok_or(ServerError::Status(404))
    }
}

/// Resolves every group to `https://<group>.resolved.example.com`
#[derive(Default)]
pub struct FakeApiEntry {
    calls: AtomicUsize,
}

impl FakeApiEntry {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiEntry for FakeApiEntry {
    async fn kb_server_url(&self, _token: &str, kb_guid: &str) -> Result<String, ServerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://{}.resolved.example.com", kb_guid))
    }
}
