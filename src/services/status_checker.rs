use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clients::{EditStatusTransport, KnowledgeServer};
use crate::models::{
    CheckOutcome, CheckState, DocumentIdentity, EditStatusError, StatusEvent, TimeoutReason,
};
use crate::utils::abort_guard::AbortGuard;
use super::document_store::{DocumentStore, DOCUMENT_OBJECT};
use super::server_router::ServerRouter;

#[derive(Debug, Clone)]
pub struct CheckerSettings {
    /// Advisory deadline; it never cancels the request in flight
    pub check_timeout: Duration,
    pub event_capacity: usize,
}

struct Progress {
    generation: u64,
    /// Checks up to this generation were stopped or timed out
    stopped_generation: u64,
    state: CheckState,
    timeout_guard: Option<AbortGuard>,
}

struct CheckerInner {
    docs: Arc<dyn DocumentStore>,
    server: Arc<dyn KnowledgeServer>,
    edit_status: Arc<dyn EditStatusTransport>,
    router: ServerRouter,
    events: broadcast::Sender<StatusEvent>,
    target: Mutex<Option<DocumentIdentity>>,
    progress: Mutex<Progress>,
    needs_recheck: AtomicBool,
    check_timeout: Duration,
}

/// Decides whether a locally open document is safe to edit.
///
/// A check runs inline on the calling task: the server version check first,
/// then the edit-status lookup. Results are returned and also published as
/// [`StatusEvent`]s.
#[derive(Clone)]
pub struct StatusChecker {
    inner: Arc<CheckerInner>,
}

impl StatusChecker {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        server: Arc<dyn KnowledgeServer>,
        edit_status: Arc<dyn EditStatusTransport>,
        router: ServerRouter,
        settings: CheckerSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(settings.event_capacity.max(1));
        Self {
            inner: Arc::new(CheckerInner {
                docs,
                server,
                edit_status,
                router,
                events,
                target: Mutex::new(None),
                progress: Mutex::new(Progress {
                    generation: 0,
                    stopped_generation: 0,
                    state: CheckState::Idle,
                    timeout_guard: None,
                }),
                needs_recheck: AtomicBool::new(false),
                check_timeout: settings.check_timeout,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.inner.events.subscribe()
    }

    pub fn state(&self) -> CheckState {
        self.inner.progress.lock().state
    }

    pub fn needs_recheck(&self) -> bool {
        self.inner.needs_recheck.load(Ordering::SeqCst)
    }

    /// Current target identity
    pub fn peek(&self) -> Option<DocumentIdentity> {
        self.inner.target.lock().clone()
    }

    fn set_target(&self, identity: Option<DocumentIdentity>) {
        *self.inner.target.lock() = identity;
    }

    /// Make `kb_guid/guid` the target and check it
    pub async fn check_edit_status(&self, kb_guid: &str, guid: &str) -> CheckOutcome {
        let Some(identity) = DocumentIdentity::new(kb_guid, guid) else {
            return CheckOutcome::Skipped;
        };
        self.set_target(Some(identity));
        self.start_check().await
    }

    /// Run the check again for the current target
    pub async fn recheck(&self) -> CheckOutcome {
        self.start_check().await
    }

    /// Abandon the running check and clear the target
    pub fn stop_check_status(&self) {
        {
            let mut progress = self.inner.progress.lock();
            progress.timeout_guard = None;
            progress.state = CheckState::Idle;
            progress.stopped_generation = progress.generation;
        }
        self.set_target(None);
    }

    async fn start_check(&self) -> CheckOutcome {
        let Some(identity) = self.peek() else {
            return CheckOutcome::Skipped;
        };
        self.inner.needs_recheck.store(false, Ordering::SeqCst);
        let generation = self.begin(&identity);
        debug!("Checking status of {}", identity);

        let changed = self.check_document_changed_on_server(&identity).await;
        if self.stopped(generation) {
            return self.abort(generation, identity);
        }
        self.emit(StatusEvent::DocumentChanged { identity: identity.clone(), changed });

        if changed {
            self.finish(generation, CheckState::Completed);
            self.emit(StatusEvent::CheckFinished { identity, safe_to_edit: false });
            return CheckOutcome::Completed {
                changed: true,
                editors: Vec::new(),
                safe_to_edit: false,
            };
        }

        let editors = self.check_document_edit_status(&identity).await;
        if self.stopped(generation) {
            return self.abort(generation, identity);
        }

        match editors {
            Err(e) => {
                warn!("Edit status of {} unavailable: {}", identity, e);
                self.finish(generation, CheckState::TimedOut);
                self.emit(StatusEvent::CheckTimedOut {
                    identity,
                    reason: TimeoutReason::NetworkError,
                });
                CheckOutcome::NetworkError(e.to_string())
            }
            Ok(None) => {
                debug!("Target changed while checking {}, recheck needed", identity);
                self.inner.needs_recheck.store(true, Ordering::SeqCst);
                self.finish(generation, CheckState::Idle);
                CheckOutcome::Superseded
            }
            Ok(Some(editors)) => {
                self.emit(StatusEvent::EditingByOthers {
                    identity: identity.clone(),
                    editors: editors.clone(),
                });
                let safe_to_edit = editors.is_empty();
                self.finish(generation, CheckState::Completed);
                self.emit(StatusEvent::CheckFinished { identity, safe_to_edit });
                CheckOutcome::Completed {
                    changed: false,
                    editors,
                    safe_to_edit,
                }
            }
        }
    }

    /// Whether the server holds a newer version of the document.
    ///
    /// Lookup failures count as "not changed".
    pub async fn check_document_changed_on_server(&self, identity: &DocumentIdentity) -> bool {
        let inner = &self.inner;
        let Some(doc) = inner.docs.document_by_guid(&identity.kb_guid, &identity.guid) else {
            return false;
        };

        if doc.is_unsynced() {
            return !inner.docs.can_edit_document(&doc);
        }

        let route = match inner.router.route_for(&identity.kb_guid).await {
            Ok(route) => route,
            Err(e) => {
                warn!("Cannot route {}: {}", identity, e);
                return false;
            }
        };

        let server_version = match inner.server.remote_version(&route).await {
            Ok(version) => version,
            Err(e) => {
                warn!("Failed to get server version for {}: {}", identity.kb_guid, e);
                return false;
            }
        };
        let local_version = inner.docs.object_version(&identity.kb_guid, DOCUMENT_OBJECT);
        if server_version.document_version <= local_version {
            return false;
        }

        let remote = match inner.server.remote_document_info(&route, &identity.guid).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!("Failed to get server info for {}: {}", identity, e);
                return false;
            }
        };

        if remote.guid == doc.guid && remote.version > doc.version {
            info!(
                "[Status] New version of note detected, note: {} local version: {} \
                 server version: {}",
                remote.title, doc.version, remote.version
            );
            return true;
        }
        false
    }

    /// Editors reported by the edit-status service, or `None` when the target
    /// moved on while the request was in flight.
    async fn check_document_edit_status(
        &self,
        identity: &DocumentIdentity,
    ) -> Result<Option<Vec<String>>, EditStatusError> {
        let editors = self
            .inner
            .edit_status
            .editors(&identity.obj_id(), Utc::now().timestamp_millis())
            .await?;

        if self.inner.target.lock().as_ref() != Some(identity) {
            return Ok(None);
        }
        Ok(Some(editors))
    }

    fn begin(&self, identity: &DocumentIdentity) -> u64 {
        let mut progress = self.inner.progress.lock();
        progress.generation += 1;
        progress.state = CheckState::Checking;
        let generation = progress.generation;

        let weak: Weak<CheckerInner> = Arc::downgrade(&self.inner);
        let timeout = self.inner.check_timeout;
        let identity = identity.clone();
        progress.timeout_guard = Some(AbortGuard::new(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = weak.upgrade() {
                inner.on_timeout(generation, identity);
            }
        })));
        generation
    }

    fn finish(&self, generation: u64, state: CheckState) {
        let mut progress = self.inner.progress.lock();
        if progress.generation == generation {
            progress.timeout_guard = None;
            progress.state = state;
        }
    }

    /// Stopped mid-flight. A timeout already reported the outcome; otherwise
    /// the document is reported as not safe to edit.
    fn abort(&self, generation: u64, identity: DocumentIdentity) -> CheckOutcome {
        let timed_out = {
            let mut progress = self.inner.progress.lock();
            if progress.generation == generation {
                progress.timeout_guard = None;
                progress.state == CheckState::TimedOut
            } else {
                false
            }
        };
        if timed_out {
            return CheckOutcome::TimedOut;
        }
        self.emit(StatusEvent::CheckFinished { identity, safe_to_edit: false });
        CheckOutcome::Stopped
    }

    fn stopped(&self, generation: u64) -> bool {
        self.inner.progress.lock().stopped_generation >= generation
    }

    fn emit(&self, event: StatusEvent) {
        self.inner.emit(event);
    }
}

impl CheckerInner {
    fn emit(&self, event: StatusEvent) {
        // No subscriber is fine.
        let _ = self.events.send(event);
    }

    fn on_timeout(&self, generation: u64, identity: DocumentIdentity) {
        {
            let mut progress = self.progress.lock();
            if progress.generation != generation || progress.state != CheckState::Checking {
                return;
            }
            progress.state = CheckState::TimedOut;
            progress.stopped_generation = generation;
        }
        info!("Status check of {} timed out", identity);
        self.emit(StatusEvent::CheckTimedOut { identity, reason: TimeoutReason::Deadline });
    }
}
