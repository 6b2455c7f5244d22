use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::clients::EditStatusTransport;
use crate::models::{DocumentIdentity, NotifierError};
use super::edit_sets::{EditSets, EditSetsSnapshot};
use super::session::TokenProvider;

/// State changes reported by the editing session
enum EditEvent {
    StartEditing { user_alias: String, identity: DocumentIdentity },
    StopEditing { identity: DocumentIdentity, modified: bool },
    DocumentSaved { user_alias: String, identity: DocumentIdentity },
    DocumentUploaded { identity: DocumentIdentity },
    Snapshot(oneshot::Sender<EditSetsSnapshot>),
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct NotifierSettings {
    /// Active editors are re-announced at this cadence
    pub heartbeat_interval: Duration,
    pub queue_capacity: usize,
}

enum WorkerSlot {
    Pending(NotifierWorker),
    Running(JoinHandle<()>),
    Finished,
}

/// Reports local editing activity to the edit-status service.
///
/// Mutators only enqueue an event; a single worker task owns the edit sets,
/// applies events in order and flushes notifications after each batch.
#[derive(Clone)]
pub struct EditStatusNotifier {
    tx: mpsc::Sender<EditEvent>,
    stop_requested: Arc<AtomicBool>,
    worker: Arc<Mutex<WorkerSlot>>,
}

impl EditStatusNotifier {
    pub fn new(
        transport: Arc<dyn EditStatusTransport>,
        tokens: Arc<dyn TokenProvider>,
        settings: NotifierSettings,
    ) -> Self {
        let (tx, rx) = mpsc::channel(settings.queue_capacity.max(1));
        let stop_requested = Arc::new(AtomicBool::new(false));
        let worker = NotifierWorker {
            rx,
            sets: EditSets::default(),
            transport,
            tokens,
            heartbeat_interval: settings.heartbeat_interval,
            stop_requested: stop_requested.clone(),
        };
        Self {
            tx,
            stop_requested,
            worker: Arc::new(Mutex::new(WorkerSlot::Pending(worker))),
        }
    }

    /// Spawn the worker task. Calling it again is a no-op.
    pub fn start(&self) {
        let mut slot = self.worker.lock();
        *slot = match std::mem::replace(&mut *slot, WorkerSlot::Finished) {
            WorkerSlot::Pending(worker) => WorkerSlot::Running(tokio::spawn(worker.run())),
            other => other,
        };
    }

    pub async fn start_editing(
        &self,
        user_alias: &str,
        kb_guid: &str,
        guid: &str,
    ) -> Result<(), NotifierError> {
        let Some(identity) = DocumentIdentity::new(kb_guid, guid) else {
            return Ok(());
        };
        self.send(EditEvent::StartEditing { user_alias: user_alias.to_string(), identity }).await
    }

    pub async fn stop_editing(
        &self,
        kb_guid: &str,
        guid: &str,
        modified: bool,
    ) -> Result<(), NotifierError> {
        let Some(identity) = DocumentIdentity::new(kb_guid, guid) else {
            return Ok(());
        };
        self.send(EditEvent::StopEditing { identity, modified }).await
    }

    pub async fn document_saved(
        &self,
        user_alias: &str,
        kb_guid: &str,
        guid: &str,
    ) -> Result<(), NotifierError> {
        let Some(identity) = DocumentIdentity::new(kb_guid, guid) else {
            return Ok(());
        };
        self.send(EditEvent::DocumentSaved { user_alias: user_alias.to_string(), identity }).await
    }

    pub async fn document_uploaded(&self, kb_guid: &str, guid: &str) -> Result<(), NotifierError> {
        let Some(identity) = DocumentIdentity::new(kb_guid, guid) else {
            return Ok(());
        };
        self.send(EditEvent::DocumentUploaded { identity }).await
    }

    /// Current edit sets, answered once every earlier event has been flushed
    pub async fn snapshot(&self) -> Result<EditSetsSnapshot, NotifierError> {
        let (reply, answer) = oneshot::channel();
        self.send(EditEvent::Snapshot(reply)).await?;
        answer.await.map_err(|_| NotifierError::Stopped)
    }

    /// Ask the worker to exit. Pending work is not drained.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        // A full queue means the worker is awake and will see the flag anyway.
        let _ = self.tx.try_send(EditEvent::Shutdown);
    }

    /// Stop the worker and wait until it has exited. Safe when it never started.
    pub async fn wait_for_done(&self) {
        self.stop();
        let handle = match std::mem::replace(&mut *self.worker.lock(), WorkerSlot::Finished) {
            WorkerSlot::Running(handle) => Some(handle),
            WorkerSlot::Pending(_) | WorkerSlot::Finished => None,
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("[EditStatus] Notifier worker ended abnormally: {}", e);
            }
        }
    }

    async fn send(&self, event: EditEvent) -> Result<(), NotifierError> {
        if self.stop_requested.load(Ordering::SeqCst) {
            return Err(NotifierError::Stopped);
        }
        self.tx.send(event).await.map_err(|_| NotifierError::Stopped)
    }
}

enum Wake {
    Event(EditEvent),
    Heartbeat,
    Closed,
}

#[derive(Default)]
struct Batch {
    flush: bool,
    replies: Vec<oneshot::Sender<EditSetsSnapshot>>,
}

struct NotifierWorker {
    rx: mpsc::Receiver<EditEvent>,
    sets: EditSets,
    transport: Arc<dyn EditStatusTransport>,
    tokens: Arc<dyn TokenProvider>,
    heartbeat_interval: Duration,
    stop_requested: Arc<AtomicBool>,
}

impl NotifierWorker {
    async fn run(mut self) {
        info!("[EditStatus] Notifier started");
        // The heartbeat deadline lives only on this task.
        let mut retry_at: Option<Instant> = None;

        while !self.stopping() {
            let wake = match retry_at {
                Some(deadline) => tokio::select! {
                    biased;
                    _ = sleep_until(deadline) => Wake::Heartbeat,
                    event = self.rx.recv() => event.map_or(Wake::Closed, Wake::Event),
                },
                None => self.rx.recv().await.map_or(Wake::Closed, Wake::Event),
            };

            let mut batch = Batch::default();
            match wake {
                Wake::Closed => break,
                Wake::Heartbeat => {
                    retry_at = None;
                    batch.flush = true;
                }
                Wake::Event(event) => self.apply(event, &mut batch),
            }
            while !self.stopping() {
                match self.rx.try_recv() {
                    Ok(event) => self.apply(event, &mut batch),
                    Err(_) => break,
                }
            }
            if self.stopping() {
                break;
            }

            if batch.flush {
                retry_at = None;
                let active = self.send_editing().await;
                self.send_done().await;
                if active > 0 {
                    retry_at = Some(Instant::now() + self.heartbeat_interval);
                }
            }

            for reply in batch.replies {
                let _ = reply.send(self.sets.snapshot());
            }
        }
        info!("[EditStatus] Notifier stopped");
    }

    fn stopping(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    fn apply(&mut self, event: EditEvent, batch: &mut Batch) {
        match event {
            EditEvent::StartEditing { user_alias, identity } => {
                self.sets.start_editing(&user_alias, identity);
                batch.flush = true;
            }
            EditEvent::StopEditing { identity, modified } => {
                self.sets.stop_editing(&identity, modified);
                batch.flush = true;
            }
            EditEvent::DocumentSaved { user_alias, identity } => {
                self.sets.document_saved(&user_alias, identity);
                batch.flush = true;
            }
            EditEvent::DocumentUploaded { identity } => {
                self.sets.document_uploaded(&identity);
                batch.flush = true;
            }
            EditEvent::Snapshot(reply) => batch.replies.push(reply),
            EditEvent::Shutdown => self.stop_requested.store(true, Ordering::SeqCst),
        }
    }

    /// Announce every active identity, returning how many were active.
    async fn send_editing(&self) -> usize {
        let active = self.sets.active();
        for (identity, user_alias) in &active {
            if user_alias.is_empty() {
                continue;
            }
            if self.stopping() {
                break;
            }
            let obj_id = identity.obj_id();
            debug!("[EditStatus] Send editing status: {}", obj_id);
            let token = self.tokens.token();
            if let Err(e) = self.transport.add(&obj_id, user_alias, timestamp(), &token).await {
                warn!("[EditStatus] Failed to send editing status for {}: {}", obj_id, e);
            }
        }
        active.len()
    }

    /// Clear finished identities remotely; failures stay queued for the next cycle.
    async fn send_done(&mut self) {
        for (identity, user_alias) in self.sets.pending_done() {
            if user_alias.is_empty() {
                continue;
            }
            if self.stopping() {
                break;
            }
            let obj_id = identity.obj_id();
            debug!("[EditStatus] Send done status: {}", obj_id);
            let token = self.tokens.token();
            match self.transport.delete(&obj_id, &user_alias, timestamp(), &token).await {
                Ok(()) => self.sets.acknowledge_done(&identity),
                Err(e) => warn!("[EditStatus] Failed to send done status for {}: {}", obj_id, e),
            }
        }
    }
}

fn timestamp() -> i64 {
    Utc::now().timestamp_millis()
}
