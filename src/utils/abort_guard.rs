use tokio::task::JoinHandle;

/// Aborts the wrapped task when dropped.
pub struct AbortGuard(Option<JoinHandle<()>>);

impl AbortGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self(Some(handle))
    }
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}
