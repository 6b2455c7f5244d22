pub mod session;
pub mod document_store;
pub mod edit_sets;
pub mod edit_status_notifier;
pub mod server_router;
pub mod status_checker;

pub use session::{Session, TokenProvider};
pub use document_store::MemoryDocumentStore;
pub use edit_status_notifier::{EditStatusNotifier, NotifierSettings};
pub use server_router::ServerRouter;
pub use status_checker::{CheckerSettings, StatusChecker};
