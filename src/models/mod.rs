pub mod identity;
pub mod document;
pub mod session;
pub mod status;
pub mod edit_status;
pub mod check;
pub mod knowledge_base;
pub mod health;
pub mod diagnostics;
pub mod error;

pub use identity::*;
pub use document::*;
pub use session::*;
pub use status::*;
pub use edit_status::*;
pub use check::*;
pub use knowledge_base::*;
pub use health::*;
pub use diagnostics::*;
pub use error::*;
