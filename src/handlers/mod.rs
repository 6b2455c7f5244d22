pub mod health;
pub mod editing;
pub mod documents;
pub mod status;
pub mod diagnostics;

pub use health::*;
pub use editing::*;
pub use documents::*;
pub use status::*;
pub use diagnostics::*;

#[cfg(test)]
mod tests;
