//! gh CLI wrapper module
//!
//! Async execution of `gh` commands used by the production issue tracker.

pub mod error;
pub mod executor;

pub use error::{GhError, GhResult};
pub use executor::GhExecutor;
