//! The `utils` module provides shared definitions used across the store:
//! the crate-wide error type and the tracing initialiser.

pub mod error;
pub mod logging;

pub use error::{StoreError, StoreResult};
