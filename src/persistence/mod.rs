//! The `persistence` module provides the ordered key-value substrate the
//! store is built on.
//!
//! A substrate opens named indexes; each index is an independent sorted
//! mapping from string keys to opaque byte values. Two substrates are
//! available:
//!
//! - `sled_store`: durable, backed by one `sled` database with one tree per
//!   index.
//! - `memory`: volatile `BTreeMap`s, used by tests and embedders that do not
//!   need durability.
//!
//! Values are encoded with `serde_json` by the `codec` module.

pub mod codec;
pub mod memory;
pub mod sled_store;
pub mod substrate;

pub use memory::{MemoryIndex, MemorySubstrate};
pub use sled_store::{SledIndex, SledSubstrate};
pub use substrate::{Index, Substrate};
