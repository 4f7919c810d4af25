//! # PopSub Store
//!
//! `popsub_store` is the durable state of a publish/subscribe broker with
//! QoS 0/1/2 delivery. It keeps, across restarts and client disconnects:
//!
//! - the last retained message of every topic,
//! - the offline queue of every persistent-session client,
//! - the QoS 1/2 messages sent but not yet acknowledged,
//! - the persistent subscriptions of every client.
//!
//! ## Core Modules
//!
//! - `broker`: The records exchanged with the broker and topic matching.
//! - `config`: Handles loading and managing store configuration.
//! - `persistence`: The ordered key-value substrate (`sled` or in-memory).
//! - `storage`: The four collections and the `StorageService` trait.
//! - `utils`: Error type and logging setup.
//!
//! ```no_run
//! use popsub_store::broker::{PendingPublish, QoS};
//! use popsub_store::config::StorageSettings;
//! use popsub_store::storage::{StorageService, Store};
//!
//! let store = Store::open(&StorageSettings::default())?;
//! store.store_publish_for_future(PendingPublish::new("c1", "a/b", b"hi".to_vec(), QoS::AtLeastOnce))?;
//! let pending = store.retrieve_persisted_publishes("c1")?;
//! # Ok::<(), popsub_store::utils::StoreError>(())
//! ```

pub mod broker;
pub mod config;
pub mod persistence;
pub mod storage;
pub mod utils;
