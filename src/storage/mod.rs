//! The `storage` module is the durable state of the broker.
//!
//! It is made of four independent collections, each living in its own named
//! index of one shared substrate:
//!
//! - `retained`: topic -> last retained message
//! - `offline`: client id -> publishes queued while a persistent-session
//!   client is disconnected
//! - `inflight`: delivery key -> QoS 1/2 publish awaiting acknowledgment
//! - `subscriptions`: client id -> persistent subscriptions
//!
//! There are no transactions across collections. Moving a publish from the
//! offline queue to the in-flight table is two calls made by the caller.
//!
//! Read-modify-write of a client's queue or subscription set is atomic per
//! client (see [`Index::update`](crate::persistence::Index::update)), so a `Store` may be shared between
//! threads behind an `Arc` without losing concurrent appends.

pub mod inflight;
pub mod offline;
pub mod retained;
pub mod subscriptions;

use serde::Serialize;
use tracing::info;

use crate::broker::{MatchingCondition, PendingPublish, QoS, RetainedMessage, SubscriptionEntry};
use crate::config::StorageSettings;
use crate::persistence::{MemorySubstrate, SledSubstrate, Substrate};
use crate::utils::StoreResult;

pub use inflight::InFlightTable;
pub use offline::OfflineQueue;
pub use retained::RetainedRepository;
pub use subscriptions::SubscriptionRegistry;

pub const RETAINED_INDEX: &str = "retained";
pub const OFFLINE_INDEX: &str = "persisted_messages";
pub const INFLIGHT_INDEX: &str = "inflight";
pub const SUBSCRIPTIONS_INDEX: &str = "subscriptions";

/// Everything the broker's session and dispatch logic persists.
///
/// Every call is synchronous and either takes durable effect or fails.
/// Absent data is an empty result, never an error. Nothing is retried.
pub trait StorageService: Send + Sync {
    /// Retain `payload` on `topic`; an empty payload clears the topic.
    fn store_retained(&self, topic: &str, payload: &[u8], qos: QoS) -> StoreResult<()>;

    /// Retained messages whose topic satisfies `condition`, in no
    /// particular order.
    fn search_matching(&self, condition: &dyn MatchingCondition) -> StoreResult<Vec<RetainedMessage>>;

    /// Append `event` to the offline queue of `event.client_id`.
    fn store_publish_for_future(&self, event: PendingPublish) -> StoreResult<()>;

    /// The offline queue of `client_id`, oldest first. Does not clear it.
    fn retrieve_persisted_publishes(&self, client_id: &str) -> StoreResult<Vec<PendingPublish>>;

    fn clean_persisted_publishes(&self, client_id: &str) -> StoreResult<()>;

    /// Record `event` as sent and unacknowledged under `key`.
    fn add_in_flight(&self, event: PendingPublish, key: &str) -> StoreResult<()>;

    fn clean_in_flight(&self, key: &str) -> StoreResult<()>;

    fn retrieve_in_flight(&self, key: &str) -> StoreResult<Option<PendingPublish>>;

    fn add_new_subscription(&self, entry: SubscriptionEntry, client_id: &str) -> StoreResult<()>;

    fn remove_all_subscriptions(&self, client_id: &str) -> StoreResult<()>;

    fn retrieve_subscriptions(&self, client_id: &str) -> StoreResult<Vec<SubscriptionEntry>>;

    /// Every persisted subscription of every client. Used at startup to
    /// rebuild routing tables.
    fn retrieve_all_subscriptions(&self) -> StoreResult<Vec<SubscriptionEntry>>;
}

/// Entry counts of each collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub retained_topics: usize,
    pub offline_clients: usize,
    pub in_flight: usize,
    pub subscribed_clients: usize,
}

#[derive(Debug, Clone)]
pub struct Store<S: Substrate> {
    substrate: S,
    retained: RetainedRepository<S::Index>,
    offline: OfflineQueue<S::Index>,
    in_flight: InFlightTable<S::Index>,
    subscriptions: SubscriptionRegistry<S::Index>,
}

pub type SledStore = Store<SledSubstrate>;
pub type MemoryStore = Store<MemorySubstrate>;

impl<S: Substrate> Store<S> {
    /// Open (creating if needed) the four indexes on `substrate`.
    ///
    /// Must run once before anything else; calling it again on the same
    /// substrate yields a store over the same data. A failure here means
    /// the broker cannot start.
    pub fn init(substrate: S) -> StoreResult<Self> {
        let retained = RetainedRepository::new(substrate.open_or_create(RETAINED_INDEX)?);
        let offline = OfflineQueue::new(substrate.open_or_create(OFFLINE_INDEX)?);
        let in_flight = InFlightTable::new(substrate.open_or_create(INFLIGHT_INDEX)?);
        let subscriptions = SubscriptionRegistry::new(substrate.open_or_create(SUBSCRIPTIONS_INDEX)?);

        let store = Self {
            substrate,
            retained,
            offline,
            in_flight,
            subscriptions,
        };
        info!(
            indexes = ?[RETAINED_INDEX, OFFLINE_INDEX, INFLIGHT_INDEX, SUBSCRIPTIONS_INDEX],
            "store initialised"
        );
        Ok(store)
    }

    pub fn substrate(&self) -> &S {
        &self.substrate
    }

    pub fn retained(&self) -> &RetainedRepository<S::Index> {
        &self.retained
    }

    pub fn offline(&self) -> &OfflineQueue<S::Index> {
        &self.offline
    }

    pub fn in_flight(&self) -> &InFlightTable<S::Index> {
        &self.in_flight
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry<S::Index> {
        &self.subscriptions
    }

    /// Force every collection to durable storage.
    pub fn flush(&self) -> StoreResult<()> {
        self.retained.flush()?;
        self.offline.flush()?;
        self.in_flight.flush()?;
        self.subscriptions.flush()
    }

    /// Counts every collection. Each count walks its whole index.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            retained_topics: self.retained.len(),
            offline_clients: self.offline.len(),
            in_flight: self.in_flight.len(),
            subscribed_clients: self.subscriptions.len(),
        }
    }
}

impl Store<SledSubstrate> {
    /// Open the sled database described by `settings` and initialise the
    /// store on it.
    pub fn open(settings: &StorageSettings) -> StoreResult<Self> {
        Self::init(SledSubstrate::open(settings)?)
    }
}

impl Store<MemorySubstrate> {
    pub fn in_memory() -> StoreResult<Self> {
        Self::init(MemorySubstrate::new())
    }
}

impl<S: Substrate> StorageService for Store<S> {
    fn store_retained(&self, topic: &str, payload: &[u8], qos: QoS) -> StoreResult<()> {
        self.retained.store(topic, payload, qos)
    }

    fn search_matching(&self, condition: &dyn MatchingCondition) -> StoreResult<Vec<RetainedMessage>> {
        self.retained.search_matching(condition)
    }

    fn store_publish_for_future(&self, event: PendingPublish) -> StoreResult<()> {
        self.offline.append(event)
    }

    fn retrieve_persisted_publishes(&self, client_id: &str) -> StoreResult<Vec<PendingPublish>> {
        self.offline.retrieve(client_id)
    }

    fn clean_persisted_publishes(&self, client_id: &str) -> StoreResult<()> {
        self.offline.clean(client_id)
    }

    fn add_in_flight(&self, event: PendingPublish, key: &str) -> StoreResult<()> {
        self.in_flight.add(&event, key)
    }

    fn clean_in_flight(&self, key: &str) -> StoreResult<()> {
        self.in_flight.clean(key)
    }

    fn retrieve_in_flight(&self, key: &str) -> StoreResult<Option<PendingPublish>> {
        self.in_flight.get(key)
    }

    fn add_new_subscription(&self, entry: SubscriptionEntry, client_id: &str) -> StoreResult<()> {
        self.subscriptions.add(entry, client_id)
    }

    fn remove_all_subscriptions(&self, client_id: &str) -> StoreResult<()> {
        self.subscriptions.remove_all(client_id)
    }

    fn retrieve_subscriptions(&self, client_id: &str) -> StoreResult<Vec<SubscriptionEntry>> {
        self.subscriptions.for_client(client_id)
    }

    fn retrieve_all_subscriptions(&self) -> StoreResult<Vec<SubscriptionEntry>> {
        self.subscriptions.retrieve_all()
    }
}
