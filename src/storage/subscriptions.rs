use tracing::debug;

use crate::broker::SubscriptionEntry;
use crate::persistence::Index;
use crate::persistence::codec::{decode, encode};
use crate::utils::StoreResult;

/// Client id -> that client's persistent subscriptions.
///
/// A client holds at most one entry per topic filter; subscribing again to
/// the same filter replaces the entry in place, so the latest QoS wins.
#[derive(Debug, Clone)]
pub struct SubscriptionRegistry<I> {
    index: I,
}

impl<I: Index> SubscriptionRegistry<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn add(&self, entry: SubscriptionEntry, client_id: &str) -> StoreResult<()> {
        let name = self.index.name();

        self.index.update(client_id, |current| {
            let mut subs: Vec<SubscriptionEntry> = match current {
                Some(bytes) => decode(name, client_id, bytes)?,
                None => Vec::new(),
            };
            match subs.iter_mut().find(|s| s.topic_filter == entry.topic_filter) {
                Some(existing) => *existing = entry.clone(),
                None => subs.push(entry.clone()),
            }
            encode(name, client_id, &subs).map(Some)
        })?;

        debug!(client_id, filter = %entry.topic_filter, qos = ?entry.qos, "subscription stored");
        Ok(())
    }

    pub fn remove_all(&self, client_id: &str) -> StoreResult<()> {
        if self.index.remove(client_id)?.is_some() {
            debug!(client_id, "removed all subscriptions");
        }
        Ok(())
    }

    pub fn for_client(&self, client_id: &str) -> StoreResult<Vec<SubscriptionEntry>> {
        match self.index.get(client_id)? {
            Some(bytes) => decode(self.index.name(), client_id, &bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Every subscription of every client, clients in key order.
    pub fn retrieve_all(&self) -> StoreResult<Vec<SubscriptionEntry>> {
        let mut all = Vec::new();
        for entry in self.index.iter() {
            let (client_id, bytes) = entry?;
            let subs: Vec<SubscriptionEntry> = decode(self.index.name(), &client_id, &bytes)?;
            all.extend(subs);
        }
        Ok(all)
    }

    /// Number of clients with at least one subscription.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn flush(&self) -> StoreResult<()> {
        self.index.flush()
    }
}
