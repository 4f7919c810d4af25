use tracing::{debug, warn};

use crate::broker::PendingPublish;
use crate::persistence::Index;
use crate::persistence::codec::{decode, encode};
use crate::utils::StoreResult;

/// Delivery key -> publish sent with QoS 1 or 2 and not yet acknowledged.
///
/// Keys are built by the caller, normally with
/// [`in_flight_key`](crate::broker::in_flight_key).
#[derive(Debug, Clone)]
pub struct InFlightTable<I> {
    index: I,
}

impl<I: Index> InFlightTable<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Record `event` under `key`, replacing whatever was there.
    pub fn add(&self, event: &PendingPublish, key: &str) -> StoreResult<()> {
        let bytes = encode(self.index.name(), key, event)?;
        if let Some(previous) = self.index.put(key, bytes.clone())? {
            if previous != bytes {
                warn!(key, "replaced a different outstanding in-flight message");
            }
        }
        debug!(key, client_id = %event.client_id, "in-flight");
        Ok(())
    }

    pub fn get(&self, key: &str) -> StoreResult<Option<PendingPublish>> {
        self.index
            .get(key)?
            .map(|bytes| decode(self.index.name(), key, &bytes))
            .transpose()
    }

    pub fn clean(&self, key: &str) -> StoreResult<()> {
        if self.index.remove(key)?.is_some() {
            debug!(key, "in-flight message acknowledged");
        }
        Ok(())
    }

    /// All outstanding records of `client_id`, ordered by message id.
    ///
    /// Client ids may themselves contain `-`, so the key prefix only narrows
    /// the scan and the stored client id decides.
    pub fn records_for_client(&self, client_id: &str) -> StoreResult<Vec<(String, PendingPublish)>> {
        let prefix = format!("{client_id}-");
        let mut records = Vec::new();

        for entry in self.index.iter() {
            let (key, bytes) = entry?;
            if !key.starts_with(&prefix) {
                continue;
            }
            let event: PendingPublish = decode(self.index.name(), &key, &bytes)?;
            if event.client_id == client_id {
                records.push((key, event));
            }
        }

        records.sort_by_key(|(_, event)| event.message_id);
        Ok(records)
    }

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
