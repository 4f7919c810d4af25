use tracing::debug;

use crate::broker::{MatchingCondition, QoS, RetainedMessage};
use crate::persistence::Index;
use crate::persistence::codec::{decode, encode};
use crate::utils::StoreResult;

/// Topic -> last retained message. One entry per topic, last write wins.
#[derive(Debug, Clone)]
pub struct RetainedRepository<I> {
    index: I,
}

impl<I: Index> RetainedRepository<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Retain `payload` on `topic`. An empty payload clears the topic
    /// instead, which is a no-op when nothing was retained.
    pub fn store(&self, topic: &str, payload: &[u8], qos: QoS) -> StoreResult<()> {
        if payload.is_empty() {
            if self.index.remove(topic)?.is_some() {
                debug!(topic, "cleared retained message");
            }
            return Ok(());
        }

        let msg = RetainedMessage::new(payload.to_vec(), qos);
        let bytes = encode(self.index.name(), topic, &msg)?;
        self.index.put(topic, bytes)?;
        debug!(topic, ?qos, len = payload.len(), "retained message");
        Ok(())
    }

    pub fn get(&self, topic: &str) -> StoreResult<Option<RetainedMessage>> {
        self.index
            .get(topic)?
            .map(|bytes| decode(self.index.name(), topic, &bytes))
            .transpose()
    }

    /// Every `(topic, message)` whose topic satisfies `condition`.
    ///
    /// Scans the whole index; only matching entries are decoded, so a
    /// corrupt record fails the scan only if it would have been returned.
    pub fn matching_entries(
        &self,
        condition: &dyn MatchingCondition,
    ) -> StoreResult<Vec<(String, RetainedMessage)>> {
        debug!(index = self.index.name(), "scanning retained messages");

        let mut results = Vec::new();
        for entry in self.index.iter() {
            let (topic, bytes) = entry?;
            if condition.matches(&topic) {
                let msg = decode(self.index.name(), &topic, &bytes)?;
                results.push((topic, msg));
            }
        }
        Ok(results)
    }

    pub fn search_matching(
        &self,
        condition: &dyn MatchingCondition,
    ) -> StoreResult<Vec<RetainedMessage>> {
        Ok(self
            .matching_entries(condition)?
            .into_iter()
            .map(|(_, msg)| msg)
            .collect())
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
