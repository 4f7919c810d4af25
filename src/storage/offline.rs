use tracing::debug;

use crate::broker::PendingPublish;
use crate::persistence::Index;
use crate::persistence::codec::{decode, encode};
use crate::utils::StoreResult;

/// Client id -> ordered list of publishes waiting for that client.
///
/// The whole queue lives under one key, so reconnecting a client costs a
/// single lookup. Appends go through `Index::update` and are atomic per
/// client, so concurrent appends never drop a message.
#[derive(Debug, Clone)]
pub struct OfflineQueue<I> {
    index: I,
}

impl<I: Index> OfflineQueue<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    pub fn append(&self, event: PendingPublish) -> StoreResult<()> {
        let client_id = event.client_id.clone();
        let name = self.index.name();
        let mut queued = 0;

        self.index.update(&client_id, |current| {
            let mut queue: Vec<PendingPublish> = match current {
                Some(bytes) => decode(name, &client_id, bytes)?,
                None => Vec::new(),
            };
            queue.push(event.clone());
            queued = queue.len();
            encode(name, &client_id, &queue).map(Some)
        })?;

        debug!(client_id = %client_id, topic = %event.topic, queued, "queued publish for offline client");
        Ok(())
    }

    /// The client's pending publishes in arrival order, empty if none.
    /// Reading never clears the queue.
    pub fn retrieve(&self, client_id: &str) -> StoreResult<Vec<PendingPublish>> {
        match self.index.get(client_id)? {
            Some(bytes) => decode(self.index.name(), client_id, &bytes),
            None => Ok(Vec::new()),
        }
    }

    pub fn clean(&self, client_id: &str) -> StoreResult<()> {
        if let Some(bytes) = self.index.remove(client_id)? {
            debug!(client_id, bytes = bytes.len(), "dropped offline queue");
        }
        Ok(())
    }

    /// Number of clients with a non-empty queue.
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
