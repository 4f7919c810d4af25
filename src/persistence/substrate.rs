use std::fmt::Debug;

use crate::utils::StoreResult;

/// Ordered `(key, value)` pairs produced by a full index scan.
pub type Entries<'a> = Box<dyn Iterator<Item = StoreResult<(String, Vec<u8>)>> + 'a>;

/// A durable (or not) store of independently named indexes.
pub trait Substrate: Clone + Debug + Send + Sync + 'static {
    type Index: Index;

    /// Open the index called `name`, creating it if it does not exist yet.
    /// Opening the same name twice yields handles onto the same data.
    fn open_or_create(&self, name: &str) -> StoreResult<Self::Index>;
}

/// One sorted mapping from string keys to byte values.
///
/// Every single call is atomic. `update` is the only way to make a
/// read-modify-write of one key atomic as a whole.
pub trait Index: Clone + Debug + Send + Sync + 'static {
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Insert or overwrite `key`, returning the previous value.
    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<Option<Vec<u8>>>;

    /// Remove `key`, returning the previous value. Removing an absent key
    /// succeeds with `None`.
    fn remove(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    fn contains_key(&self, key: &str) -> StoreResult<bool>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scan all entries in key order.
    fn iter(&self) -> Entries<'_>;

    /// Atomically replace the value at `key` with `f(current)`.
    ///
    /// `f` may run more than once if another writer races on the same key,
    /// so it must not have side effects beyond computing the new value.
    /// Returning `Ok(None)` removes the key; returning an error aborts the
    /// update and leaves the stored value untouched.
    fn update<F>(&self, key: &str, f: F) -> StoreResult<()>
    where
        F: FnMut(Option<&[u8]>) -> StoreResult<Option<Vec<u8>>>;

    fn flush(&self) -> StoreResult<()>;
}
