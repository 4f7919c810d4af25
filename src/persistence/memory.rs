//! In-memory substrate. Does not survive the process, but clones share the
//! same indexes, so re-opening a clone behaves like a restart of the store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::persistence::substrate::{Entries, Index, Substrate};
use crate::utils::StoreResult;

#[derive(Debug, Clone, Default)]
pub struct MemorySubstrate {
    indexes: Arc<Mutex<HashMap<String, MemoryIndex>>>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Substrate for MemorySubstrate {
    type Index = MemoryIndex;

    fn open_or_create(&self, name: &str) -> StoreResult<MemoryIndex> {
        let mut indexes = self.indexes.lock().unwrap_or_else(PoisonError::into_inner);
        let index = indexes
            .entry(name.to_string())
            .or_insert_with(|| MemoryIndex {
                name: Arc::from(name),
                entries: Arc::default(),
            });
        Ok(index.clone())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryIndex {
    name: Arc<str>,
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl Index for MemoryIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<Option<Vec<u8>>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.insert(key.to_string(), value))
    }

    fn remove(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key))
    }

    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.contains_key(key))
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn iter(&self) -> Entries<'_> {
        // snapshot, so callers never hold the lock while iterating
        let snapshot: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| Ok((k.clone(), v.clone())))
            .collect();
        Box::new(snapshot.into_iter())
    }

    fn update<F>(&self, key: &str, mut f: F) -> StoreResult<()>
    where
        F: FnMut(Option<&[u8]>) -> StoreResult<Option<Vec<u8>>>,
    {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let next = f(entries.get(key).map(Vec::as_slice))?;
        match next {
            Some(next) => {
                entries.insert(key.to_string(), next);
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}
