//! Substrate backed by `sled`
//!
//! One `sled::Db` holds every index of the store; each index is a named
//! `sled::Tree`. Keys are the UTF-8 bytes of the string key, so tree order
//! is the lexicographic byte order of the keys.
//!
//! Configuration options supported (see `StorageSettings`):
//! - `path`: directory of the database
//! - `temporary`: remove the database when it is dropped
//! - `flush_every_ms`: background flush interval, `None` disables it
//! - `cache_capacity`: page cache size in bytes
//! - `sync_writes`: flush after every mutation, so a call that returned
//!   `Ok` survives a crash

use std::sync::Arc;

use sled::{Db, Tree};
use tracing::{debug, info};

use crate::config::StorageSettings;
use crate::persistence::substrate::{Entries, Index, Substrate};
use crate::utils::{StoreError, StoreResult};

#[derive(Clone)]
pub struct SledSubstrate {
    db: Db,
    sync_writes: bool,
}

impl SledSubstrate {
    /// Open or create the sled database described by `settings`.
    pub fn open(settings: &StorageSettings) -> StoreResult<Self> {
        let db = sled::Config::new()
            .path(&settings.path)
            .temporary(settings.temporary)
            .flush_every_ms(settings.flush_every_ms)
            .cache_capacity(settings.cache_capacity)
            .open()
            .map_err(|e| StoreError::unavailable(&settings.path, e))?;

        info!(
            path = %settings.path,
            recovered = db.was_recovered(),
            sync_writes = settings.sync_writes,
            "opened sled database"
        );
        Ok(Self {
            db,
            sync_writes: settings.sync_writes,
        })
    }
}

impl Substrate for SledSubstrate {
    type Index = SledIndex;

    fn open_or_create(&self, name: &str) -> StoreResult<SledIndex> {
        let tree = self
            .db
            .open_tree(name)
            .map_err(|e| StoreError::unavailable(name, e))?;
        debug!(index = name, "opened index");
        Ok(SledIndex {
            name: Arc::from(name),
            tree,
            sync_writes: self.sync_writes,
        })
    }
}

impl std::fmt::Debug for SledSubstrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledSubstrate")
            .field("db", &"sled::Db")
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}

#[derive(Clone)]
pub struct SledIndex {
    name: Arc<str>,
    tree: Tree,
    sync_writes: bool,
}

impl SledIndex {
    /// Make a completed mutation durable before reporting success.
    fn sync(&self, key: &str) -> StoreResult<()> {
        if self.sync_writes {
            self.tree
                .flush()
                .map_err(|e| StoreError::write(&self.name, key, e))?;
        }
        Ok(())
    }
}

impl Index for SledIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.tree
            .get(key.as_bytes())
            .map(|v| v.map(|v| v.to_vec()))
            .map_err(|e| StoreError::read(&self.name, e))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<Option<Vec<u8>>> {
        let old = self
            .tree
            .insert(key.as_bytes(), value)
            .map_err(|e| StoreError::write(&self.name, key, e))?;
        self.sync(key)?;
        Ok(old.map(|v| v.to_vec()))
    }

    fn remove(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let old = self
            .tree
            .remove(key.as_bytes())
            .map_err(|e| StoreError::write(&self.name, key, e))?;
        if old.is_some() {
            self.sync(key)?;
        }
        Ok(old.map(|v| v.to_vec()))
    }

    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        self.tree
            .contains_key(key.as_bytes())
            .map_err(|e| StoreError::read(&self.name, e))
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn iter(&self) -> Entries<'_> {
        Box::new(self.tree.iter().map(move |res| {
            let (key, value) = res.map_err(|e| StoreError::read(&self.name, e))?;
            let key = String::from_utf8(key.to_vec()).map_err(|e| StoreError::read(&self.name, e))?;
            Ok((key, value.to_vec()))
        }))
    }

    fn update<F>(&self, key: &str, mut f: F) -> StoreResult<()>
    where
        F: FnMut(Option<&[u8]>) -> StoreResult<Option<Vec<u8>>>,
    {
        loop {
            let current = self
                .tree
                .get(key.as_bytes())
                .map_err(|e| StoreError::read(&self.name, e))?;
            let next = f(current.as_deref())?;

            let swapped = self
                .tree
                .compare_and_swap(key.as_bytes(), current, next)
                .map_err(|e| StoreError::write(&self.name, key, e))?;

            match swapped {
                Ok(()) => return self.sync(key),
                Err(_) => debug!(index = %self.name, key, "concurrent update, retrying"),
            }
        }
    }

    fn flush(&self) -> StoreResult<()> {
        self.tree
            .flush()
            .map(|_| ())
            .map_err(|e| StoreError::write(&self.name, "<flush>", e))
    }
}

impl std::fmt::Debug for SledIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledIndex")
            .field("name", &self.name)
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}
