//! JSON encoding of the records kept in each index.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::utils::{StoreError, StoreResult};

pub fn encode<T: Serialize + ?Sized>(index: &str, key: &str, value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| StoreError::Serialization {
        index: index.to_string(),
        key: key.to_string(),
        source,
    })
}

pub fn decode<T: DeserializeOwned>(index: &str, key: &str, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|source| StoreError::Serialization {
        index: index.to_string(),
        key: key.to_string(),
        source,
    })
}
