//! The `error` module defines the error type returned by every storage
//! operation.
//!
//! A missing key is never an error: lookups return `None` or an empty
//! collection so callers can tell "no data" apart from a storage failure.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The substrate could not open or create a named index.
    #[error("storage unavailable: cannot open index '{index}': {source}")]
    StoreUnavailable {
        index: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stored value could not be encoded or decoded.
    #[error("serialization failed for '{key}' in index '{index}': {source}")]
    Serialization {
        index: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The substrate rejected a put or remove.
    #[error("write failed for '{key}' in index '{index}': {source}")]
    Write {
        index: String,
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The substrate failed while reading or scanning.
    #[error("read failed in index '{index}': {source}")]
    Read {
        index: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid QoS level {0}")]
    InvalidQos(u8),

    #[error("invalid topic filter '{0}'")]
    InvalidTopicFilter(String),
}

impl StoreError {
    pub(crate) fn unavailable(
        index: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::StoreUnavailable {
            index: index.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn write(
        index: &str,
        key: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::Write {
            index: index.to_string(),
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn read(
        index: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::Read {
            index: index.to_string(),
            source: source.into(),
        }
    }
}
