use serde::Deserialize;

/// Top-level configuration settings for the store.
///
/// Includes settings for the storage substrate and for logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Configuration of the sled database backing the store.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageSettings {
    /// Directory holding the database files.
    pub path: String,
    /// Delete the database when it is dropped. Meant for tests.
    pub temporary: bool,
    /// Background flush interval. `None` flushes only on explicit request.
    pub flush_every_ms: Option<u64>,
    /// Page cache size in bytes.
    pub cache_capacity: u64,
    /// Flush to disk before every mutating call returns. Turning this off
    /// trades crash durability for throughput: writes then only reach disk
    /// on the background flush or an explicit `Store::flush`.
    pub sync_writes: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub storage: Option<PartialStorageSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

/// Partial storage settings.
///
/// A `flush_every_ms` of `0` disables background flushing.
#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
    pub temporary: Option<bool>,
    pub flush_every_ms: Option<u64>,
    pub cache_capacity: Option<u64>,
    pub sync_writes: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: "popsub_store".to_string(),
            temporary: false,
            flush_every_ms: Some(500),
            cache_capacity: 64 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the store has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
