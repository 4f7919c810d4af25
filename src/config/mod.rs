mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LoggingSettings, Settings, StorageSettings};

/// Environment variables are read as `POPSUB_<SECTION>__<KEY>`,
/// e.g. `POPSUB_STORAGE__FLUSH_EVERY_MS=0`.
pub const ENV_PREFIX: &str = "POPSUB";

/// Loads the configuration from `config/default` and environment variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Loads the configuration from the file at `path` (any extension the
/// `config` crate understands, optional) and environment variables,
/// then merges it over the default values.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();
    let storage = partial.storage;
    let logging = partial.logging;

    Ok(Settings {
        storage: StorageSettings {
            path: storage
                .as_ref()
                .and_then(|s| s.path.clone())
                .unwrap_or(default.storage.path),
            temporary: storage
                .as_ref()
                .and_then(|s| s.temporary)
                .unwrap_or(default.storage.temporary),
            flush_every_ms: match storage.as_ref().and_then(|s| s.flush_every_ms) {
                Some(0) => None,
                Some(ms) => Some(ms),
                None => default.storage.flush_every_ms,
            },
            cache_capacity: storage
                .as_ref()
                .and_then(|s| s.cache_capacity)
                .unwrap_or(default.storage.cache_capacity),
            sync_writes: storage
                .as_ref()
                .and_then(|s| s.sync_writes)
                .unwrap_or(default.storage.sync_writes),
        },
        logging: LoggingSettings {
            level: logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}
