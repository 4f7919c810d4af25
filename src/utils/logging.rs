use tracing_subscriber::EnvFilter;

/// Initialize tracing for the store and its binary.
///
/// `RUST_LOG`, when set and valid, takes precedence over `default_level`.
/// Otherwise the store logs at `default_level` (unknown names fall back to
/// `info`) and sled's own page-cache chatter is capped at `warn`.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_target(false)
        .try_init();
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(default_level)))
}

fn directives(default_level: &str) -> String {
    let level = match default_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };
    format!("{level},sled=warn")
}
