use tracing_subscriber::EnvFilter;

/// Install the global subscriber: JSON lines on stdout, level taken from
/// `RUST_LOG` with an `info` fallback.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
