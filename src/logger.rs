//! Logging setup

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialize stderr logging, filtered by `RUST_LOG` (default INFO).
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
