//! Logging setup for the Layerfile binaries.
//!
//! Logs always go to stderr: the language server speaks JSON-RPC on stdout and the CLI prints
//! its results there. `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::EnvFilter;

pub fn init(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    // A subscriber may already be installed (tests, embedding hosts); keep that one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
