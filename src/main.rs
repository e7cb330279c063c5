//! iconbar — status-bar icon visibility layout engine.
//!
//! Reads shell events (`name>>data` lines) from stdin or a unix socket and
//! writes the resulting hide-sets as JSON lines on stdout.
//!
//! Run with:  `RUST_LOG=debug iconbar < events.txt`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging on stderr; stdout carries engine output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("iconbar v{} starting", env!("CARGO_PKG_VERSION"));

    iconbar_runtime::run().map_err(Into::into)
}
