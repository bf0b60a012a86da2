//! Logging prelude module for convenient access to tracing macros.

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset; the environment
/// variable always wins so individual modules can be turned up:
///
/// ```bash
/// RUST_LOG=clipsync::session=trace clipsync watch ./shared
/// ```
///
/// Output goes to stderr in compact single-line form, keeping stdout free
/// for manifest and diff output.
pub fn init_tracing(default_filter: &str) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.compact()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
