//! Internal diagnostics
//!
//! Trace lines go to the configured sinks. This module only covers the
//! proxy's own messages about itself, which always go to stderr.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Enables debug diagnostics when set to any value
pub const DEBUG_VAR: &str = "MODULE_LOGGER_DEBUG";

static INIT: Once = Once::new();

/// Initialize the tracing system
///
/// Sets up tracing with an `EnvFilter` that:
/// - Honors the `RUST_LOG` environment variable if set
/// - Uses `MODULE_LOGGER_DEBUG` to enable debug output
/// - Only logs warnings and errors by default
///
/// A subscriber installed by the host application is left in place.
pub fn init_logging() {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive()));

		let _ = tracing_subscriber::registry()
			.with(fmt::layer().with_target(true).with_writer(std::io::stderr))
			.with(filter)
			.try_init();
	});
}

fn default_directive() -> &'static str {
	if std::env::var_os(DEBUG_VAR).is_some() {
		"pkcs11_logger=debug"
	} else {
		"pkcs11_logger=warn"
	}
}
