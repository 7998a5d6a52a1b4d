//! Process-wide runtime
//!
//! The configuration is read and the real module loaded exactly once, by the
//! first entry point that needs them. Every later call observes the same
//! outcome, including a failed one.

mod context;
mod error;
mod loader;

pub use context::Runtime;
pub use error::{ConfigError, FormatError, Result, SinkError};
pub use loader::{DlLoader, LoadedModule, ModuleLoader};

use once_cell::sync::OnceCell;
use tracing::{error, info};

use crate::config::{Config, env_lookup};
use crate::util::logging::init_logging;

/// One-time holder of the initialization outcome
#[derive(Debug, Default)]
pub struct RuntimeCell {
	cell: OnceCell<Result<Runtime>>,
}

impl RuntimeCell {
	#[must_use]
	pub const fn new() -> Self {
		Self { cell: OnceCell::new() }
	}

	/// Initialize on first use, then return the stored outcome
	///
	/// Concurrent callers block until the single attempt completes.
	pub fn get_or_init<F, L>(&self, lookup: F, loader: &L) -> std::result::Result<&Runtime, &ConfigError>
	where
		F: Fn(&str) -> Option<String>,
		L: ModuleLoader + ?Sized,
	{
		self.cell.get_or_init(|| initialize(lookup, loader)).as_ref()
	}

	/// The stored outcome, `None` before the first attempt
	#[must_use]
	pub fn get(&self) -> Option<std::result::Result<&Runtime, &ConfigError>> {
		self.cell.get().map(Result::as_ref)
	}
}

static RUNTIME: RuntimeCell = RuntimeCell::new();

/// The process-wide runtime, initialized from the environment on first use
pub fn get() -> std::result::Result<&'static Runtime, &'static ConfigError> {
	RUNTIME.get_or_init(env_lookup, &DlLoader)
}

/// Initialize the process-wide runtime from an explicit source
///
/// Has no effect if the runtime was already initialized; the first outcome
/// is returned either way.
pub fn init_with<F, L>(lookup: F, loader: &L) -> std::result::Result<&'static Runtime, &'static ConfigError>
where
	F: Fn(&str) -> Option<String>,
	L: ModuleLoader + ?Sized,
{
	RUNTIME.get_or_init(lookup, loader)
}

fn initialize<F, L>(lookup: F, loader: &L) -> Result<Runtime>
where
	F: Fn(&str) -> Option<String>,
	L: ModuleLoader + ?Sized,
{
	init_logging();

	let outcome = Config::from_lookup(lookup).and_then(|config| {
		info!(
			"Configuration: module {}, log file {:?}, flags {}",
			config.module_path, config.log_file_path, config.flags
		);
		let module = loader.load(&config.module_path)?;
		Ok(Runtime::new(config, module))
	});

	if let Err(e) = &outcome {
		error!("{}", e);
	}
	outcome
}
