//! The initialized proxy state shared by every entry point

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::config::Config;
use crate::ffi::{self, CK_FUNCTION_LIST, CK_FUNCTION_LIST_PTR, CK_RV, CKR_GENERAL_ERROR, CKR_OK, CRYPTOKI_VERSION};
use crate::format::{ArgValue, FunctionDescriptor, format_arguments};
use crate::proxy;
use crate::runtime::loader::LoadedModule;
use crate::sink::{LogLine, Phase, SinkManager, SinkSettings};

/// Configuration, sinks and the real module, fixed after construction
pub struct Runtime {
	config: Config,
	sinks: SinkManager,
	module: LoadedModule,
	proxy_list: CK_FUNCTION_LIST,
	missing: Mutex<BTreeSet<&'static str>>,
}

impl fmt::Debug for Runtime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Runtime")
			.field("config", &self.config)
			.field("sinks", &self.sinks)
			.field("module", &self.module)
			.finish_non_exhaustive()
	}
}

impl Runtime {
	#[must_use]
	pub fn new(config: Config, module: LoadedModule) -> Self {
		let sinks = SinkManager::new(SinkSettings::from_config(&config));
		let mut version = module.functions().version;
		if version.major == 0 && version.minor == 0 {
			version = CRYPTOKI_VERSION;
		}
		let proxy_list = proxy::function_list(version);
		Self {
			config,
			sinks,
			module,
			proxy_list,
			missing: Mutex::new(BTreeSet::new()),
		}
	}

	#[must_use]
	pub const fn config(&self) -> &Config {
		&self.config
	}

	#[must_use]
	pub const fn sinks(&self) -> &SinkManager {
		&self.sinks
	}

	/// The real module's function table
	#[must_use]
	pub const fn functions(&self) -> &CK_FUNCTION_LIST {
		self.module.functions()
	}

	/// The proxy's own table, handed out by `C_GetFunctionList`
	#[must_use]
	pub fn function_list_ptr(&self) -> CK_FUNCTION_LIST_PTR {
		std::ptr::from_ref(&self.proxy_list).cast_mut()
	}

	/// Functions a caller asked for that the real module does not provide
	#[must_use]
	pub fn missing_functions(&self) -> Vec<&'static str> {
		self.missing
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.copied()
			.collect()
	}

	/// Record one call around `invoke`
	///
	/// Writes the call line, runs `invoke`, writes the return line and hands
	/// back the status. `invoke` returns `None` when the real module lacks
	/// the function, which is reported as `CKR_GENERAL_ERROR`.
	///
	/// # Safety
	///
	/// `args` must be the arguments of the entry point described by
	/// `descriptor`, valid as the caller of that entry point guarantees.
	pub unsafe fn record<F>(&self, descriptor: &FunctionDescriptor, args: &[ArgValue], invoke: F) -> CK_RV
	where
		F: FnOnce(&Self) -> Option<CK_RV>,
	{
		let reveal = self.config.flags.reveal_secrets();
		let active = self.sinks.is_active();

		if active {
			let body = unsafe { format_arguments(descriptor, Phase::Call, args, CKR_OK, reveal) };
			self.emit(descriptor.name, Phase::Call, &body);
		}

		let rv = invoke(self).unwrap_or_else(|| {
			self.report_missing(descriptor.name);
			CKR_GENERAL_ERROR
		});

		if active {
			let body = unsafe { format_arguments(descriptor, Phase::Return, args, rv, reveal) };
			self.emit(descriptor.name, Phase::Return, &body);
		}

		rv
	}

	/// Warn about a missing function once, not on every call
	fn report_missing(&self, name: &'static str) {
		let first = self.missing.lock().unwrap_or_else(PoisonError::into_inner).insert(name);
		if first {
			warn!("{} is not provided by {}", name, self.config.module_path);
		} else {
			debug!("{} is not provided by {}", name, self.config.module_path);
		}
	}

	fn emit(&self, function: &str, phase: Phase, body: &str) {
		let flags = self.config.flags;
		let line = LogLine {
			process_id: flags.process_id_enabled().then(ffi::process_id),
			thread_id: flags.thread_id_enabled().then(ffi::thread_id),
			function,
			phase,
			body,
		};
		self.sinks.write_line(&line.to_string());
	}
}
