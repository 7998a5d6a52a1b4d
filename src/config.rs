//! Environment driven configuration
//!
//! The proxy is configured exclusively through three environment variables,
//! read once when the runtime is first needed.

use std::fmt;
use std::path::PathBuf;

use crate::runtime::{ConfigError, Result};

/// Path of the real PKCS#11 module (required)
pub const LIBRARY_PATH_VAR: &str = "MODULE_LIBRARY_PATH";
/// Path of the log file (optional)
pub const LOG_FILE_PATH_VAR: &str = "MODULE_LOG_FILE_PATH";
/// Behaviour flags (optional)
pub const FLAGS_VAR: &str = "MODULE_FLAGS";

/// Bitmask read from [`FLAGS_VAR`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u64);

impl Flags {
	/// Do not write the log file even if a path is configured
	pub const DISABLE_LOG_FILE: u64 = 0x01;
	/// Omit the process id from every line
	pub const DISABLE_PROCESS_ID: u64 = 0x02;
	/// Omit the thread id from every line
	pub const DISABLE_THREAD_ID: u64 = 0x04;
	/// Log PIN values instead of a placeholder
	pub const ENABLE_PIN: u64 = 0x08;
	/// Copy every line to standard output
	pub const ENABLE_STDOUT: u64 = 0x10;
	/// Copy every line to standard error
	pub const ENABLE_STDERR: u64 = 0x20;
	/// Open and close the log file around every line
	pub const REOPEN_LOG_FILE: u64 = 0x40;

	#[must_use]
	pub const fn new(bits: u64) -> Self {
		Self(bits)
	}

	#[must_use]
	pub const fn bits(self) -> u64 {
		self.0
	}

	#[must_use]
	pub const fn contains(self, flag: u64) -> bool {
		self.0 & flag == flag
	}

	#[must_use]
	pub const fn file_disabled(self) -> bool {
		self.contains(Self::DISABLE_LOG_FILE)
	}

	#[must_use]
	pub const fn process_id_enabled(self) -> bool {
		!self.contains(Self::DISABLE_PROCESS_ID)
	}

	#[must_use]
	pub const fn thread_id_enabled(self) -> bool {
		!self.contains(Self::DISABLE_THREAD_ID)
	}

	#[must_use]
	pub const fn reveal_secrets(self) -> bool {
		self.contains(Self::ENABLE_PIN)
	}

	#[must_use]
	pub const fn stdout_enabled(self) -> bool {
		self.contains(Self::ENABLE_STDOUT)
	}

	#[must_use]
	pub const fn stderr_enabled(self) -> bool {
		self.contains(Self::ENABLE_STDERR)
	}

	#[must_use]
	pub const fn reopen_per_line(self) -> bool {
		self.contains(Self::REOPEN_LOG_FILE)
	}
}

impl fmt::Display for Flags {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// Resolved configuration, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Path of the real module
	pub module_path: String,
	/// Path of the log file, `None` when no file sink is configured
	pub log_file_path: Option<PathBuf>,
	/// Behaviour flags
	pub flags: Flags,
}

impl Config {
	/// Read the configuration from the process environment
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(env_lookup)
	}

	/// Read the configuration through an arbitrary variable lookup
	///
	/// Empty values are treated exactly like unset ones.
	pub fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|value| !value.is_empty());

		let module_path = read(LIBRARY_PATH_VAR).ok_or(ConfigError::MissingVariable(LIBRARY_PATH_VAR))?;
		reject_quotes(LIBRARY_PATH_VAR, &module_path)?;

		let log_file_path = match read(LOG_FILE_PATH_VAR) {
			Some(path) => {
				reject_quotes(LOG_FILE_PATH_VAR, &path)?;
				Some(PathBuf::from(path))
			},
			None => None,
		};

		let flags = match read(FLAGS_VAR) {
			Some(value) => Flags::new(parse_flags(&value).ok_or(ConfigError::InvalidFlags {
				variable: FLAGS_VAR,
				value,
			})?),
			None => Flags::default(),
		};

		Ok(Self {
			module_path,
			log_file_path,
			flags,
		})
	}

	/// Log file path, unless the file sink is disabled
	#[must_use]
	pub fn effective_log_file(&self) -> Option<&PathBuf> {
		if self.flags.file_disabled() {
			None
		} else {
			self.log_file_path.as_ref()
		}
	}
}

/// Process environment lookup, lossy for non-UTF-8 values
pub(crate) fn env_lookup(name: &str) -> Option<String> {
	std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

fn reject_quotes(variable: &'static str, value: &str) -> Result<()> {
	if value.starts_with('"') || value.starts_with('\'') {
		return Err(ConfigError::QuotedValue(variable));
	}
	Ok(())
}

/// Decimal, or hexadecimal with a `0x` prefix; no sign, no whitespace
fn parse_flags(value: &str) -> Option<u64> {
	let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		Some(hex) => (hex, 16),
		None => (value, 10),
	};
	if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
		return None;
	}
	u64::from_str_radix(digits, radix).ok()
}
