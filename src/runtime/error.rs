//! Error types for the proxy
//!
//! Only [`ConfigError`] ever reaches an application, and then only as
//! `CKR_GENERAL_ERROR`. Formatting and sink failures are absorbed where they
//! happen.

use std::io;
use thiserror::Error;

use crate::ffi::CK_RV;

/// Result type for configuration and module loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Failure to configure the proxy or to reach the real module
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A required environment variable is unset or empty
	#[error("Environment variable {0} is not defined")]
	MissingVariable(&'static str),

	/// A path was provided wrapped in quote characters
	#[error("Value of {0} environment variable needs to be provided without enclosing quotes")]
	QuotedValue(&'static str),

	/// The flags value is not an unsigned integer
	#[error("Unable to read the value of {variable} environment variable as a number: {value:?}")]
	InvalidFlags {
		/// Name of the variable
		variable: &'static str,
		/// The rejected value
		value: String,
	},

	/// A path contains an interior NUL byte
	#[error("Value of {0} environment variable contains a NUL byte")]
	InvalidPath(&'static str),

	/// The dynamic loader refused the module
	#[error("Unable to load PKCS#11 library {path:?}: {reason}")]
	LoadFailed {
		/// Path handed to the loader
		path: String,
		/// Text reported by the loader
		reason: String,
	},

	/// `C_GetFunctionList` of the real module reported a failure
	#[error("C_GetFunctionList of the real module returned {0:#x}")]
	GetFunctionListFailed(CK_RV),

	/// `C_GetFunctionList` of the real module succeeded without a table
	#[error("C_GetFunctionList of the real module returned a null function list")]
	MissingFunctionList,
}

/// A parameter that cannot be rendered safely
///
/// Always recovered by the formatter as an "unreadable" marker.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
	/// The length is held behind a null pointer
	#[error("length pointer is null")]
	NullLengthPointer,

	/// The declared length is larger than anything the proxy will read
	#[error("length {0} exceeds the dump limit")]
	LengthOutOfRange(u64),

	/// The module reported `CK_UNAVAILABLE_INFORMATION` as the length
	#[error("length is unavailable")]
	UnavailableLength,

	/// Nested attribute templates go deeper than the proxy follows
	#[error("attribute templates nested too deeply")]
	NestingTooDeep,
}

/// Failure to emit a line to one destination
#[derive(Debug, Error)]
#[error("Unable to write to {destination}: {source}")]
pub struct SinkError {
	/// Which destination failed
	pub destination: &'static str,
	/// The underlying I/O error
	#[source]
	pub source: io::Error,
}

impl SinkError {
	pub(crate) const fn new(destination: &'static str, source: io::Error) -> Self {
		Self { destination, source }
	}
}
