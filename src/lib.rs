//! pkcs11-logger-rs - A tracing proxy for PKCS#11 modules
//!
//! The library is loaded by an application in place of its real PKCS#11
//! module. Every call is forwarded to the real module unchanged, and a
//! human readable line is written before and after it with the function
//! name, its arguments and the returned status.
//!
//! # Configuration
//!
//! Read once from the environment on the first call:
//!
//! - `MODULE_LIBRARY_PATH`: path of the real module (required)
//! - `MODULE_LOG_FILE_PATH`: path of the log file (optional)
//! - `MODULE_FLAGS`: behaviour bits, see [`config::Flags`] (optional)
//!
//! ```text
//! MODULE_LIBRARY_PATH=/usr/lib/softhsm/libsofthsm2.so \
//! MODULE_LOG_FILE_PATH=/tmp/pkcs11.log \
//! MODULE_FLAGS=0x10 \
//!     pkcs11-tool --module target/release/libpkcs11_logger.so --list-slots
//! ```
//!
//! A configuration or loading failure makes every entry point return
//! `CKR_GENERAL_ERROR` without touching the real module.

pub mod config;
pub mod ffi;
pub mod format;
pub mod proxy;
pub mod recorder;
pub mod runtime;
pub mod sink;
pub mod util;

pub use config::{Config, Flags};
pub use runtime::{ConfigError, DlLoader, FormatError, LoadedModule, ModuleLoader, Runtime, RuntimeCell, SinkError};
pub use sink::{LogLine, Phase, SinkManager, SinkSettings};
