//! Output destinations for trace lines
//!
//! A [`SinkManager`] owns up to three destinations (log file, stdout,
//! stderr) and serializes writers so a line is always emitted whole.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::config::Config;
use crate::runtime::SinkError;

/// Which side of the real call a line describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Before the real module is invoked
	Call,
	/// After the real module returned
	Return,
}

impl Phase {
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Call => "call",
			Self::Return => "return",
		}
	}
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One trace line, rendered through `Display`
///
/// `0x<pid> : 0x<tid> : <function> : <phase> : <body>`, with either id
/// omitted when disabled.
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
	pub process_id: Option<u32>,
	pub thread_id: Option<u64>,
	pub function: &'a str,
	pub phase: Phase,
	pub body: &'a str,
}

impl fmt::Display for LogLine<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(pid) = self.process_id {
			write!(f, "{pid:#010x} : ")?;
		}
		if let Some(tid) = self.thread_id {
			write!(f, "{tid:#018x} : ")?;
		}
		write!(f, "{} : {}", self.function, self.phase)?;
		if !self.body.is_empty() {
			write!(f, " : {}", self.body)?;
		}
		Ok(())
	}
}

/// How the log file handle is managed between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
	/// Open once on the first line and keep the handle
	KeepOpen,
	/// Open, append and close for every line
	ReopenPerLine,
}

/// Which destinations are active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSettings {
	pub file: Option<PathBuf>,
	pub file_mode: FileMode,
	pub stdout: bool,
	pub stderr: bool,
}

impl SinkSettings {
	#[must_use]
	pub fn from_config(config: &Config) -> Self {
		Self {
			file: config.effective_log_file().cloned(),
			file_mode: if config.flags.reopen_per_line() {
				FileMode::ReopenPerLine
			} else {
				FileMode::KeepOpen
			},
			stdout: config.flags.stdout_enabled(),
			stderr: config.flags.stderr_enabled(),
		}
	}
}

#[derive(Debug)]
struct FileSink {
	path: PathBuf,
	mode: FileMode,
	handle: Option<File>,
}

impl FileSink {
	fn write(&mut self, line: &[u8]) -> io::Result<()> {
		match self.mode {
			FileMode::ReopenPerLine => {
				let mut file = open_append(&self.path)?;
				file.write_all(line)?;
				file.flush()
			},
			FileMode::KeepOpen => {
				if self.handle.is_none() {
					self.handle = Some(open_append(&self.path)?);
				}
				let Some(file) = self.handle.as_mut() else {
					return Ok(());
				};
				let result = file.write_all(line).and_then(|()| file.flush());
				if result.is_err() {
					// Try a fresh handle next time
					self.handle = None;
				}
				result
			},
		}
	}
}

fn open_append(path: &Path) -> io::Result<File> {
	OpenOptions::new().create(true).append(true).open(path)
}

/// Serialized writer over every enabled destination
#[derive(Debug)]
pub struct SinkManager {
	file: Mutex<Option<FileSink>>,
	stdout: bool,
	stderr: bool,
}

impl SinkManager {
	/// Create the manager; nothing is opened until the first line
	#[must_use]
	pub fn new(settings: SinkSettings) -> Self {
		let file = settings.file.map(|path| FileSink {
			path,
			mode: settings.file_mode,
			handle: None,
		});
		Self {
			file: Mutex::new(file),
			stdout: settings.stdout,
			stderr: settings.stderr,
		}
	}

	/// Whether any destination is enabled at all
	#[must_use]
	pub fn is_active(&self) -> bool {
		self.stdout || self.stderr || self.file.lock().unwrap_or_else(PoisonError::into_inner).is_some()
	}

	/// Append `text` and a line terminator to every enabled destination
	///
	/// Failures are reported through diagnostics and otherwise ignored.
	pub fn write_line(&self, text: &str) {
		for error in self.try_write_line(text) {
			warn!("{}", error);
		}
	}

	/// Like [`write_line`](Self::write_line) but hands back every failure
	pub fn try_write_line(&self, text: &str) -> Vec<SinkError> {
		let mut line = String::with_capacity(text.len() + 1);
		line.push_str(text);
		line.push('\n');
		let bytes = line.as_bytes();

		let mut errors = Vec::new();
		let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

		if let Some(sink) = file.as_mut() {
			if let Err(e) = sink.write(bytes) {
				errors.push(SinkError::new("log file", e));
			}
		}

		if self.stdout {
			let mut out = io::stdout().lock();
			if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
				errors.push(SinkError::new("stdout", e));
			}
		}

		if self.stderr {
			let mut err = io::stderr().lock();
			if let Err(e) = err.write_all(bytes).and_then(|()| err.flush()) {
				errors.push(SinkError::new("stderr", e));
			}
		}

		drop(file);
		errors
	}
}
