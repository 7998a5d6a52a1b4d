use std::env;
use std::fs;
use std::process::Command;
use std::sync::Arc;
use std::thread;

use pkcs11_logger::sink::FileMode;
use pkcs11_logger::{LogLine, Phase, SinkManager, SinkSettings};
use tempfile::tempdir;

fn file_settings(path: std::path::PathBuf, file_mode: FileMode) -> SinkSettings {
	SinkSettings {
		file: Some(path),
		file_mode,
		stdout: false,
		stderr: false,
	}
}

/// Set in the re-executed test binary to pick its console destinations
const CONSOLE_CHILD_VAR: &str = "PKCS11_LOGGER_TEST_CONSOLE_SINKS";
const CONSOLE_LINE: &str = "C_Finalize : call : pReserved: NULL";

#[test]
fn console_destinations_receive_lines() {
	if let Some(which) = env::var_os(CONSOLE_CHILD_VAR) {
		let (stdout, stderr) = match which.to_str() {
			Some("stdout") => (true, false),
			Some("stderr") => (false, true),
			_ => (true, true),
		};
		let sinks = SinkManager::new(SinkSettings {
			file: None,
			file_mode: FileMode::KeepOpen,
			stdout,
			stderr,
		});
		assert!(sinks.is_active());
		assert!(sinks.try_write_line(CONSOLE_LINE).is_empty());
		return;
	}

	let expected = format!("{CONSOLE_LINE}\n");
	for (which, on_stdout, on_stderr) in [("stdout", true, false), ("stderr", false, true), ("both", true, true)] {
		let output = Command::new(env::current_exe().unwrap())
			.args(["--exact", "console_destinations_receive_lines", "--nocapture", "--test-threads=1"])
			.env(CONSOLE_CHILD_VAR, which)
			.output()
			.unwrap();
		assert!(output.status.success(), "{which}: {output:?}");

		let stdout = String::from_utf8_lossy(&output.stdout);
		let stderr = String::from_utf8_lossy(&output.stderr);
		assert_eq!(stdout.contains(&expected), on_stdout, "{which}: {stdout}");
		assert_eq!(stderr.contains(&expected), on_stderr, "{which}: {stderr}");
	}
}

#[test]
fn line_with_both_ids() {
	let line = LogLine {
		process_id: Some(0x1234),
		thread_id: Some(0xabcd),
		function: "C_Initialize",
		phase: Phase::Call,
		body: "pInitArgs: NULL",
	};
	assert_eq!(
		line.to_string(),
		"0x00001234 : 0x000000000000abcd : C_Initialize : call : pInitArgs: NULL"
	);
}

#[test]
fn line_without_process_id_starts_with_thread_id() {
	let line = LogLine {
		process_id: None,
		thread_id: Some(7),
		function: "C_Finalize",
		phase: Phase::Return,
		body: "rv: 0 (CKR_OK)",
	};
	assert_eq!(line.to_string(), "0x0000000000000007 : C_Finalize : return : rv: 0 (CKR_OK)");
}

#[test]
fn line_without_ids_starts_with_function() {
	let line = LogLine {
		process_id: None,
		thread_id: None,
		function: "C_Logout",
		phase: Phase::Call,
		body: "",
	};
	assert_eq!(line.to_string(), "C_Logout : call");
}

#[test]
fn nothing_is_created_before_first_line() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("trace.log");

	let sinks = SinkManager::new(file_settings(path.clone(), FileMode::KeepOpen));
	assert!(sinks.is_active());
	assert!(!path.exists());

	sinks.write_line("first");
	assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");
}

#[test]
fn keep_open_appends_to_existing_file() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("trace.log");
	fs::write(&path, "earlier\n").unwrap();

	let sinks = SinkManager::new(file_settings(path.clone(), FileMode::KeepOpen));
	sinks.write_line("one");
	sinks.write_line("two");

	assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\none\ntwo\n");
}

#[test]
fn reopen_recreates_deleted_file() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("trace.log");

	let sinks = SinkManager::new(file_settings(path.clone(), FileMode::ReopenPerLine));
	sinks.write_line("before");
	assert_eq!(fs::read_to_string(&path).unwrap(), "before\n");

	fs::remove_file(&path).unwrap();
	assert!(!path.exists());

	sinks.write_line("after");
	assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
}

#[test]
fn no_destination_is_inactive() {
	let sinks = SinkManager::new(SinkSettings {
		file: None,
		file_mode: FileMode::KeepOpen,
		stdout: false,
		stderr: false,
	});
	assert!(!sinks.is_active());
	assert!(sinks.try_write_line("dropped").is_empty());
}

#[test]
fn unwritable_file_is_reported_and_absorbed() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("missing").join("trace.log");

	let sinks = SinkManager::new(file_settings(path.clone(), FileMode::ReopenPerLine));
	let errors = sinks.try_write_line("lost");

	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].destination, "log file");
	assert!(!path.exists());

	// The infallible variant only warns
	sinks.write_line("lost again");
}

#[test]
fn concurrent_lines_are_never_interleaved() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("trace.log");
	let sinks = Arc::new(SinkManager::new(file_settings(path.clone(), FileMode::KeepOpen)));

	let threads = 8;
	let lines_per_thread = 200;
	let handles = (0..threads)
		.map(|t| {
			let sinks = Arc::clone(&sinks);
			thread::spawn(move || {
				let payload = format!("{t}").repeat(64);
				for _ in 0..lines_per_thread {
					sinks.write_line(&payload);
				}
			})
		})
		.collect::<Vec<_>>();
	for handle in handles {
		handle.join().unwrap();
	}

	let contents = fs::read_to_string(&path).unwrap();
	let lines = contents.lines().collect::<Vec<_>>();
	assert_eq!(lines.len(), threads * lines_per_thread);
	for line in lines {
		assert_eq!(line.len(), 64);
		let first = line.chars().next().unwrap();
		assert!(line.chars().all(|c| c == first), "interleaved line {line:?}");
	}
}
