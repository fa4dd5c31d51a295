use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

pub enum LogSink {
	File(File),
	Stderr,
}

/// Open the daemon log for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
	OpenOptions::new()
		.append(true)
		.create(true)
		.mode(0o644)
		.open(path)
}

/// Install the global subscriber. Every line carries a timestamp.
pub fn init(sink: LogSink, verbose: bool) {
	let level = if verbose { Level::DEBUG } else { Level::INFO };
	let builder = tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false);

	match sink {
		LogSink::File(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
		LogSink::Stderr => builder.with_writer(io::stderr).init(),
	}
}
