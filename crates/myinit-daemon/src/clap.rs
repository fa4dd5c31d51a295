use std::path::PathBuf;

use clap::Args;

/// Flags shared by every binary that runs as a detached daemon.
///
/// Flatten into an application's own parser with `#[command(flatten)]`.
#[derive(Debug, Clone, Default, Args)]
pub struct DaemonArgs {
	/// Stay attached to the terminal and log to stderr
	#[arg(short, long)]
	pub foreground: bool,
	/// Write the daemon's PID to this file instead of the default location
	#[arg(long, value_name = "PATH")]
	pub pid_file: Option<PathBuf>,
	/// Append log lines to this file instead of the default location
	#[arg(long, value_name = "PATH")]
	pub log_file: Option<PathBuf>,
}
