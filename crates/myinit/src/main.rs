mod config;
mod daemon;
mod logs;

use std::path::PathBuf;

use clap::Parser;
use myinit_daemon::DaemonArgs;
use owo_colors::OwoColorize;

/// Keep a list of commands running, restarting them when they exit.
///
/// Each line of CONFIG is `EXECUTABLE [ARGS...] STDIN STDOUT` with absolute
/// paths; stderr goes to the stdout file. Send SIGHUP to re-read the file.
#[derive(Debug, Parser)]
#[command(name = "myinit", version)]
pub struct Cli {
	/// Process list to supervise
	pub config: PathBuf,
	/// Read daemon settings from this TOML file
	#[arg(long, value_name = "PATH")]
	pub settings: Option<PathBuf>,
	/// Also log debug events
	#[arg(short, long)]
	pub verbose: bool,
	#[command(flatten)]
	pub daemon: DaemonArgs,
}

fn main() {
	let cli = Cli::parse();

	if let Err(e) = daemon::run(cli) {
		tracing::error!("{}", e);
		eprintln!("{} {}", "error:".red().bold(), e);
		std::process::exit(1);
	}
}
