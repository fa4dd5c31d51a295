use std::io;
use std::path::{Path, PathBuf};

use myinit_daemon::{absolutize, DaemonError, DaemonPaths, PidFile};
use myinit_supervisor::{reload, Supervisor};
use tokio::signal::unix::{signal, SignalKind};

use crate::config;
use crate::logs::{self, LogSink};
use crate::Cli;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("cannot resolve path {}: {source}", path.display())]
	Path { path: PathBuf, source: io::Error },
	#[error("cannot open log file {}: {source}", path.display())]
	LogFile { path: PathBuf, source: io::Error },
	#[error(transparent)]
	Detach(#[from] DaemonError),
	#[error("failed to start runtime: {0}")]
	Runtime(io::Error),
	#[error("failed to install signal handlers: {0}")]
	Signals(io::Error),
}

/// Resolve settings, detach, and supervise until SIGTERM or SIGINT.
pub fn run(cli: Cli) -> Result<(), StartupError> {
	let paths = DaemonPaths::new("myinit");
	let settings_path = cli.settings.clone().unwrap_or_else(|| paths.settings_path());
	let settings = config::load_settings(&settings_path);

	let config_path = resolve(&cli.config)?;
	let pid_path = resolve(
		&cli.daemon
			.pid_file
			.or(settings.daemon.pid_file)
			.unwrap_or_else(|| paths.pid_path()),
	)?;

	// The log is opened while errors can still reach the terminal.
	let sink = match (&cli.daemon.log_file, cli.daemon.foreground) {
		(None, true) => LogSink::Stderr,
		(explicit, _) => {
			let path = explicit.clone().unwrap_or(settings.daemon.log_file);
			let file = logs::open_log_file(&path)
				.map_err(|source| StartupError::LogFile { path, source })?;
			LogSink::File(file)
		}
	};

	if !cli.daemon.foreground {
		myinit_daemon::detach()?;
	}
	logs::init(sink, cli.verbose);
	tracing::info!("myinit started (pid {})", std::process::id());

	let pid_file = match PidFile::create(&pid_path) {
		Ok(pid_file) => Some(pid_file),
		Err(e) => {
			tracing::warn!("{}", e);
			None
		}
	};

	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.map_err(StartupError::Runtime)?;
	let result = runtime.block_on(supervise(config_path, settings.supervisor.capacity));

	if let Some(pid_file) = pid_file {
		pid_file.remove();
	}
	result
}

async fn supervise(config_path: PathBuf, capacity: usize) -> Result<(), StartupError> {
	let mut supervisor = Supervisor::new(config_path, capacity);
	reload::listen_for_hangup(supervisor.reload_flag()).map_err(StartupError::Signals)?;
	let mut terminate = signal(SignalKind::terminate()).map_err(StartupError::Signals)?;
	let mut interrupt = signal(SignalKind::interrupt()).map_err(StartupError::Signals)?;

	// Supervised children are left running, as if the daemon had been killed.
	tokio::select! {
		_ = supervisor.run() => {},
		_ = terminate.recv() => tracing::info!("received SIGTERM, shutting down"),
		_ = interrupt.recv() => tracing::info!("received SIGINT, shutting down"),
	}
	Ok(())
}

fn resolve(path: &Path) -> Result<PathBuf, StartupError> {
	absolutize(path).map_err(|source| StartupError::Path {
		path: path.to_path_buf(),
		source,
	})
}
