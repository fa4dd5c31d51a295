use std::fs::OpenOptions;
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use nix::sys::stat::{umask, Mode};
use nix::unistd::{dup2, fork, setsid, ForkResult};

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
	#[error("fork failed: {0}")]
	Fork(nix::Error),
	#[error("setsid failed: {0}")]
	Setsid(nix::Error),
	#[error("chdir to / failed: {0}")]
	Chdir(io::Error),
	#[error("failed to open /dev/null: {0}")]
	DevNull(io::Error),
	#[error("failed to redirect fd {fd}: {source}")]
	Redirect { fd: i32, source: nix::Error },
	#[error("failed to write pid file {}: {source}", path.display())]
	PidFile { path: PathBuf, source: io::Error },
}

/// Detach the calling process from its controlling terminal.
///
/// Classic double fork: the original process and the intermediate session
/// leader both exit with status 0, and only the grandchild returns from this
/// function. The survivor runs in a new session with umask 0, `/` as its
/// working directory and its standard streams bound to `/dev/null`.
///
/// Must be called before any threads (including an async runtime) exist.
/// Descriptors opened earlier, such as a log file, stay open.
pub fn detach() -> Result<(), DaemonError> {
	// SAFETY: no other threads exist yet, so the child cannot inherit a
	// lock held by a thread that will not run in it.
	match unsafe { fork() }.map_err(DaemonError::Fork)? {
		ForkResult::Parent { .. } => std::process::exit(0),
		ForkResult::Child => {}
	}

	setsid().map_err(DaemonError::Setsid)?;

	// SAFETY: still single-threaded.
	match unsafe { fork() }.map_err(DaemonError::Fork)? {
		ForkResult::Parent { .. } => std::process::exit(0),
		ForkResult::Child => {}
	}

	umask(Mode::empty());
	std::env::set_current_dir("/").map_err(DaemonError::Chdir)?;
	redirect_std_streams()
}

fn redirect_std_streams() -> Result<(), DaemonError> {
	let null = OpenOptions::new()
		.read(true)
		.write(true)
		.open("/dev/null")
		.map_err(DaemonError::DevNull)?;

	for fd in 0..=2 {
		dup2(null.as_raw_fd(), fd).map_err(|source| DaemonError::Redirect { fd, source })?;
	}
	Ok(())
}

/// A PID file written by the running daemon.
#[derive(Debug)]
pub struct PidFile {
	path: PathBuf,
}

impl PidFile {
	/// Write the current process id to `path`, creating parent directories.
	pub fn create(path: impl Into<PathBuf>) -> Result<Self, DaemonError> {
		let path = path.into();
		let write = || -> io::Result<()> {
			if let Some(parent) = path.parent() {
				std::fs::create_dir_all(parent)?;
			}
			std::fs::write(&path, format!("{}\n", std::process::id()))
		};
		match write() {
			Ok(()) => Ok(Self { path }),
			Err(source) => Err(DaemonError::PidFile { path, source }),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn remove(self) {
		if let Err(e) = std::fs::remove_file(&self.path) {
			tracing::warn!("failed to remove pid file {}: {}", self.path.display(), e);
		}
	}
}

/// Read the PID recorded in a PID file.
pub fn read_pid(path: &Path) -> Option<u32> {
	std::fs::read_to_string(path)
		.ok()
		.and_then(|s| s.trim().parse().ok())
}
