use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::spec::ProcessSpec;
use crate::table::{ProcessTable, TableFull};

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
	#[error("cannot open stdin file {}: {source}", path.display())]
	OpenStdin { path: PathBuf, source: io::Error },
	#[error("cannot open stdout file {}: {source}", path.display())]
	OpenStdout { path: PathBuf, source: io::Error },
	#[error("cannot open stderr file {}: {source}", path.display())]
	OpenStderr { path: PathBuf, source: io::Error },
	#[error("failed to spawn {program}: {source}")]
	Spawn { program: String, source: io::Error },
	#[error("process table is full ({capacity} slots), terminated pid {pid}")]
	TableFull { capacity: usize, pid: Pid },
	#[error("no slot at index {0}")]
	NoSuchSlot(usize),
}

/// Start `spec` with its standard streams redirected and return its pid.
///
/// Stdin must already exist. Stdout is created or truncated, and stderr
/// shares its open file so the two streams interleave instead of
/// overwriting each other. The table is not touched.
pub fn spawn(spec: &ProcessSpec) -> Result<Pid, LaunchError> {
	let stdin = File::open(spec.stdin()).map_err(|source| LaunchError::OpenStdin {
		path: spec.stdin().to_path_buf(),
		source,
	})?;
	let stdout = open_output(spec.stdout()).map_err(|source| LaunchError::OpenStdout {
		path: spec.stdout().to_path_buf(),
		source,
	})?;
	let stderr = stdout.try_clone().map_err(|source| LaunchError::OpenStderr {
		path: spec.stderr().to_path_buf(),
		source,
	})?;

	let child = Command::new(spec.program())
		.args(spec.args())
		.stdin(stdin)
		.stdout(stdout)
		.stderr(stderr)
		.spawn()
		.map_err(|source| LaunchError::Spawn {
			program: spec.program().to_string(),
			source,
		})?;

	// Dropping the handle neither kills nor waits; the reaper collects it.
	Ok(Pid::from_raw(child.id() as i32))
}

/// Spawn `spec` and register it in a new slot.
///
/// When the table has no room left the process that was just started is
/// sent SIGTERM so it does not outlive its missing slot.
pub fn launch(table: &mut ProcessTable, spec: ProcessSpec) -> Result<Pid, LaunchError> {
	let pid = spawn(&spec)?;
	match table.insert(spec, pid) {
		Ok(_) => Ok(pid),
		Err(TableFull { capacity }) => {
			terminate(pid);
			Err(LaunchError::TableFull { capacity, pid })
		}
	}
}

/// Start the process of an existing slot again and record the new pid.
pub fn relaunch(table: &mut ProcessTable, index: usize) -> Result<Pid, LaunchError> {
	let slot = table.get(index).ok_or(LaunchError::NoSuchSlot(index))?;
	let pid = spawn(&slot.spec)?;
	table.set_pid(index, pid);
	Ok(pid)
}

/// Ask a process to exit. Already-gone processes are not an error.
pub fn terminate(pid: Pid) {
	match kill(pid, Signal::SIGTERM) {
		Ok(()) | Err(Errno::ESRCH) => {}
		Err(e) => tracing::warn!("failed to send SIGTERM to {}: {}", pid, e),
	}
}

fn open_output(path: &Path) -> io::Result<File> {
	OpenOptions::new()
		.write(true)
		.create(true)
		.truncate(true)
		.mode(0o644)
		.open(path)
}
