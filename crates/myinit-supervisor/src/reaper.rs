use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use crate::launcher;
use crate::table::ProcessTable;

/// How a child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
	Exited(i32),
	Signaled(Signal),
}

impl fmt::Display for ExitOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ExitOutcome::Exited(code) => write!(f, "exited with code {}", code),
			ExitOutcome::Signaled(sig) => write!(f, "killed by signal {}", sig.as_str()),
		}
	}
}

/// What the reaper did about a terminated child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReapAction {
	/// Started again under the new pid.
	Restarted(Pid),
	/// The relaunch failed; the slot is left stopped.
	RestartFailed,
	/// A reload is running, so the slot was marked stopped instead.
	StoppedForReload,
	/// Not in the table, e.g. a survivor of an earlier reload.
	Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaped {
	pub pid: Pid,
	pub outcome: ExitOutcome,
	pub slot: Option<usize>,
	pub action: ReapAction,
}

/// Collect every child that has terminated so far, without blocking.
///
/// Outside a reload each tracked process is relaunched immediately with the
/// same spec. There is no backoff, so a command that dies on startup is
/// restarted once per call for as long as it keeps failing.
pub fn reap(table: &mut ProcessTable, reloading: bool) -> Vec<Reaped> {
	let mut reaped = Vec::new();

	while let Some((pid, outcome)) = next_exit() {
		let Some(index) = table.find_by_pid(pid) else {
			tracing::debug!("reaped untracked process {} ({})", pid, outcome);
			reaped.push(Reaped {
				pid,
				outcome,
				slot: None,
				action: ReapAction::Untracked,
			});
			continue;
		};

		let action = handle_exit(table, index, pid, outcome, reloading);
		reaped.push(Reaped {
			pid,
			outcome,
			slot: Some(index),
			action,
		});
	}

	reaped
}

fn handle_exit(
	table: &mut ProcessTable,
	index: usize,
	pid: Pid,
	outcome: ExitOutcome,
	reloading: bool,
) -> ReapAction {
	let Some(slot) = table.get(index) else {
		return ReapAction::Untracked;
	};
	let command = slot.spec.command().to_string();
	tracing::info!("process {} in slot {} {}: {}", pid, slot.index, outcome, command);

	if reloading {
		table.mark_stopped(index);
		tracing::info!("process stopped for reload and will not be restarted: {}", command);
		return ReapAction::StoppedForReload;
	}

	match launcher::relaunch(table, index) {
		Ok(new_pid) => {
			tracing::info!("process restarted [pid {}]: {}", new_pid, command);
			ReapAction::Restarted(new_pid)
		}
		Err(e) => {
			table.mark_stopped(index);
			tracing::error!("failed to restart {}: {}", command, e);
			ReapAction::RestartFailed
		}
	}
}

fn next_exit() -> Option<(Pid, ExitOutcome)> {
	loop {
		match waitpid(None, Some(WaitPidFlag::WNOHANG)) {
			Ok(WaitStatus::Exited(pid, code)) => return Some((pid, ExitOutcome::Exited(code))),
			Ok(WaitStatus::Signaled(pid, sig, _)) => return Some((pid, ExitOutcome::Signaled(sig))),
			Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return None,
			Ok(_) | Err(Errno::EINTR) => continue,
			Err(e) => {
				tracing::warn!("waitpid failed: {}", e);
				return None;
			}
		}
	}
}
