use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;

use crate::launcher;
use crate::reaper;
use crate::supervisor::{LoadReport, State, Supervisor};

/// Request for a full reload, set from signal context and consumed by the
/// supervisor loop.
#[derive(Debug, Clone, Default)]
pub struct ReloadFlag(Arc<AtomicBool>);

impl ReloadFlag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn request(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_requested(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}

	pub fn clear(&self) {
		self.0.store(false, Ordering::SeqCst);
	}
}

/// Set `flag` every time the process receives SIGHUP.
///
/// The task does nothing else: logging and table work stay on the
/// supervisor loop. Must be called from within a tokio runtime.
pub fn listen_for_hangup(flag: ReloadFlag) -> io::Result<JoinHandle<()>> {
	let mut hangup = signal(SignalKind::hangup())?;
	Ok(tokio::spawn(async move {
		while hangup.recv().await.is_some() {
			flag.request();
		}
	}))
}

impl Supervisor {
	/// Tear down every tracked process and rebuild the table from the
	/// configuration file.
	///
	/// Children get SIGTERM and one grace period to exit. Whatever is reaped
	/// during that time is marked stopped, never restarted. The table is then
	/// cleared regardless, so a child that ignores SIGTERM keeps running
	/// untracked and is only reaped anonymously once it finally exits.
	pub async fn reload(&mut self) -> LoadReport {
		self.state = State::Reloading;
		tracing::info!(
			"reload requested, re-reading configuration: {}",
			self.config_path().display()
		);

		for pid in self.table.live_pids() {
			launcher::terminate(pid);
		}

		tokio::time::sleep(self.timings.grace_period).await;
		reaper::reap(&mut self.table, true);

		let orphaned = self.table.live_pids().count();
		if orphaned > 0 {
			tracing::warn!(
				"{} process(es) still running after the grace period, no longer tracked",
				orphaned
			);
		}
		self.table.clear();

		let report = self.load();
		self.reload_flag.clear();
		self.state = State::Running;
		report
	}
}
