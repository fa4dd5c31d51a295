use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config;
use crate::launcher;
use crate::reaper::{self, Reaped};
use crate::reload::ReloadFlag;
use crate::table::ProcessTable;

/// How long children get to exit after SIGTERM during a reload.
pub const GRACE_PERIOD: Duration = Duration::from_secs(2);
/// Pause between two iterations of the supervisor loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
	pub grace_period: Duration,
	pub poll_interval: Duration,
}

impl Default for Timings {
	fn default() -> Self {
		Self {
			grace_period: GRACE_PERIOD,
			poll_interval: POLL_INTERVAL,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Running,
	Reloading,
}

/// Outcome of one pass over the configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
	pub launched: usize,
	/// Lines that failed to parse.
	pub rejected: usize,
	/// Lines that parsed but could not be started.
	pub failed: usize,
}

/// Owns the process table and drives load, reap and reload.
pub struct Supervisor {
	pub(crate) config_path: PathBuf,
	pub(crate) table: ProcessTable,
	pub(crate) reload_flag: ReloadFlag,
	pub(crate) timings: Timings,
	pub(crate) state: State,
}

impl Supervisor {
	pub fn new(config_path: impl Into<PathBuf>, capacity: usize) -> Self {
		Self {
			config_path: config_path.into(),
			table: ProcessTable::with_capacity(capacity),
			reload_flag: ReloadFlag::new(),
			timings: Timings::default(),
			state: State::Running,
		}
	}

	pub fn with_timings(mut self, timings: Timings) -> Self {
		self.timings = timings;
		self
	}

	pub fn config_path(&self) -> &Path {
		&self.config_path
	}

	pub fn table(&self) -> &ProcessTable {
		&self.table
	}

	/// A handle that requests a reload when set, e.g. from a signal listener.
	pub fn reload_flag(&self) -> ReloadFlag {
		self.reload_flag.clone()
	}

	pub fn state(&self) -> State {
		self.state
	}

	/// Parse the configuration file and launch every valid line into the
	/// table, in file order.
	///
	/// Nothing here is fatal: an unreadable file leaves the table as it is,
	/// and bad or unlaunchable lines are logged and skipped.
	pub fn load(&mut self) -> LoadReport {
		let mut report = LoadReport::default();
		tracing::info!("reading configuration file: {}", self.config_path().display());

		let entries = match config::read_entries(&self.config_path) {
			Ok(entries) => entries,
			Err(e) => {
				tracing::error!(
					"failed to read configuration file {}: {}",
					self.config_path().display(),
					e
				);
				return report;
			}
		};

		for entry in entries {
			let spec = match entry.parse() {
				Ok(spec) => spec,
				Err(e) => {
					tracing::warn!(
						"invalid configuration line {}: {}: {}",
						entry.line_no,
						entry.text,
						e
					);
					report.rejected += 1;
					continue;
				}
			};

			let command = spec.command().to_string();
			match launcher::launch(&mut self.table, spec) {
				Ok(pid) => {
					tracing::info!("started process [pid {}]: {}", pid, command);
					report.launched += 1;
				}
				Err(e) => {
					tracing::error!("failed to start {}: {}", command, e);
					report.failed += 1;
				}
			}
		}

		report
	}

	/// Collect exited children, restarting them unless a reload is running.
	pub fn reap(&mut self) -> Vec<Reaped> {
		let reloading = self.state == State::Reloading;
		reaper::reap(&mut self.table, reloading)
	}

	/// One loop iteration: honour a pending reload, then reap.
	pub async fn tick(&mut self) -> Vec<Reaped> {
		if self.reload_flag.is_requested() {
			self.reload().await;
		}
		self.reap()
	}

	/// Load the configuration once, then tick forever.
	pub async fn run(&mut self) {
		self.load();
		loop {
			self.tick().await;
			tokio::time::sleep(self.timings.poll_interval).await;
		}
	}
}
