use nix::unistd::Pid;

use crate::spec::ProcessSpec;

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("process table is full ({capacity} slots)")]
pub struct TableFull {
	pub capacity: usize,
}

/// One supervised process: its spec and the pid of the running instance.
#[derive(Debug, Clone)]
pub struct ProcessSlot {
	pub index: usize,
	pub spec: ProcessSpec,
	/// `None` once the process has been stopped for a reload.
	pub pid: Option<Pid>,
}

impl ProcessSlot {
	pub fn is_running(&self) -> bool {
		self.pid.is_some()
	}
}

/// Ordered, capacity-bounded registry of supervised processes.
///
/// Slots are appended in configuration-file order and are never removed
/// individually; the whole table is cleared when a reload rebuilds it.
#[derive(Debug)]
pub struct ProcessTable {
	slots: Vec<ProcessSlot>,
	capacity: usize,
}

impl ProcessTable {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: Vec::with_capacity(capacity),
			capacity,
		}
	}

	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn is_full(&self) -> bool {
		self.slots.len() >= self.capacity
	}

	/// Append a slot for a freshly spawned process and return its index.
	pub fn insert(&mut self, spec: ProcessSpec, pid: Pid) -> Result<usize, TableFull> {
		if self.is_full() {
			return Err(TableFull {
				capacity: self.capacity,
			});
		}
		let index = self.slots.len();
		self.slots.push(ProcessSlot {
			index,
			spec,
			pid: Some(pid),
		});
		Ok(index)
	}

	pub fn get(&self, index: usize) -> Option<&ProcessSlot> {
		self.slots.get(index)
	}

	pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
		self.slots.iter().position(|slot| slot.pid == Some(pid))
	}

	pub fn set_pid(&mut self, index: usize, pid: Pid) {
		if let Some(slot) = self.slots.get_mut(index) {
			slot.pid = Some(pid);
		}
	}

	pub fn mark_stopped(&mut self, index: usize) {
		if let Some(slot) = self.slots.get_mut(index) {
			slot.pid = None;
		}
	}

	pub fn live_pids(&self) -> impl Iterator<Item = Pid> + '_ {
		self.slots.iter().filter_map(|slot| slot.pid)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ProcessSlot> {
		self.slots.iter()
	}

	pub fn clear(&mut self) {
		self.slots.clear();
	}
}

impl Default for ProcessTable {
	fn default() -> Self {
		Self::with_capacity(DEFAULT_CAPACITY)
	}
}
