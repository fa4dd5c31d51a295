use owo_colors::OwoColorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use myinit_supervisor::DEFAULT_CAPACITY;

// ── Daemon settings (~/.config/myinit/config.toml) ──────────────────────────

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Settings {
	#[serde(default)]
	pub daemon: DaemonSettings,
	#[serde(default)]
	pub supervisor: SupervisorSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DaemonSettings {
	#[serde(default = "default_log_file")]
	pub log_file: PathBuf,
	/// Falls back to the state directory when unset.
	pub pid_file: Option<PathBuf>,
}

impl Default for DaemonSettings {
	fn default() -> Self {
		Self { log_file: default_log_file(), pid_file: None }
	}
}

fn default_log_file() -> PathBuf { PathBuf::from("/tmp/myinit.log") }

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SupervisorSettings {
	#[serde(default = "default_capacity")]
	pub capacity: usize,
}

impl Default for SupervisorSettings {
	fn default() -> Self {
		Self { capacity: default_capacity() }
	}
}

fn default_capacity() -> usize { DEFAULT_CAPACITY }

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
	toml::from_str(content)
}

/// Load settings from `path`, falling back to defaults.
///
/// A missing file is normal. An unreadable or malformed one is reported on
/// stderr, which is still the terminal at this point.
pub fn load_settings(path: &Path) -> Settings {
	if path.exists() {
		match std::fs::read_to_string(path) {
			Ok(content) => match parse_settings(&content) {
				Ok(settings) => return settings,
				Err(e) => eprintln!("{} failed to parse {}: {}", "warning:".yellow(), path.display(), e),
			},
			Err(e) => eprintln!("{} failed to read {}: {}", "warning:".yellow(), path.display(), e),
		}
	}
	Settings::default()
}
