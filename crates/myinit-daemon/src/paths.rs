use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Well-known locations for a daemon, derived from its application name and
/// the XDG base directory variables.
#[derive(Debug, Clone)]
pub struct DaemonPaths {
	pub app_name: String,
}

impl DaemonPaths {
	pub fn new(app_name: impl Into<String>) -> Self {
		Self {
			app_name: app_name.into(),
		}
	}

	/// `$XDG_STATE_HOME/<app>`, else `~/.local/state/<app>`.
	pub fn state_dir(&self) -> PathBuf {
		self.xdg_dir("XDG_STATE_HOME", &[".local", "state"], "/tmp")
	}

	/// `$XDG_CONFIG_HOME/<app>`, else `~/.config/<app>`.
	pub fn config_dir(&self) -> PathBuf {
		self.xdg_dir("XDG_CONFIG_HOME", &[".config"], "/tmp/config")
	}

	fn xdg_dir(&self, var: &str, under_home: &[&str], last_resort: &str) -> PathBuf {
		let base = xdg_base(std::env::var_os(var), std::env::var_os("HOME"), under_home, last_resort);
		base.join(&self.app_name)
	}

	pub fn pid_path(&self) -> PathBuf {
		self.state_dir().join(format!("{}.pid", self.app_name))
	}

	pub fn settings_path(&self) -> PathBuf {
		self.config_dir().join("config.toml")
	}
}

/// An unset or empty XDG variable falls back to a directory under `$HOME`.
fn xdg_base(xdg: Option<OsString>, home: Option<OsString>, under_home: &[&str], last_resort: &str) -> PathBuf {
	match (xdg, home) {
		(Some(dir), _) if !dir.is_empty() => PathBuf::from(dir),
		(_, Some(home)) if !home.is_empty() => under_home.iter().fold(PathBuf::from(home), |p, c| p.join(c)),
		_ => PathBuf::from(last_resort),
	}
}

/// Resolve `path` against the current working directory.
///
/// Detaching changes the working directory to `/`, so anything the daemon
/// reads later must be anchored first.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
	if path.is_absolute() {
		Ok(path.to_path_buf())
	} else {
		Ok(std::env::current_dir()?.join(path))
	}
}
