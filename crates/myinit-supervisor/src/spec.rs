use std::fmt;
use std::path::{Path, PathBuf};

/// Why a configuration line could not be turned into a [`ProcessSpec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("line is not valid UTF-8")]
	InvalidUtf8,
	#[error("expected at least 3 fields (command, stdin, stdout), found {found}")]
	TooFewFields { found: usize },
	#[error("executable is not an absolute path: {0}")]
	RelativeExecutable(String),
	#[error("stdin file is not an absolute path: {0}")]
	RelativeStdin(String),
	#[error("stdout file is not an absolute path: {0}")]
	RelativeStdout(String),
}

/// One supervised command and where its standard streams go.
///
/// Built from a single configuration line of the form
/// `EXECUTABLE [ARGS...] STDIN STDOUT`. Stderr shares the stdout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
	command: String,
	stdin: PathBuf,
	stdout: PathBuf,
}

impl ProcessSpec {
	/// Parse one configuration line.
	///
	/// The last two fields are the redirection targets, everything before
	/// them is the command. Comment and blank lines are the caller's job to
	/// filter out (see [`crate::config::classify`]).
	pub fn parse(line: &str) -> Result<Self, ParseError> {
		let line = line.trim_end_matches(['\n', '\r']);
		let fields: Vec<&str> = line.split_whitespace().collect();
		if fields.len() < 3 {
			return Err(ParseError::TooFewFields { found: fields.len() });
		}

		let (command, redirects) = fields.split_at(fields.len() - 2);
		let (stdin, stdout) = (redirects[0], redirects[1]);

		if !is_absolute(command[0]) {
			return Err(ParseError::RelativeExecutable(command[0].to_string()));
		}
		if !is_absolute(stdin) {
			return Err(ParseError::RelativeStdin(stdin.to_string()));
		}
		if !is_absolute(stdout) {
			return Err(ParseError::RelativeStdout(stdout.to_string()));
		}

		Ok(Self {
			command: command.join(" "),
			stdin: PathBuf::from(stdin),
			stdout: PathBuf::from(stdout),
		})
	}

	/// The executable followed by its arguments, single-space separated.
	pub fn command(&self) -> &str {
		&self.command
	}

	pub fn program(&self) -> &str {
		self.command.split(' ').next().unwrap_or_default()
	}

	pub fn args(&self) -> impl Iterator<Item = &str> {
		self.command.split(' ').skip(1)
	}

	pub fn stdin(&self) -> &Path {
		&self.stdin
	}

	pub fn stdout(&self) -> &Path {
		&self.stdout
	}

	pub fn stderr(&self) -> &Path {
		&self.stdout
	}
}

impl fmt::Display for ProcessSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.command)
	}
}

fn is_absolute(token: &str) -> bool {
	token.starts_with('/')
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn three_fields_is_a_bare_command() {
		let spec = ProcessSpec::parse("/bin/sleep /dev/null /tmp/out\n").unwrap();
		assert_eq!(spec.command(), "/bin/sleep");
		assert_eq!(spec.program(), "/bin/sleep");
		assert_eq!(spec.args().count(), 0);
		assert_eq!(spec.stdin(), Path::new("/dev/null"));
		assert_eq!(spec.stdout(), Path::new("/tmp/out"));
		assert_eq!(spec.stderr(), spec.stdout());
	}

	#[test]
	fn arguments_are_rejoined_with_single_spaces() {
		let spec =
			ProcessSpec::parse("/usr/bin/tail   -f\t/var/log/syslog /dev/null /tmp/tail.out").unwrap();
		assert_eq!(spec.command(), "/usr/bin/tail -f /var/log/syslog");
		assert_eq!(spec.args().collect::<Vec<_>>(), vec!["-f", "/var/log/syslog"]);
		assert_eq!(spec.stdout(), Path::new("/tmp/tail.out"));
	}

	#[test]
	fn last_two_fields_are_redirects() {
		let spec = ProcessSpec::parse("/bin/cat /bin/true /a /a /b").unwrap();
		assert_eq!(spec.command(), "/bin/cat /bin/true /a");
		assert_eq!(spec.stdin(), Path::new("/a"));
		assert_eq!(spec.stdout(), Path::new("/b"));
	}

	#[test]
	fn relative_redirects_reject_the_line() {
		assert_eq!(
			ProcessSpec::parse("/bin/cat /bin/true a a b"),
			Err(ParseError::RelativeStdin("a".into()))
		);
		assert_eq!(
			ProcessSpec::parse("/bin/cat /dev/null out"),
			Err(ParseError::RelativeStdout("out".into()))
		);
	}

	#[test]
	fn relative_executable_is_rejected() {
		assert_eq!(
			ProcessSpec::parse("sleep 10 /dev/null /tmp/out"),
			Err(ParseError::RelativeExecutable("sleep".into()))
		);
	}

	#[test]
	fn too_few_fields() {
		assert_eq!(
			ProcessSpec::parse("/bin/true /dev/null"),
			Err(ParseError::TooFewFields { found: 2 })
		);
		assert_eq!(ProcessSpec::parse(""), Err(ParseError::TooFewFields { found: 0 }));
	}

	#[test]
	fn crlf_terminator_is_stripped() {
		let spec = ProcessSpec::parse("/bin/true /dev/null /tmp/out\r\n").unwrap();
		assert_eq!(spec.stdout(), Path::new("/tmp/out"));
	}

	#[test]
	fn display_is_the_command() {
		let spec = ProcessSpec::parse("/bin/echo hi /dev/null /tmp/out").unwrap();
		assert_eq!(spec.to_string(), "/bin/echo hi");
	}
}
