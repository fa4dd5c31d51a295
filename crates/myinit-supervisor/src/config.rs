use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::spec::{ParseError, ProcessSpec};

/// What a configuration line turned out to be before any parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
	Blank,
	Comment,
	Entry(&'a str),
}

/// Decide whether a raw line is skipped or handed to the parser.
pub fn classify(line: &str) -> LineKind<'_> {
	let line = line.trim_end_matches(['\n', '\r']);
	let trimmed = line.trim_start();
	if trimmed.is_empty() {
		LineKind::Blank
	} else if trimmed.starts_with('#') {
		LineKind::Comment
	} else {
		LineKind::Entry(line)
	}
}

/// A line worth parsing, with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
	pub line_no: usize,
	/// The line as read, with invalid UTF-8 replaced for display.
	pub text: String,
	pub valid_utf8: bool,
}

impl ConfigEntry {
	pub fn parse(&self) -> Result<ProcessSpec, ParseError> {
		if !self.valid_utf8 {
			return Err(ParseError::InvalidUtf8);
		}
		ProcessSpec::parse(&self.text)
	}
}

/// Read every non-blank, non-comment line of a process list.
///
/// Lines are split on raw bytes, so a line that is not valid UTF-8 comes
/// back as an entry that fails to parse instead of failing the whole read.
pub fn read_entries(path: &Path) -> io::Result<Vec<ConfigEntry>> {
	let file = std::fs::File::open(path)?;
	let mut entries = Vec::new();

	for (idx, raw) in BufReader::new(file).split(b'\n').enumerate() {
		let raw = raw?;
		let (line, valid_utf8) = match String::from_utf8(raw) {
			Ok(line) => (line, true),
			Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), false),
		};
		if let LineKind::Entry(text) = classify(&line) {
			entries.push(ConfigEntry {
				line_no: idx + 1,
				text: text.to_string(),
				valid_utf8,
			});
		}
	}
	Ok(entries)
}
