//! Source files read into memory for amalgamation.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A named, ordered sequence of lines, read once and immutable thereafter.
///
/// Lines keep their original line endings; stripping happens during window
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    name: String,
    path: PathBuf,
    lines: Vec<String>,
}

impl TextFile {
    /// Build a text file from lines already in memory.
    pub fn from_lines<I, S>(name: impl Into<String>, path: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            path: path.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Read a file fully from disk.
    ///
    /// Any failure to open or decode the file is reported as
    /// [`Error::MissingInput`].
    pub fn read(name: impl Into<String>, path: &Path) -> Result<Self> {
        let name = name.into();
        let content = std::fs::read_to_string(path).map_err(|source| Error::MissingInput {
            name: name.clone(),
            path: path.to_path_buf(),
            source,
        })?;

        let lines = split_lines(&content);
        debug!(name = %name, path = %path.display(), lines = lines.len(), "Read source file");

        Ok(Self {
            name,
            path: path.to_path_buf(),
            lines,
        })
    }

    /// Display name used for the origin banner.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split text into lines, each keeping its terminator if present.
///
/// `\r\n`, `\n` and a lone `\r` all end a line.
fn split_lines(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let end = match bytes[i] {
            b'\n' => Some(i + 1),
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
            b'\r' => Some(i + 1),
            _ => None,
        };
        match end {
            Some(end) => {
                lines.push(content[start..end].to_string());
                start = end;
                i = end;
            }
            None => i += 1,
        }
    }

    if start < content.len() {
        lines.push(content[start..].to_string());
    }
    lines
}
