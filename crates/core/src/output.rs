//! Writing generated artifacts to disk.

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Join `lines` with `terminator`, ending the text with a final terminator.
///
/// An empty sequence renders as an empty string.
pub fn render_text<S: AsRef<str>>(lines: &[S], terminator: &str) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push_str(terminator);
    }
    text
}

/// A destination opened for writing but not yet truncated.
///
/// Opening every destination before truncating any of them means an
/// unwritable path is found while all existing outputs are still intact.
#[derive(Debug)]
pub struct Destination {
    path: PathBuf,
    file: File,
    created: bool,
}

impl Destination {
    /// Open `path` for writing, creating it if needed, without truncating.
    pub fn open(path: &Path) -> Result<Self> {
        let created = !path.exists();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| Error::DestinationUnwritable {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            created,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the file and write `lines` joined by `terminator`.
    ///
    /// Returns the number of bytes written. The handle is closed when this
    /// returns, on success and on failure alike.
    pub fn write<S: AsRef<str>>(mut self, lines: &[S], terminator: &str) -> Result<usize> {
        let text = render_text(lines, terminator);
        let path = self.path.clone();
        let unwritable = |source| Error::DestinationUnwritable {
            path: path.clone(),
            source,
        };

        self.file.set_len(0).map_err(unwritable)?;
        self.file.write_all(text.as_bytes()).map_err(unwritable)?;
        self.file.flush().map_err(unwritable)?;

        info!(path = %path.display(), lines = lines.len(), bytes = text.len(), "Wrote output");
        Ok(text.len())
    }

    /// Close the handle, removing the file if opening it created it.
    fn discard(self) {
        let Self { path, file, created } = self;
        drop(file);
        if created && let Err(e) = std::fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to remove unused destination");
        }
    }
}

/// Open every destination, or none of them.
///
/// On the first failure the handles opened so far are closed and any file
/// created by this call is removed again, so existing outputs keep their
/// content.
pub fn open_destinations<'a, I>(paths: I) -> Result<Vec<Destination>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut opened = Vec::new();
    for path in paths {
        match Destination::open(path) {
            Ok(destination) => opened.push(destination),
            Err(e) => {
                opened.into_iter().for_each(Destination::discard);
                return Err(e);
            }
        }
    }
    Ok(opened)
}

/// Create or truncate `path` and write `lines` joined by `terminator`.
///
/// Returns the number of bytes written. Errors are surfaced as
/// [`Error::DestinationUnwritable`] without retry.
pub fn write_output<S: AsRef<str>>(path: &Path, lines: &[S], terminator: &str) -> Result<usize> {
    Destination::open(path)?.write(lines, terminator)
}
