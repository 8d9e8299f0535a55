//! Error types for the amalgamation pipeline.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Every failure is fatal for the whole run; there is no per-file recovery.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all amalgamation operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Input errors ---
    #[error("Missing input '{name}' at {path}: {source}")]
    MissingInput {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Output errors ---
    #[error("Destination unwritable at {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Plan errors ---
    #[error("Unknown output group: {0}")]
    UnknownGroup(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The path of the input or output that caused the failure, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MissingInput { path, .. } | Self::DestinationUnwritable { path, .. } => {
                Some(path)
            }
            Self::UnknownGroup(_) => None,
        }
    }
}
