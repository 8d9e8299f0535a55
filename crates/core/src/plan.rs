//! The resolved description of one amalgamation run.
//!
//! A [`Plan`] is the ordered table of output groups and the sources feeding
//! them, with every path already resolved. Configuration loading produces it;
//! the [`Amalgamator`](crate::Amalgamator) consumes it.

use crate::error::{Error, Result};
use crate::window::Markers;
use serde::Serialize;
use std::path::PathBuf;

/// One generated artifact, e.g. the combined declarations header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    /// Group identifier that sources refer to (`declarations`, `definitions`).
    pub name: String,
    /// Destination file.
    pub path: PathBuf,
    /// Fixed text written before the first block.
    pub preamble: String,
}

/// One input file and the output group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpec {
    /// Display name used in the origin banner.
    pub name: String,
    pub path: PathBuf,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub markers: Markers,
    /// Line terminator for the written artifacts.
    pub newline: String,
    pub outputs: Vec<OutputSpec>,
    pub sources: Vec<SourceSpec>,
}

impl Plan {
    /// Sources belonging to `group`, in table order.
    pub fn sources_for<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a SourceSpec> + 'a {
        self.sources.iter().filter(move |s| s.group == group)
    }

    pub fn output(&self, name: &str) -> Option<&OutputSpec> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Resolve a selection of group names to outputs, keeping table order.
    ///
    /// An empty selection means every output.
    pub fn select(&self, groups: &[String]) -> Result<Vec<&OutputSpec>> {
        if let Some(unknown) = groups.iter().find(|g| self.output(g).is_none()) {
            return Err(Error::UnknownGroup(unknown.clone()));
        }

        Ok(self
            .outputs
            .iter()
            .filter(|o| groups.is_empty() || groups.contains(&o.name))
            .collect())
    }
}
