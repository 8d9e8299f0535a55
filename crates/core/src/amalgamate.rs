//! Concatenation of trimmed source files into amalgamated outputs.
//!
//! The pipeline is a single synchronous pass:
//! read every selected input, trim each, concatenate per output group, write.
//! Every input is read before anything is written, so a missing file leaves
//! all destinations untouched.

use crate::banner::{BannerFormatter, CommentBanner};
use crate::error::Result;
use crate::output::{open_destinations, render_text};
use crate::plan::{OutputSpec, Plan};
use crate::source::TextFile;
use crate::window::{extract_window, join_window, Markers};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Concatenate banner + trimmed window for each file, in order.
///
/// Banners and windows are split on `\n` so the result is a flat sequence of
/// lines. Each window is one block: an empty window still contributes a single
/// empty line after its banner.
pub fn amalgamate<B>(files: &[TextFile], markers: &Markers, banner: &B) -> Vec<String>
where
    B: BannerFormatter + ?Sized,
{
    let mut out = Vec::new();
    for file in files {
        let window = extract_window(file.lines(), markers);
        debug!(
            name = file.name(),
            kept = window.len(),
            total = file.lines().len(),
            "Extracted window"
        );

        out.extend(banner.format(file.name()).lines().map(str::to_string));
        out.extend(join_window(&window, "\n").split('\n').map(str::to_string));
    }
    out
}

/// A fully rendered artifact, not yet written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    pub name: String,
    pub path: PathBuf,
    /// Display names of the files concatenated, in order.
    pub sources: Vec<String>,
    pub lines: Vec<String>,
}

impl RenderedOutput {
    /// The artifact text with the given terminator.
    pub fn text(&self, terminator: &str) -> String {
        render_text(&self.lines, terminator)
    }
}

/// Summary of an artifact written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenOutput {
    pub name: String,
    pub path: PathBuf,
    pub sources: usize,
    pub lines: usize,
    pub bytes: usize,
}

/// Runs a [`Plan`] end to end.
pub struct Amalgamator<B = CommentBanner> {
    plan: Plan,
    banner: B,
}

impl Amalgamator<CommentBanner> {
    /// Create an amalgamator using the default `//` comment banner.
    pub fn new(plan: Plan) -> Self {
        Self::with_banner(plan, CommentBanner::default())
    }
}

impl<B: BannerFormatter> Amalgamator<B> {
    pub fn with_banner(plan: Plan, banner: B) -> Self {
        Self { plan, banner }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Read every source of one output group, failing on the first one that
    /// cannot be read.
    fn read_group(&self, output: &OutputSpec) -> Result<Vec<TextFile>> {
        self.plan
            .sources_for(&output.name)
            .map(|source| TextFile::read(source.name.clone(), &source.path))
            .collect()
    }

    /// Render the selected outputs (all when `groups` is empty) in memory.
    ///
    /// All inputs are read up front; the first unreadable one aborts the
    /// whole render.
    pub fn render(&self, groups: &[String]) -> Result<Vec<RenderedOutput>> {
        let selected = self.plan.select(groups)?;

        let inputs = selected
            .iter()
            .map(|output| self.read_group(output))
            .collect::<Result<Vec<_>>>()?;

        let rendered = selected
            .into_iter()
            .zip(inputs)
            .map(|(output, files)| {
                if files.is_empty() {
                    warn!(group = %output.name, "Output group has no sources");
                }

                let mut lines: Vec<String> =
                    output.preamble.lines().map(str::to_string).collect();
                lines.extend(amalgamate(&files, &self.plan.markers, &self.banner));

                RenderedOutput {
                    name: output.name.clone(),
                    path: output.path.clone(),
                    sources: files.iter().map(|f| f.name().to_string()).collect(),
                    lines,
                }
            })
            .collect();

        Ok(rendered)
    }

    /// Render the selected outputs and write each one to its destination.
    ///
    /// Nothing is written unless every input was read and every destination
    /// could be opened. Destinations are truncated only after all of them are
    /// open, so an unwritable path leaves existing outputs untouched.
    pub fn run(&self, groups: &[String]) -> Result<Vec<WrittenOutput>> {
        let rendered = self.render(groups)?;
        let destinations = open_destinations(rendered.iter().map(|o| o.path.as_path()))?;

        let mut written = Vec::with_capacity(rendered.len());
        for (output, destination) in rendered.into_iter().zip(destinations) {
            let bytes = destination.write(&output.lines, &self.plan.newline)?;
            written.push(WrittenOutput {
                name: output.name,
                path: output.path,
                sources: output.sources.len(),
                lines: output.lines.len(),
                bytes,
            });
        }

        info!(outputs = written.len(), "Amalgamation complete");
        Ok(written)
    }
}
