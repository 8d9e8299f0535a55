//! # Amalgam Core
//!
//! Marker-bounded extraction and concatenation of source files.
//!
//! Each input file is trimmed to the region between a begin marker and an end
//! marker, prefixed with an origin banner, and appended to one of the output
//! groups of a [`Plan`]. Everything is synchronous and single-pass: read all
//! inputs, transform each, concatenate, write.

pub mod amalgamate;
pub mod banner;
pub mod error;
pub mod output;
pub mod plan;
pub mod source;
pub mod window;

// Re-export key types at crate root for ergonomics
pub use amalgamate::{amalgamate, Amalgamator, RenderedOutput, WrittenOutput};
pub use banner::{BannerFormatter, CommentBanner};
pub use error::{Error, Result};
pub use output::{open_destinations, render_text, write_output, Destination};
pub use plan::{OutputSpec, Plan, SourceSpec};
pub use source::TextFile;
pub use window::{
    extract_window, join_window, scan_markers, window_bounds, MarkerScan, Markers,
    DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER,
};
