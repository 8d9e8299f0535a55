//! Marker-bounded line windows.
//!
//! A window is everything strictly after the first line containing the begin
//! marker, up to (but excluding) the last line containing the end marker.
//! The two searches are independent: a file with only an end marker still has
//! its tail trimmed, and a file with only a begin marker still has its head
//! trimmed. Markers are matched as substrings anywhere on a line.

use serde::Serialize;
use std::ops::Range;

/// Default begin marker, as placed in the library sources (`//~~[[`).
pub const DEFAULT_BEGIN_MARKER: &str = "~~[[";

/// Default end marker, as placed in the library sources (`//]]~~`).
pub const DEFAULT_END_MARKER: &str = "]]~~";

/// The pair of sentinel substrings delimiting the region to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Markers {
    pub begin: String,
    pub end: String,
}

impl Markers {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER)
    }
}

/// Strip any trailing carriage-return / line-feed characters.
pub fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Compute the `[lower, upper)` bounds of the window.
///
/// The returned range may be empty (`lower >= upper`) when the markers appear
/// in conflicting order; callers treat that as an empty window.
pub fn window_bounds<S: AsRef<str>>(lines: &[S], markers: &Markers) -> Range<usize> {
    let lower = lines
        .iter()
        .position(|line| line.as_ref().contains(markers.begin.as_str()))
        .map_or(0, |i| i + 1);

    let upper = lines
        .iter()
        .rposition(|line| line.as_ref().contains(markers.end.as_str()))
        .unwrap_or(lines.len());

    lower..upper
}

/// Extract the trimmed window from `lines`, stripping line endings.
pub fn extract_window<S: AsRef<str>>(lines: &[S], markers: &Markers) -> Vec<String> {
    let bounds = window_bounds(lines, markers);
    if bounds.is_empty() {
        return Vec::new();
    }

    lines[bounds]
        .iter()
        .map(|line| strip_line_ending(line.as_ref()).to_string())
        .collect()
}

/// Join an extracted window with a single newline sequence.
pub fn join_window<S: AsRef<str>>(window: &[S], newline: &str) -> String {
    window
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(newline)
}

/// Where the markers were found in a file, for diagnostics.
///
/// Extraction itself never consults this: duplicated or out-of-order markers
/// are resolved silently (first begin wins, last end wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerScan {
    /// Zero-based line indices containing the begin marker.
    pub begin_lines: Vec<usize>,
    /// Zero-based line indices containing the end marker.
    pub end_lines: Vec<usize>,
    /// Bounds the extraction would use.
    pub bounds: Range<usize>,
}

impl MarkerScan {
    pub fn has_begin(&self) -> bool {
        !self.begin_lines.is_empty()
    }

    pub fn has_end(&self) -> bool {
        !self.end_lines.is_empty()
    }

    /// Either marker occurs on more than one line.
    pub fn has_duplicates(&self) -> bool {
        self.begin_lines.len() > 1 || self.end_lines.len() > 1
    }

    /// Both markers are present and the begin marker is not before the end marker.
    pub fn is_out_of_order(&self) -> bool {
        match (self.begin_lines.first(), self.end_lines.last()) {
            (Some(begin), Some(end)) => begin >= end,
            _ => false,
        }
    }

    /// Number of lines the extraction keeps.
    pub fn kept_lines(&self) -> usize {
        self.bounds.end.saturating_sub(self.bounds.start)
    }
}

/// Locate every marker occurrence in `lines`.
pub fn scan_markers<S: AsRef<str>>(lines: &[S], markers: &Markers) -> MarkerScan {
    let mut scan = MarkerScan {
        bounds: window_bounds(lines, markers),
        ..MarkerScan::default()
    };

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if line.contains(markers.begin.as_str()) {
            scan.begin_lines.push(i);
        }
        if line.contains(markers.end.as_str()) {
            scan.end_lines.push(i);
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers::default()
    }

    #[test]
    fn extracts_between_markers() {
        let lines = ["A", "~~[[BEGIN", "B", "C", "END]]~~", "D"];
        assert_eq!(extract_window(&lines, &markers()), vec!["B", "C"]);
    }

    #[test]
    fn no_markers_keeps_everything() {
        let lines = ["one\n", "two\r\n", "three"];
        assert_eq!(
            extract_window(&lines, &markers()),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn empty_input_gives_empty_window() {
        let lines: [&str; 0] = [];
        assert!(extract_window(&lines, &markers()).is_empty());
    }

    #[test]
    fn begin_only_trims_head() {
        let lines = ["#pragma once", "#include <x>", "//~~[[", "body", "tail"];
        assert_eq!(extract_window(&lines, &markers()), vec!["body", "tail"]);
    }

    #[test]
    fn end_only_trims_tail() {
        let lines = ["head", "body", "//]]~~", "#include \"Path.inl\""];
        assert_eq!(extract_window(&lines, &markers()), vec!["head", "body"]);
    }

    #[test]
    fn begin_on_last_line_gives_empty_window() {
        let lines = ["a", "b", "~~[["];
        assert!(extract_window(&lines, &markers()).is_empty());
    }

    #[test]
    fn out_of_order_markers_give_empty_window() {
        let lines = ["a", "]]~~", "b", "~~[[", "c"];
        assert!(extract_window(&lines, &markers()).is_empty());
    }

    #[test]
    fn first_begin_and_last_end_win() {
        let lines = ["x", "~~[[", "a", "~~[[", "b", "]]~~", "c", "]]~~", "y"];
        assert_eq!(
            extract_window(&lines, &markers()),
            vec!["a", "~~[[", "b", "]]~~", "c"]
        );
    }

    #[test]
    fn markers_match_as_substrings() {
        let lines = ["int a; // ~~[[ keep below", "int b;", "int c; ]]~~"];
        assert_eq!(extract_window(&lines, &markers()), vec!["int b;"]);
    }

    #[test]
    fn strips_only_trailing_line_endings() {
        assert_eq!(strip_line_ending("  code  \r\n"), "  code  ");
        assert_eq!(strip_line_ending("a\n\r\n"), "a");
        assert_eq!(strip_line_ending("\ra"), "\ra");
    }

    #[test]
    fn custom_markers() {
        let lines = ["<<", "kept", ">>", "dropped"];
        let m = Markers::new("<<", ">>");
        assert_eq!(extract_window(&lines, &m), vec!["kept"]);
    }

    #[test]
    fn join_uses_configured_newline() {
        let window = vec!["a".to_string(), "b".to_string()];
        assert_eq!(join_window(&window, "\n"), "a\nb");
        assert_eq!(join_window(&window, "\r\n"), "a\r\nb");
        assert_eq!(join_window::<String>(&[], "\n"), "");
    }

    #[test]
    fn scan_reports_positions_and_anomalies() {
        let lines = ["~~[[", "a", "]]~~", "~~[["];
        let scan = scan_markers(&lines, &markers());
        assert_eq!(scan.begin_lines, vec![0, 3]);
        assert_eq!(scan.end_lines, vec![2]);
        assert_eq!(scan.bounds, 1..2);
        assert_eq!(scan.kept_lines(), 1);
        assert!(scan.has_duplicates());
        assert!(!scan.is_out_of_order());
    }

    #[test]
    fn scan_detects_out_of_order() {
        let lines = ["]]~~", "~~[["];
        let scan = scan_markers(&lines, &markers());
        assert!(scan.is_out_of_order());
        assert_eq!(scan.kept_lines(), 0);
    }

    #[test]
    fn scan_without_markers() {
        let lines = ["a", "b"];
        let scan = scan_markers(&lines, &markers());
        assert!(!scan.has_begin());
        assert!(!scan.has_end());
        assert_eq!(scan.kept_lines(), 2);
    }
}
