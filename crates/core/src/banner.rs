//! Origin banners written ahead of each file's trimmed window.

/// Produces the decorative header identifying where a block came from.
///
/// The returned string may span several lines separated by `\n`; the
/// amalgamator splits it so that every output line uses the configured
/// terminator.
pub trait BannerFormatter {
    fn format(&self, display_name: &str) -> String;
}

impl<F> BannerFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format(&self, display_name: &str) -> String {
        self(display_name)
    }
}

/// Default banner: a three-line comment block naming the source file.
///
/// ```text
/// //
/// // From Source File: Backbone/Common.hpp
/// //
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBanner {
    leader: String,
}

impl CommentBanner {
    pub fn new(leader: impl Into<String>) -> Self {
        Self {
            leader: leader.into(),
        }
    }
}

impl Default for CommentBanner {
    fn default() -> Self {
        Self::new("//")
    }
}

impl BannerFormatter for CommentBanner {
    fn format(&self, display_name: &str) -> String {
        let leader = &self.leader;
        format!("{leader}\n{leader} From Source File: {display_name}\n{leader}")
    }
}
