//! Configuration loading, validation, and management for amalgam.
//!
//! Loads configuration from `./amalgam.toml` (or an explicit path) with
//! environment variable overrides. A missing file means the built-in Backbone
//! file table. Validates all settings before a plan is built.

use amalgam_core::{CommentBanner, Markers, OutputSpec, Plan, SourceSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "amalgam.toml";

/// Group name for the combined declarations header.
pub const DECLARATIONS: &str = "declarations";

/// Group name for the combined definitions source.
pub const DEFINITIONS: &str = "definitions";

/// The root configuration structure.
///
/// Maps directly to `amalgam.toml`. Plain settings come first so the struct
/// serializes to valid TOML (tables after values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmalgamConfig {
    /// Substring marking the line after which content is kept
    #[serde(default = "default_begin_marker")]
    pub begin_marker: String,

    /// Substring marking the line before which content is kept
    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    /// Line terminator for generated files
    #[serde(default = "default_newline")]
    pub newline: String,

    /// Comment leader used in origin banners
    #[serde(default = "default_banner_comment")]
    pub banner_comment: String,

    /// Directory source paths are relative to
    #[serde(default = "default_code_root")]
    pub code_root: PathBuf,

    /// Directory output paths are relative to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Output streams, written in this order
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputConfig>,

    /// Input files, concatenated in this order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Group identifier referenced by sources
    pub name: String,

    /// Destination, relative to `output_dir`
    pub path: PathBuf,

    /// Text written before the first block
    #[serde(default)]
    pub preamble: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Input file, relative to `code_root`
    pub path: PathBuf,

    /// Banner name; defaults to `path` with `/` separators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Output group this file is appended to
    #[serde(default = "default_group")]
    pub group: String,
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>, group: &str) -> Self {
        Self {
            path: path.into(),
            name: None,
            group: group.into(),
        }
    }

    /// Name shown in the origin banner.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

fn default_begin_marker() -> String {
    amalgam_core::DEFAULT_BEGIN_MARKER.into()
}
fn default_end_marker() -> String {
    amalgam_core::DEFAULT_END_MARKER.into()
}
fn default_newline() -> String {
    "\n".into()
}
fn default_banner_comment() -> String {
    "//".into()
}
fn default_code_root() -> PathBuf {
    PathBuf::from("Code")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_group() -> String {
    DECLARATIONS.into()
}

const DECLARATIONS_PREAMBLE: &str = concat!(
    "\n",
    "// This file was generated using amalgam\n",
    "// from the Backbone project.\n",
    "\n",
    "#pragma once\n",
    "\n",
    "#define BB_Inline inline\n",
    "\n",
    "\n",
);

const DEFINITIONS_PREAMBLE: &str = concat!(
    "\n",
    "// This file was generated using amalgam\n",
    "// from the Backbone project.\n",
    "\n",
    "#include \"Backbone.hpp\"\n",
    "\n",
    "\n",
);

fn default_outputs() -> Vec<OutputConfig> {
    vec![
        OutputConfig {
            name: DECLARATIONS.into(),
            path: PathBuf::from("Backbone.hpp"),
            preamble: DECLARATIONS_PREAMBLE.into(),
        },
        OutputConfig {
            name: DEFINITIONS.into(),
            path: PathBuf::from("Backbone.cpp"),
            preamble: DEFINITIONS_PREAMBLE.into(),
        },
    ]
}

/// The hand-maintained Backbone file table, in dependency order.
fn default_sources() -> Vec<SourceConfig> {
    let declarations = [
        "Common.hpp",
        "Slice.hpp",
        "Path.hpp",
        "Path.inl",
        "FixedBlock.hpp",
        "FixedBlock.inl",
        "Memory.hpp",
        "StringConversion.hpp",
        "Angle.hpp",
        "Angle.inl",
    ];
    let definitions = ["Common.cpp", "Memory.cpp", "StringConversion.cpp", "Angle.cpp"];

    declarations
        .iter()
        .map(|f| SourceConfig::new(Path::new("Backbone").join(f), DECLARATIONS))
        .chain(
            definitions
                .iter()
                .map(|f| SourceConfig::new(Path::new("Backbone").join(f), DEFINITIONS)),
        )
        .collect()
}

impl AmalgamConfig {
    /// Load configuration from `path`, or `./amalgam.toml` when `None`.
    ///
    /// Environment variables override file settings:
    /// - `AMALGAM_CODE_ROOT`
    /// - `AMALGAM_OUTPUT_DIR`
    /// - `AMALGAM_BEGIN_MARKER`
    /// - `AMALGAM_END_MARKER`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        let mut config = Self::load_from(&path)?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            outputs = config.outputs.len(),
            sources = config.sources.len(),
            "Loaded config"
        );

        config.validate()?;
        Ok(config)
    }

    /// Path of the config file in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`load`](Self::load)).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("AMALGAM_CODE_ROOT") {
            self.code_root = PathBuf::from(root);
        }
        if let Some(dir) = lookup("AMALGAM_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(marker) = lookup("AMALGAM_BEGIN_MARKER") {
            self.begin_marker = marker;
        }
        if let Some(marker) = lookup("AMALGAM_END_MARKER") {
            self.end_marker = marker;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.begin_marker.is_empty() || self.end_marker.is_empty() {
            return Err(ConfigError::ValidationError(
                "begin_marker and end_marker must not be empty".into(),
            ));
        }

        if self.begin_marker == self.end_marker {
            return Err(ConfigError::ValidationError(
                "begin_marker and end_marker must differ".into(),
            ));
        }

        if !matches!(self.newline.as_str(), "\n" | "\r\n" | "\r") {
            return Err(ConfigError::ValidationError(format!(
                "newline must be \"\\n\", \"\\r\\n\" or \"\\r\", got {:?}",
                self.newline
            )));
        }

        let mut names = HashSet::new();
        for output in &self.outputs {
            if output.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "output name must not be empty".into(),
                ));
            }
            if !names.insert(output.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate output '{}'",
                    output.name
                )));
            }
        }

        for source in &self.sources {
            if source.path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "source path must not be empty".into(),
                ));
            }
            if !names.contains(source.group.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "source '{}' refers to unknown output '{}'",
                    source.display_name(),
                    source.group
                )));
            }
        }

        Ok(())
    }

    pub fn markers(&self) -> Markers {
        Markers::new(self.begin_marker.clone(), self.end_marker.clone())
    }

    pub fn banner(&self) -> CommentBanner {
        CommentBanner::new(self.banner_comment.clone())
    }

    /// Resolve every path and build the run plan.
    pub fn plan(&self) -> Plan {
        Plan {
            markers: self.markers(),
            newline: self.newline.clone(),
            outputs: self
                .outputs
                .iter()
                .map(|o| OutputSpec {
                    name: o.name.clone(),
                    path: self.output_dir.join(&o.path),
                    preamble: o.preamble.clone(),
                })
                .collect(),
            sources: self
                .sources
                .iter()
                .map(|s| SourceSpec {
                    name: s.display_name(),
                    path: self.code_root.join(&s.path),
                    group: s.group.clone(),
                })
                .collect(),
        }
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AmalgamConfig {
    fn default() -> Self {
        Self {
            begin_marker: default_begin_marker(),
            end_marker: default_end_marker(),
            newline: default_newline(),
            banner_comment: default_banner_comment(),
            code_root: default_code_root(),
            output_dir: default_output_dir(),
            outputs: default_outputs(),
            sources: default_sources(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AmalgamConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.begin_marker, "~~[[");
        assert_eq!(config.end_marker, "]]~~");
        assert_eq!(config.newline, "\n");
        assert_eq!(config.outputs.len(), 2);
        assert_eq!(config.sources.len(), 14);
    }

    #[test]
    fn default_table_order() {
        let config = AmalgamConfig::default();
        let declarations: Vec<_> = config
            .sources
            .iter()
            .filter(|s| s.group == DECLARATIONS)
            .map(SourceConfig::display_name)
            .collect();
        assert_eq!(declarations[0], "Backbone/Common.hpp");
        assert_eq!(declarations[1], "Backbone/Slice.hpp");
        assert_eq!(declarations[3], "Backbone/Path.inl");
        assert_eq!(declarations.len(), 10);
    }

    #[test]
    fn declarations_preamble_layout() {
        let config = AmalgamConfig::default();
        let lines: Vec<&str> = config.outputs[0].preamble.lines().collect();
        assert_eq!(lines.first(), Some(&""));
        assert!(lines.contains(&"#pragma once"));
        assert_eq!(
            &lines[lines.len() - 3..],
            &["#define BB_Inline inline", "", ""]
        );
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AmalgamConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AmalgamConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AmalgamConfig::default_toml();
        assert!(toml_str.contains("~~[["));
        assert!(toml_str.contains("Backbone.hpp"));
        assert!(toml_str.contains("[[sources]]"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AmalgamConfig::load_from(Path::new("/nonexistent/amalgam.toml"));
        assert_eq!(result.unwrap(), AmalgamConfig::default());
    }

    #[test]
    fn parse_custom_table() {
        let toml_str = r##"
begin_marker = "BEGIN"
end_marker = "END"
newline = "\r\n"
code_root = "src"

[[outputs]]
name = "combined"
path = "combined.h"
preamble = "#pragma once\n"

[[sources]]
path = "a/one.h"
group = "combined"

[[sources]]
path = "two.h"
name = "Second"
group = "combined"
"##;
        let config: AmalgamConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.newline, "\r\n");
        assert_eq!(config.banner_comment, "//");

        let plan = config.plan();
        assert_eq!(plan.markers, Markers::new("BEGIN", "END"));
        assert_eq!(plan.outputs[0].path, Path::new(".").join("combined.h"));
        assert_eq!(plan.sources[0].name, "a/one.h");
        assert_eq!(plan.sources[0].path, Path::new("src").join("a/one.h"));
        assert_eq!(plan.sources[1].name, "Second");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amalgam.toml");
        std::fs::write(&path, "banner_comment = \"#\"\n").unwrap();

        let config = AmalgamConfig::load_from(&path).unwrap();
        assert_eq!(config.banner_comment, "#");
        assert_eq!(config.sources.len(), 14);
    }

    #[test]
    fn unparsable_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amalgam.toml");
        std::fs::write(&path, "begin_marker = [").unwrap();

        let err = AmalgamConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn identical_markers_rejected() {
        let config = AmalgamConfig {
            end_marker: "~~[[".into(),
            ..AmalgamConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_marker_rejected() {
        let config = AmalgamConfig {
            begin_marker: String::new(),
            ..AmalgamConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn odd_newline_rejected() {
        let config = AmalgamConfig {
            newline: "\n\n".into(),
            ..AmalgamConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_group_rejected() {
        let mut config = AmalgamConfig::default();
        config.sources.push(SourceConfig::new("Tests/Test_Slice.cpp", "tests"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tests"));
    }

    #[test]
    fn duplicate_output_rejected() {
        let mut config = AmalgamConfig::default();
        config.outputs.push(config.outputs[0].clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("AMALGAM_CODE_ROOT", "/work/Code"),
            ("AMALGAM_OUTPUT_DIR", "/work/dist"),
            ("AMALGAM_BEGIN_MARKER", "<<"),
        ]
        .into_iter()
        .collect();

        let mut config = AmalgamConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.code_root, PathBuf::from("/work/Code"));
        assert_eq!(config.output_dir, PathBuf::from("/work/dist"));
        assert_eq!(config.begin_marker, "<<");
        assert_eq!(config.end_marker, "]]~~");
    }

    #[test]
    fn plan_resolves_paths() {
        let config = AmalgamConfig {
            code_root: PathBuf::from("/lib/Code"),
            output_dir: PathBuf::from("/out"),
            ..AmalgamConfig::default()
        };
        let plan = config.plan();
        assert_eq!(plan.outputs[0].path, PathBuf::from("/out/Backbone.hpp"));
        assert_eq!(
            plan.sources[0].path,
            PathBuf::from("/lib/Code/Backbone/Common.hpp")
        );
        assert_eq!(plan.sources[0].name, "Backbone/Common.hpp");
        assert_eq!(plan.sources_for(DEFINITIONS).count(), 4);
    }
}
