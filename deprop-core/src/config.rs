//! Configuration loading from deprop.toml.
//!
//! Every field is optional; anything left out falls back to the defaults
//! below, which target Java sources.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Config file name looked up at the corpus root.
pub const CONFIG_FILE: &str = "deprop.toml";

/// Default advisory comment line of the marker.
pub const DEFAULT_MARKER_COMMENT: &str = "/** Do not change without asking MODS Team*/";

/// Default deprecation annotation line of the marker.
pub const DEFAULT_MARKER_ANNOTATION: &str = "@Deprecated";

/// Default source file extension (without the dot).
pub const DEFAULT_EXTENSION: &str = "java";

/// Main configuration structure for deprop.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DepropConfig {
    /// Source file extension to scan, without the leading dot.
    pub extension: Option<String>,
    /// Directory names excluded in addition to the built-in build dirs.
    pub exclude: Vec<String>,
    /// Marker text.
    pub marker: MarkerConfig,
    /// Callee propagation settings.
    pub cascade: CascadeConfig,
    /// Scope extraction settings.
    pub scope: ScopeConfig,
}

/// The two marker lines.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub comment: Option<String>,
    pub annotation: Option<String>,
}

/// Callee propagation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CascadeConfig {
    /// Follow calls out of newly marked bodies.
    pub enabled: bool,
    /// Never cascade into accessor-style names.
    pub skip_accessors: bool,
    /// What counts as an accessor name when `skip_accessors` is on.
    pub accessor_rule: AccessorRule,
    /// Extra call names that never become cascade targets.
    pub extra_keywords: Vec<String>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_accessors: true,
            accessor_rule: AccessorRule::default(),
            extra_keywords: Vec::new(),
        }
    }
}

/// Which call names are treated as accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessorRule {
    /// `get`/`is`/`set` followed by an uppercase letter, digit or `_`
    /// (`getName`, `set_value`). `settle` and `issue` are not accessors.
    #[default]
    Capitalized,
    /// Any name that starts with `get`/`is`/`set` and is longer than the
    /// prefix, so `settle` and `issue` are accessors too.
    Prefix,
}

/// Scope extraction settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    pub mode: ScopeMode,
}

/// How braces are counted when bounding a declaration's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// Count every `{` and `}` on a line, including those inside string
    /// literals and comments.
    #[default]
    Textual,
    /// Skip string/char literals and comments while counting.
    Lexed,
}

impl DepropConfig {
    /// Source extension with defaults applied.
    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }

    /// Marker comment line with defaults applied.
    pub fn marker_comment(&self) -> &str {
        self.marker
            .comment
            .as_deref()
            .unwrap_or(DEFAULT_MARKER_COMMENT)
    }

    /// Marker annotation line with defaults applied.
    pub fn marker_annotation(&self) -> &str {
        self.marker
            .annotation
            .as_deref()
            .unwrap_or(DEFAULT_MARKER_ANNOTATION)
    }
}

/// Loads configuration from deprop.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DepropConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).context("Invalid deprop.toml")?;
    Ok(Some(cfg))
}
