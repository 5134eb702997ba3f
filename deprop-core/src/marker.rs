//! The two-line deprecation marker and the "already marked" check.

use crate::config::DepropConfig;

/// Number of lines above a declaration inspected for an existing marker.
pub const LOOKBACK_WINDOW: usize = 3;

/// Advisory comment plus deprecation annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    comment: String,
    annotation: String,
}

impl Default for Marker {
    fn default() -> Self {
        Self::from_config(&DepropConfig::default())
    }
}

impl Marker {
    pub fn new(comment: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            annotation: annotation.into(),
        }
    }

    pub fn from_config(config: &DepropConfig) -> Self {
        Self::new(config.marker_comment(), config.marker_annotation())
    }

    /// The marker as two lines, each prefixed with `indent`.
    pub fn lines(&self, indent: &str) -> Vec<String> {
        vec![
            format!("{}{}", indent, self.comment),
            format!("{}{}", indent, self.annotation),
        ]
    }

    /// Whether the declaration at `decl_line` already carries the marker.
    ///
    /// Looks at the whole absorbed leading block starting at `lexical_start`
    /// (so a marker placed above a long doc comment is still found) and, past
    /// it, at up to [`LOOKBACK_WINDOW`] lines in total. The look-back stops at
    /// a line that closes a previous statement or block (`;`, `{`, `}`), so
    /// the marker of a neighbouring one-line declaration does not count.
    pub fn is_marked(&self, lines: &[String], decl_line: usize, lexical_start: usize) -> bool {
        let decl_line = decl_line.min(lines.len());
        let lexical_start = lexical_start.min(decl_line);

        for (seen, i) in (0..decl_line).rev().enumerate() {
            let line = lines[i].trim();
            let in_block = i >= lexical_start;
            if !in_block && seen >= LOOKBACK_WINDOW {
                return false;
            }
            if !in_block && line.ends_with([';', '{', '}']) {
                return false;
            }
            if line.contains(self.annotation.as_str()) {
                return true;
            }
        }
        false
    }
}

/// Leading whitespace of a line.
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}
