//! The pattern-matching seam between the propagation engine and the text.
//!
//! The engine never matches text itself; it asks a [`SourceHeuristics`]
//! implementation where declarations, call sites and scope ends are. The
//! default [`TextHeuristics`] is line-oriented pattern matching. A lexer-backed
//! implementation can replace it without touching the propagation control
//! flow.

use crate::cascade::{find_call_sites, CallFilter};
use crate::config::{DepropConfig, ScopeMode};
use crate::declarations::{
    find_method_declarations, find_type_declarations, member_declaration_name, Target,
};
use crate::marker::Marker;
use crate::scope::{direct_member_lines, find_scope_end, lexical_start};

/// Text queries the engine needs.
///
/// # Example
/// ```ignore
/// struct Strict;
///
/// impl SourceHeuristics for Strict {
///     fn find_declarations(&self, lines: &[String], target: &Target, marker: &Marker) -> Vec<usize> {
///         my_lexer::declarations(lines, &target.name)
///     }
///     // ...
/// }
/// ```
pub trait SourceHeuristics: Send + Sync {
    /// Lines holding unmarked declarations of `target`, in file order.
    fn find_declarations(&self, lines: &[String], target: &Target, marker: &Marker) -> Vec<usize>;

    /// Every type declaration as `(line, name)`, in file order.
    fn find_type_declarations(&self, lines: &[String]) -> Vec<(usize, String)>;

    /// Direct member declarations of the type whose body spans
    /// `decl_line..=end_line`, as `(line, name)`.
    fn find_members(&self, lines: &[String], decl_line: usize, end_line: usize) -> Vec<(usize, String)>;

    /// Callee names that may become cascade targets.
    fn find_call_sites(&self, body: &str) -> Vec<String>;

    /// Line of the delimiter closing the scope opened at `start`.
    fn find_scope_end(&self, lines: &[String], start: usize) -> usize;

    /// First line of the annotation/comment block above `decl_line`.
    fn lexical_start(&self, lines: &[String], decl_line: usize) -> usize {
        lexical_start(lines, decl_line)
    }
}

/// Default line-oriented heuristics.
#[derive(Debug, Clone, Default)]
pub struct TextHeuristics {
    scope_mode: ScopeMode,
    calls: CallFilter,
}

impl TextHeuristics {
    pub fn new(scope_mode: ScopeMode, calls: CallFilter) -> Self {
        Self { scope_mode, calls }
    }

    pub fn from_config(config: &DepropConfig) -> Self {
        Self::new(config.scope.mode, CallFilter::from_config(&config.cascade))
    }
}

impl SourceHeuristics for TextHeuristics {
    fn find_declarations(&self, lines: &[String], target: &Target, marker: &Marker) -> Vec<usize> {
        find_method_declarations(lines, target, marker)
    }

    fn find_type_declarations(&self, lines: &[String]) -> Vec<(usize, String)> {
        find_type_declarations(lines)
    }

    fn find_members(&self, lines: &[String], decl_line: usize, end_line: usize) -> Vec<(usize, String)> {
        direct_member_lines(lines, decl_line, end_line, self.scope_mode)
            .into_iter()
            .filter_map(|i| member_declaration_name(&lines[i]).map(|name| (i, name)))
            .collect()
    }

    fn find_call_sites(&self, body: &str) -> Vec<String> {
        find_call_sites(body, &self.calls)
    }

    fn find_scope_end(&self, lines: &[String], start: usize) -> usize {
        find_scope_end(lines, start, self.scope_mode)
    }
}
