//! Class promotion: mark a type once every member it declares is marked.
//!
//! Types in a file are decided from the last declaration to the first, and
//! each promotion is applied before the next type is examined. A nested type
//! therefore gets promoted before its enclosing type counts its members, and
//! no insertion ever lands above a type still waiting to be examined.

use tracing::{debug, info};

use crate::corpus::SourceFile;
use crate::declarations::{DeclKind, DeclarationSite};
use crate::heuristics::SourceHeuristics;
use crate::marker::Marker;
use crate::rewrite::mark_site;

/// Per-type promotion state within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionState {
    /// Not looked at yet.
    Unexamined,
    /// Already marked, or still declares unmarked members.
    Retained,
    /// Marker inserted during this run.
    Promoted,
}

/// Decision for one type declaration.
#[derive(Debug, Clone)]
pub struct PromotionOutcome {
    pub site: DeclarationSite,
    pub state: PromotionState,
    /// Direct members without the marker at decision time.
    pub unmarked_members: usize,
    /// Whether the type carried the marker before this run touched it.
    pub already_marked: bool,
}

/// Examines one type declaration and promotes it when eligible.
pub struct ClassPromotion<'a> {
    heuristics: &'a dyn SourceHeuristics,
    marker: &'a Marker,
}

impl<'a> ClassPromotion<'a> {
    pub fn new(heuristics: &'a dyn SourceHeuristics, marker: &'a Marker) -> Self {
        Self { heuristics, marker }
    }

    /// Number of direct members of the type at `decl_line` lacking the marker.
    pub fn count_unmarked_members(&self, lines: &[String], decl_line: usize, end_line: usize) -> usize {
        self.heuristics
            .find_members(lines, decl_line, end_line)
            .into_iter()
            .filter(|(line, _)| {
                let start = self.heuristics.lexical_start(lines, *line);
                !self.marker.is_marked(lines, *line, start)
            })
            .count()
    }

    /// Decide, and apply, promotion for every type in `file`.
    pub fn promote_file(&self, file: &mut SourceFile, file_index: usize) -> Vec<PromotionOutcome> {
        let mut types = self.heuristics.find_type_declarations(file.lines());
        types.sort_by(|a, b| b.0.cmp(&a.0));

        let mut outcomes = Vec::with_capacity(types.len());
        for (decl_line, name) in types {
            let outcome = self.examine(file, file_index, decl_line, name);
            outcomes.push(outcome);
        }
        outcomes.reverse();
        outcomes
    }

    fn examine(
        &self,
        file: &mut SourceFile,
        file_index: usize,
        decl_line: usize,
        name: String,
    ) -> PromotionOutcome {
        let lines = file.lines();
        let lexical_start = self.heuristics.lexical_start(lines, decl_line);
        let end_line = self.heuristics.find_scope_end(lines, decl_line);
        let site = DeclarationSite {
            kind: DeclKind::Type,
            name,
            file: file_index,
            decl_line,
            lexical_start,
            end_line,
        };

        let mut outcome = PromotionOutcome {
            site,
            state: PromotionState::Unexamined,
            unmarked_members: 0,
            already_marked: self.marker.is_marked(lines, decl_line, lexical_start),
        };

        if outcome.already_marked {
            outcome.state = PromotionState::Retained;
            return outcome;
        }

        outcome.unmarked_members = self.count_unmarked_members(lines, decl_line, end_line);
        if outcome.unmarked_members > 0 {
            debug!(
                class = %outcome.site.name,
                unmarked = outcome.unmarked_members,
                "class retained"
            );
            outcome.state = PromotionState::Retained;
            return outcome;
        }

        if mark_site(file, &outcome.site, self.marker) {
            info!(
                file = %file.path().display(),
                class = %outcome.site.name,
                "class promoted"
            );
            outcome.state = PromotionState::Promoted;
        } else {
            outcome.state = PromotionState::Retained;
        }
        outcome
    }
}
