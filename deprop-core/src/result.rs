//! Run outcome and its accumulator.
//!
//! [`PropagationResult`] is the only thing a caller receives from a run. It
//! serializes to the flat JSON shape the front ends expose:
//! `success`, `filesUpdated`, `methodsDeprecated`, `classesDeprecated`,
//! `details`, `error`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DepropError;

/// Immutable outcome of one propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationResult {
    pub success: bool,
    pub files_updated: usize,
    #[serde(rename = "methodsDeprecated")]
    pub methods_marked: usize,
    #[serde(rename = "classesDeprecated")]
    pub types_promoted: usize,
    /// Multi-line human-readable log.
    pub details: String,
    pub error: Option<String>,
}

impl PropagationResult {
    /// A failed run that did no work.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            files_updated: 0,
            methods_marked: 0,
            types_promoted: 0,
            details: format!("{}\n", message),
            error: Some(message),
        }
    }
}

/// Accumulates counters and log lines during a run.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    files_updated: usize,
    methods_marked: usize,
    types_promoted: usize,
    cascade_targets: usize,
    log: Vec<String>,
    errors: Vec<String>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a log line.
    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Append an empty separator line.
    pub fn blank(&mut self) {
        self.log.push(String::new());
    }

    pub fn record_occurrences(&mut self, path: &Path, count: usize) {
        self.log(format!("Found {} occurrence(s) in: {}", count, path.display()));
    }

    pub fn record_method(&mut self, name: &str, path: &Path, line: usize) {
        self.methods_marked += 1;
        self.log(format!(
            "Deprecated method: {} ({}:{})",
            name,
            path.display(),
            line + 1
        ));
    }

    pub fn record_cascade(&mut self, caller: &str, callee: &str) {
        self.cascade_targets += 1;
        self.log(format!("Cascading from {} to callee: {}", caller, callee));
    }

    pub fn record_promotion(&mut self, name: &str, path: &Path) {
        self.types_promoted += 1;
        self.log(format!(
            "Deprecating class: {} (only contains deprecated methods) in {}",
            name,
            path.display()
        ));
    }

    pub fn record_file_updated(&mut self, path: &Path) {
        self.files_updated += 1;
        self.log(format!("Updated: {}", path.display()));
    }

    /// Dry-run counterpart of [`ResultAggregator::record_file_updated`].
    pub fn record_file_pending(&mut self, path: &Path) {
        self.files_updated += 1;
        self.log(format!("Would update: {}", path.display()));
    }

    /// Record a per-file failure; the run continues but will not succeed.
    pub fn record_error(&mut self, err: &DepropError) {
        let message = err.to_string();
        self.log(format!("Error: {}", message));
        self.errors.push(message);
    }

    /// Close the log with a summary and freeze the result.
    pub fn finish(mut self) -> PropagationResult {
        let success = self.errors.is_empty();
        self.blank();
        if success {
            self.log("Deprecation process completed successfully!");
        } else {
            self.log(format!(
                "Deprecation process completed with {} error(s).",
                self.errors.len()
            ));
        }
        self.log(format!("Total files updated: {}", self.files_updated));
        self.log(format!("Total methods deprecated: {}", self.methods_marked));
        self.log(format!("Total classes deprecated: {}", self.types_promoted));
        if self.cascade_targets > 0 {
            self.log(format!("Cascade targets followed: {}", self.cascade_targets));
        }

        let mut details = self.log.join("\n");
        details.push('\n');

        PropagationResult {
            success,
            files_updated: self.files_updated,
            methods_marked: self.methods_marked,
            types_promoted: self.types_promoted,
            details,
            error: if success {
                None
            } else {
                Some(self.errors.join("; "))
            },
        }
    }
}
