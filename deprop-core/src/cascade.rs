//! Callee discovery inside a marked body and the cascade worklist.
//!
//! Call sites are found textually: an identifier directly followed by `(`.
//! `receiver.name(` collapses to `name`; `new Name(` and `new pkg.Name(` are
//! constructor invocations and are skipped. Language keywords, common built-in names and
//! accessor-style names never become cascade targets.

use regex::Regex;
use std::collections::{HashSet, VecDeque};
use std::sync::OnceLock;

use crate::config::{AccessorRule, CascadeConfig};

/// Keywords and built-in type/utility names that are never cascade targets.
pub const EXCLUDED_CALL_NAMES: &[&str] = &[
    // control flow and exceptions
    "if", "else", "for", "while", "do", "switch", "case", "catch", "try", "finally", "throw",
    "throws", "return", "synchronized", "assert", "new", "super", "this", "instanceof", "yield",
    // built-in types
    "String", "Integer", "Long", "Double", "Float", "Boolean", "Character", "Byte", "Short",
    "Object", "Math", "Objects", "Arrays", "Collections", "List", "Map", "Set", "Optional",
    "System", "Thread", "StringBuilder",
    // common utilities
    "println", "print", "printf", "format", "valueOf", "parseInt", "parseLong", "parseDouble",
    "toString", "equals", "hashCode", "compareTo", "length", "size", "charAt", "substring",
    "sqrt", "pow", "abs", "min", "max", "requireNonNull", "asList", "of", "stream", "collect",
    "forEach", "append", "trim", "contains", "put", "remove", "clear", "iterator", "hasNext",
    "next", "close",
];

/// Accessor prefixes, see [`AccessorRule`].
pub const ACCESSOR_PREFIXES: &[&str] = &["get", "is", "set"];

fn call_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated by the tests below.
    REGEX.get_or_init(|| {
        Regex::new(r"(\bnew\s+(?:[\w$]+\s*\.\s*)*)?\b([A-Za-z_$][\w$]*)\s*\(")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Whether `name` is an accessor under `rule`.
pub fn is_accessor_name(name: &str, rule: AccessorRule) -> bool {
    ACCESSOR_PREFIXES.iter().any(|prefix| {
        let Some(next) = name.strip_prefix(prefix).and_then(|rest| rest.chars().next()) else {
            return false;
        };
        match rule {
            AccessorRule::Capitalized => next.is_uppercase() || next.is_ascii_digit() || next == '_',
            AccessorRule::Prefix => true,
        }
    })
}

/// Decides which call names may become cascade targets.
#[derive(Debug, Clone)]
pub struct CallFilter {
    skip_accessors: bool,
    accessor_rule: AccessorRule,
    excluded: HashSet<String>,
}

impl Default for CallFilter {
    fn default() -> Self {
        Self::from_config(&CascadeConfig::default())
    }
}

impl CallFilter {
    pub fn from_config(config: &CascadeConfig) -> Self {
        let excluded = EXCLUDED_CALL_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_keywords.iter().cloned())
            .collect();
        Self {
            skip_accessors: config.skip_accessors,
            accessor_rule: config.accessor_rule,
            excluded,
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        !self.excluded.contains(name)
            && !(self.skip_accessors && is_accessor_name(name, self.accessor_rule))
    }
}

/// Distinct callee names in `body`, in order of first appearance.
pub fn find_call_sites(body: &str, filter: &CallFilter) -> Vec<String> {
    let mut seen = HashSet::new();
    call_regex()
        .captures_iter(body)
        .filter(|caps| caps.get(1).is_none())
        .filter_map(|caps| caps.get(2).map(|m| m.as_str()))
        .filter(|name| filter.allows(name))
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Names waiting to be resolved, plus every name ever queued.
///
/// A name enters the queue at most once per run, which is what makes the
/// cascade terminate on call cycles.
#[derive(Debug, Default)]
pub struct CascadeFrontier {
    queue: VecDeque<String>,
    visited: HashSet<String>,
}

impl CascadeFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as processed without queueing it.
    pub fn mark_visited(&mut self, name: &str) {
        self.visited.insert(name.to_string());
    }

    /// Queue `name` unless it was seen before. Returns whether it was queued.
    pub fn push(&mut self, name: &str) -> bool {
        if self.visited.insert(name.to_string()) {
            self.queue.push_back(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
