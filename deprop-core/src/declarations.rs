//! Line-oriented declaration scanning.
//!
//! Declarations are recognized by shape, one line at a time:
//! - Method: modifier/type tokens, then the name, then `(`
//! - Type: optional modifiers, then `class Name`
//!
//! This is pattern matching, not parsing. A declaration split across lines
//! before its name, or a line carrying both a declaration and another call
//! to the same name, can be missed.

use regex::Regex;
use std::sync::OnceLock;

use crate::marker::Marker;
use crate::scope::lexical_start;

/// Tokens that turn a `type name(` shaped line into a statement.
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "new", "throw", "else", "case", "yield", "await", "assert", "goto", "do", "try",
    "package", "import", "default:",
];

/// Names that look like calls but are language constructs.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "synchronized", "return", "new", "throw", "super",
    "this", "try", "do", "else", "assert",
];

/// Modifiers that allow a body-less member declaration ending in `;`.
const BODYLESS_MODIFIERS: &[&str] = &["abstract", "native"];

/// Kind of declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Method,
    Type,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Method => write!(f, "method"),
            DeclKind::Type => write!(f, "class"),
        }
    }
}

/// What to look for: a name, optionally narrowed to an exact signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub signature: Option<String>,
}

impl Target {
    /// Name-only target.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: None,
        }
    }

    /// Target narrowed by a signature; blank signatures are ignored.
    pub fn with_signature(name: impl Into<String>, signature: Option<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// A declaration located in one file of the corpus.
///
/// Line numbers are 0-based indices into the file's line buffer and are only
/// valid until the buffer is edited above them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite {
    pub kind: DeclKind,
    pub name: String,
    /// Index of the file in the corpus.
    pub file: usize,
    /// Line holding the declaration itself.
    pub decl_line: usize,
    /// First line of the absorbed annotation/comment block.
    pub lexical_start: usize,
    /// Line of the balancing closing delimiter.
    pub end_line: usize,
}

impl DeclarationSite {
    /// Text of the body after the opening delimiter, through `end_line`.
    ///
    /// Empty for body-less declarations.
    pub fn body_text(&self, lines: &[String]) -> String {
        let end = self.end_line.min(lines.len().saturating_sub(1));
        if self.decl_line > end {
            return String::new();
        }
        let text = lines[self.decl_line..=end].join("\n");
        match text.find('{') {
            Some(open) => text[open + 1..].to_string(),
            None => String::new(),
        }
    }
}

fn type_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated by the tests below.
    REGEX.get_or_init(|| {
        Regex::new(
            r"^\s*(?:@[\w.$]+(?:\([^)]*\))?\s+)*(?:(?:public|protected|private|abstract|final|static|sealed|non-sealed|strictfp)\s+)*class\s+([A-Za-z_$][\w$]*)",
        )
        .expect("Hardcoded regex pattern is valid")
    })
}

fn member_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*((?:@[\w.$]+(?:\([^)]*\))?\s+)*(?:[\w$<>\[\]?,.@]+\s+)+)([A-Za-z_$][\w$]*)\s*\(")
            .expect("Hardcoded regex pattern is valid")
    })
}

fn logging_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\b(?:System\s*\.\s*(?:out|err)|log|logger|LOG|LOGGER|console)\s*\.|\bprintf\s*\(")
            .expect("Hardcoded regex pattern is valid")
    })
}

/// Whether the line is an obvious logging or printing call site.
pub fn is_logging_line(line: &str) -> bool {
    logging_regex().is_match(line)
}

fn has_statement_keyword(prefix: &str) -> bool {
    prefix
        .split_whitespace()
        .any(|tok| STATEMENT_KEYWORDS.contains(&tok))
}

/// Collapse whitespace runs and drop whitespace around punctuation.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let chars: Vec<char> = collapsed.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let tight = |ch: Option<char>| ch.is_some_and(|ch| "(),<>[]".contains(ch));
            if tight(prev) || tight(next) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Pre-compiled matcher for one [`Target`].
#[derive(Debug, Clone)]
pub struct TargetMatcher {
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Signature(String),
    Name(Regex),
}

impl TargetMatcher {
    pub fn new(target: &Target) -> Self {
        let kind = match &target.signature {
            Some(sig) => MatcherKind::Signature(normalize_whitespace(sig)),
            None => {
                let pattern = format!(
                    r"^\s*((?:@[\w.$]+(?:\([^)]*\))?\s+)*(?:[\w$<>\[\]?,.@]+\s+)+){}\s*\(",
                    regex::escape(&target.name)
                );
                // An escaped identifier always yields a valid pattern.
                let re = Regex::new(&pattern).unwrap_or_else(|_| never_matches());
                MatcherKind::Name(re)
            }
        };
        Self { kind }
    }

    /// Whether `line` is a declaration of the target.
    pub fn is_match(&self, line: &str) -> bool {
        match &self.kind {
            MatcherKind::Signature(sig) => normalize_whitespace(line).contains(sig.as_str()),
            MatcherKind::Name(re) => {
                if is_logging_line(line) {
                    return false;
                }
                re.captures(line)
                    .and_then(|caps| caps.get(1))
                    .is_some_and(|prefix| !has_statement_keyword(prefix.as_str()))
            }
        }
    }
}

fn never_matches() -> Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(r"[^\s\S]").expect("Hardcoded regex pattern is valid"))
        .clone()
}

/// Line indices of unmarked declarations of `target`, in file order.
pub fn find_method_declarations(lines: &[String], target: &Target, marker: &Marker) -> Vec<usize> {
    let matcher = TargetMatcher::new(target);
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| matcher.is_match(line))
        .filter(|(i, _)| !marker.is_marked(lines, *i, lexical_start(lines, *i)))
        .map(|(i, _)| i)
        .collect()
}

/// Name declared by a `class` line.
pub fn type_declaration_name(line: &str) -> Option<String> {
    type_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every `class` declaration in the file, in file order.
pub fn find_type_declarations(lines: &[String]) -> Vec<(usize, String)> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| type_declaration_name(line).map(|name| (i, name)))
        .collect()
}

/// Name of the member declared on `line`, if it is a method, constructor or
/// nested class declaration.
pub fn member_declaration_name(line: &str) -> Option<String> {
    if let Some(name) = type_declaration_name(line) {
        return Some(name);
    }

    let caps = member_regex().captures(line)?;
    let prefix = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();

    if has_statement_keyword(prefix) || CONTROL_KEYWORDS.contains(&name) {
        return None;
    }
    if line.trim_end().ends_with(';')
        && !prefix
            .split_whitespace()
            .any(|tok| BODYLESS_MODIFIERS.contains(&tok))
    {
        return None;
    }
    Some(name.to_string())
}
