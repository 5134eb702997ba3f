//! Lexical bounds of a declaration.
//!
//! The start absorbs the annotation/comment/blank block directly above a
//! declaration; the end is found by brace depth counting. In
//! [`ScopeMode::Textual`] every `{` and `}` on a line counts, including
//! those inside string literals and comments, so pathological lines can
//! shift the end. [`ScopeMode::Lexed`] skips literals and comments.
//!
//! Members are recognised per line. A member declared on the same line as
//! its type's opening brace (`class B { void b() {} }`) is not a direct
//! member of that type.

use crate::config::ScopeMode;

/// Whether a line belongs to the leading block absorbed into a declaration.
///
/// An annotation line that ends a statement or block carries its own
/// declaration (`@Override void a() {}`) and is not leading.
fn is_leading_line(line: &str) -> bool {
    let t = line.trim();
    if t.starts_with('@') {
        return !t.ends_with([';', '{', '}']);
    }
    t.is_empty() || t.starts_with("/*") || t.starts_with('*')
}

/// Walk upward from `decl_line` over annotation, doc-comment and blank lines.
pub fn lexical_start(lines: &[String], decl_line: usize) -> usize {
    let mut start = decl_line.min(lines.len());
    while start > 0 && is_leading_line(&lines[start - 1]) {
        start -= 1;
    }
    start
}

/// Line index of the delimiter closing the declaration at `start`.
///
/// Returns the last line when the file ends before depth returns to zero.
pub fn find_scope_end(lines: &[String], start: usize, mode: ScopeMode) -> usize {
    let last = lines.len().saturating_sub(1);
    let mut counter = DepthCounter::new(mode);

    for (i, line) in lines.iter().enumerate().skip(start) {
        counter.feed(line);
        if counter.opened && counter.depth <= 0 {
            return i;
        }
        // Body-less declaration (abstract or interface method).
        if !counter.opened && line.trim_end().ends_with(';') {
            return i;
        }
    }
    last
}

/// Lines between `start` and `end` (exclusive of both) that begin at depth 1
/// of the scope opened at `start`, i.e. its direct members.
pub fn direct_member_lines(lines: &[String], start: usize, end: usize, mode: ScopeMode) -> Vec<usize> {
    let end = end.min(lines.len());
    let mut counter = DepthCounter::new(mode);
    let mut members = Vec::new();

    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        if i > start && counter.depth == 1 {
            members.push(i);
        }
        counter.feed(line);
    }
    members
}

/// Running brace depth over successive lines.
#[derive(Debug, Clone)]
pub struct DepthCounter {
    mode: ScopeMode,
    /// Current nesting depth.
    pub depth: i64,
    /// Whether depth has been positive at least once.
    pub opened: bool,
    in_block_comment: bool,
}

impl DepthCounter {
    pub fn new(mode: ScopeMode) -> Self {
        Self {
            mode,
            depth: 0,
            opened: false,
            in_block_comment: false,
        }
    }

    /// Account for every delimiter on `line`.
    pub fn feed(&mut self, line: &str) {
        match self.mode {
            ScopeMode::Textual => {
                for c in line.chars() {
                    self.delimiter(c);
                }
            }
            ScopeMode::Lexed => self.feed_lexed(line),
        }
    }

    fn delimiter(&mut self, c: char) {
        match c {
            '{' => {
                self.depth += 1;
                self.opened = true;
            }
            '}' => self.depth -= 1,
            _ => {}
        }
    }

    fn feed_lexed(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            if self.in_block_comment {
                if c == '*' && next == Some('/') {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }

            match (c, next) {
                ('/', Some('/')) => return,
                ('/', Some('*')) => {
                    self.in_block_comment = true;
                    i += 2;
                }
                ('"', _) | ('\'', _) => i = skip_literal(&chars, i),
                _ => {
                    self.delimiter(c);
                    i += 1;
                }
            }
        }
    }
}

/// Index just past the string or char literal opening at `open`.
///
/// An unterminated literal runs to the end of the line.
fn skip_literal(chars: &[char], open: usize) -> usize {
    let quote = chars[open];
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}
