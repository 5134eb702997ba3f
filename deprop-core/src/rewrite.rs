//! Marker insertion into a file's line buffer.
//!
//! Every insertion shifts the lines below it, so within one file sites are
//! applied from the highest lexical start to the lowest: a site above an
//! insertion point never moves, and sites below it have already been handled.

use tracing::debug;

use crate::corpus::SourceFile;
use crate::declarations::DeclarationSite;
use crate::marker::{indentation, Marker};

/// Line the marker is inserted at for `site`.
///
/// The lexical start with any leading blank lines skipped, so blank
/// separators stay above the marker and the marker sits directly on top of
/// the doc comment, annotations or the declaration itself.
pub fn insertion_line(lines: &[String], site: &DeclarationSite) -> usize {
    let mut at = site.lexical_start;
    while at < site.decl_line && lines.get(at).is_some_and(|l| l.trim().is_empty()) {
        at += 1;
    }
    at
}

/// Insert the marker above one site unless it is already marked.
///
/// Returns whether the buffer changed.
pub fn mark_site(file: &mut SourceFile, site: &DeclarationSite, marker: &Marker) -> bool {
    let lines = file.lines();
    if site.decl_line >= lines.len() {
        return false;
    }
    if marker.is_marked(lines, site.decl_line, site.lexical_start) {
        return false;
    }

    let at = insertion_line(lines, site);
    let indent = indentation(&lines[site.decl_line]).to_string();
    file.insert_lines(at, marker.lines(&indent));

    debug!(
        file = %file.path().display(),
        name = %site.name,
        kind = %site.kind,
        line = at + 1,
        "inserted marker"
    );
    true
}

/// Mark every site of one file, highest lexical start first.
///
/// Returns the sites that were actually marked, in application order. Sites
/// that turn out to be marked already (for instance the same declaration
/// reached twice) are skipped.
pub fn apply_markers(
    file: &mut SourceFile,
    mut sites: Vec<DeclarationSite>,
    marker: &Marker,
) -> Vec<DeclarationSite> {
    sites.sort_by(|a, b| {
        b.lexical_start
            .cmp(&a.lexical_start)
            .then(b.decl_line.cmp(&a.decl_line))
    });
    sites.dedup_by_key(|s| s.decl_line);

    sites
        .into_iter()
        .filter(|site| mark_site(file, site, marker))
        .collect()
}
