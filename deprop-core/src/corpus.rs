//! Corpus discovery and per-file line buffers.
//!
//! The corpus owns every eligible source file for the duration of one run:
//! text is read once up front, mutated in memory through [`SourceFile`], and
//! written back at most once per file by [`Corpus::commit`].
//!
//! Performance characteristics:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel file reading via Rayon (read-only; mutation stays sequential)

use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DepropError, DepropResult, IoResultExt};

/// Build-output and tooling directories that are never scanned.
pub const EXCLUDED_DIRS: &[&str] = &["target", "build", ".git", ".gradle", "node_modules"];

/// Checks if a directory entry should be pruned (excluded from traversal).
///
/// The walk root itself is never pruned, even if it is named `build`.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all files with the given extension below `root`, sorted by path.
///
/// `extra_excludes` is added to [`EXCLUDED_DIRS`]. Entries the walker cannot
/// read are returned as errors alongside the files that were found.
pub fn gather_source_files(
    root: &Path,
    extension: &str,
    extra_excludes: &[String],
) -> (Vec<PathBuf>, Vec<DepropError>) {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(extra_excludes.iter().map(String::as_str))
        .collect();

    let (mut files, errors): (Vec<_>, Vec<_>) = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && path.extension().is_some_and(|ext| ext == extension)
                {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk error"));
                Some(Err(DepropError::io(path, io)))
            }
        })
        .partition_map(|r| match r {
            Ok(p) => rayon::iter::Either::Left(p),
            Err(e) => rayon::iter::Either::Right(e),
        });

    files.sort();
    (files, errors)
}

/// A source file's text held as an ordered, mutable sequence of lines.
///
/// Lines are split on `\n` only, so [`SourceFile::text`] reproduces the
/// loaded bytes exactly (trailing newline and `\r` included) until the
/// buffer is edited.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    original: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Build a buffer from already-loaded text.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let original = text.into();
        let lines = original.split('\n').map(str::to_string).collect();
        Self {
            path: path.into(),
            original,
            lines,
        }
    }

    /// Read a file from disk into a fresh buffer.
    pub fn load(path: &Path) -> DepropResult<Self> {
        let text = fs::read_to_string(path).with_path(path)?;
        Ok(Self::from_text(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Insert `new_lines` so that the first of them lands at index `at`.
    pub fn insert_lines(&mut self, at: usize, new_lines: Vec<String>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, new_lines);
    }

    /// Current full text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether the buffer differs from what was loaded.
    pub fn is_dirty(&self) -> bool {
        self.text() != self.original
    }

    /// Write the buffer back if it changed. Returns whether a write happened.
    pub fn commit(&mut self) -> DepropResult<bool> {
        let text = self.text();
        if text == self.original {
            return Ok(false);
        }
        fs::write(&self.path, &text).with_path(&self.path)?;
        self.original = text;
        Ok(true)
    }
}

/// Outcome of writing dirty buffers back to disk.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Files written, in corpus order.
    pub written: Vec<PathBuf>,
    /// Files that were dirty but could not be written.
    pub errors: Vec<DepropError>,
}

/// All eligible source files under one root, owned for one run.
#[derive(Debug)]
pub struct Corpus {
    files: Vec<SourceFile>,
    load_errors: Vec<DepropError>,
}

impl Corpus {
    /// Discover and load every eligible file under `root`.
    ///
    /// Fails only if `root` is missing or not a directory; unreadable files
    /// are skipped and reported through [`Corpus::load_errors`].
    pub fn load(root: &Path, extension: &str, extra_excludes: &[String]) -> DepropResult<Self> {
        let meta = fs::metadata(root).map_err(|e| {
            DepropError::invalid_argument(format!(
                "corpus root {} is not readable: {}",
                root.display(),
                e
            ))
        })?;
        if !meta.is_dir() {
            return Err(DepropError::invalid_argument(format!(
                "corpus root {} is not a directory",
                root.display()
            )));
        }

        let (paths, mut load_errors) = gather_source_files(root, extension, extra_excludes);

        let loaded: Vec<DepropResult<SourceFile>> =
            paths.par_iter().map(|p| SourceFile::load(p)).collect();

        let mut files = Vec::with_capacity(loaded.len());
        for result in loaded {
            match result {
                Ok(file) => files.push(file),
                Err(e) => load_errors.push(e),
            }
        }

        Ok(Self {
            files,
            load_errors,
        })
    }

    pub fn file_mut(&mut self, index: usize) -> Option<&mut SourceFile> {
        self.files.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files that could not be read during [`Corpus::load`].
    pub fn load_errors(&self) -> &[DepropError] {
        &self.load_errors
    }

    /// Paths of files whose buffers differ from the loaded text.
    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter(|f| f.is_dirty())
            .map(|f| f.path().to_path_buf())
            .collect()
    }

    /// Write every changed buffer back to disk.
    ///
    /// A failed write does not stop the remaining files, and files already
    /// written stay written.
    pub fn commit(&mut self) -> CommitReport {
        let mut report = CommitReport::default();
        for file in &mut self.files {
            match file.commit() {
                Ok(true) => report.written.push(file.path().to_path_buf()),
                Ok(false) => {}
                Err(e) => report.errors.push(e),
            }
        }
        report
    }
}
