//! Builder API that sequences one propagation run.
//!
//! ```rust,ignore
//! use deprop_core::prelude::*;
//!
//! let result = Deprop::new("/path/to/project")
//!     .with_target("add")
//!     .with_signature(Some("int add(int a, int b)".to_string()))
//!     .dry_run(true)
//!     .run();
//!
//! println!("methods deprecated: {}", result.methods_marked);
//! ```
//!
//! A run goes: load corpus → mark the target → cascade to callees until the
//! worklist is empty → promote classes → commit changed files → result.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cascade::CascadeFrontier;
use crate::config::{load_config, DepropConfig, ScopeMode, CONFIG_FILE};
use crate::corpus::Corpus;
use crate::declarations::{DeclKind, DeclarationSite, Target};
use crate::error::{DepropError, DepropResult};
use crate::heuristics::{SourceHeuristics, TextHeuristics};
use crate::marker::Marker;
use crate::promote::{ClassPromotion, PromotionState};
use crate::result::{PropagationResult, ResultAggregator};
use crate::rewrite::apply_markers;

/// A method marked during this run, with the body its callees are read from.
#[derive(Debug, Clone)]
struct MarkedMethod {
    name: String,
    body: String,
}

/// Builder for configuring and running deprecation propagation.
///
/// Explicit builder settings override values from `deprop.toml`.
pub struct Deprop {
    /// Corpus root directory
    root: PathBuf,

    /// Name of the method to deprecate
    target: Option<String>,

    /// Exact signature narrowing the target
    signature: Option<String>,

    /// Configuration used instead of the root's deprop.toml
    config: Option<DepropConfig>,

    /// Override for `[cascade] enabled`
    cascade: Option<bool>,

    /// Override for `[scope] mode`
    scope_mode: Option<ScopeMode>,

    /// Compute everything, write nothing
    dry_run: bool,

    /// Replacement for the default text heuristics
    heuristics: Option<Box<dyn SourceHeuristics>>,
}

impl std::fmt::Debug for Deprop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deprop")
            .field("root", &self.root)
            .field("target", &self.target)
            .field("signature", &self.signature)
            .field("cascade", &self.cascade)
            .field("scope_mode", &self.scope_mode)
            .field("dry_run", &self.dry_run)
            .field("custom_heuristics", &self.heuristics.is_some())
            .finish()
    }
}

impl Deprop {
    /// Create a new run builder for the given corpus root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target: None,
            signature: None,
            config: None,
            cascade: None,
            scope_mode: None,
            dry_run: false,
            heuristics: None,
        }
    }

    /// Method name to deprecate.
    pub fn with_target(mut self, name: impl Into<String>) -> Self {
        self.target = Some(name.into());
        self
    }

    /// Narrow the target to one signature. Blank signatures are ignored.
    pub fn with_signature(mut self, signature: Option<String>) -> Self {
        self.signature = signature;
        self
    }

    /// Use this configuration instead of reading deprop.toml.
    pub fn with_config(mut self, config: DepropConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Enable or disable callee propagation.
    pub fn with_cascade(mut self, enabled: bool) -> Self {
        self.cascade = Some(enabled);
        self
    }

    /// Choose how braces are counted when bounding bodies.
    pub fn with_scope_mode(mut self, mode: ScopeMode) -> Self {
        self.scope_mode = Some(mode);
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Replace the default line-oriented heuristics.
    pub fn with_heuristics(mut self, heuristics: Box<dyn SourceHeuristics>) -> Self {
        self.heuristics = Some(heuristics);
        self
    }

    /// Run propagation, folding any error into a failed result.
    pub fn run(&self) -> PropagationResult {
        self.try_run().unwrap_or_else(|e| {
            warn!(root = %self.root.display(), error = %e, "propagation failed");
            PropagationResult::failure(e.to_string())
        })
    }

    /// Run class promotion alone, folding any error into a failed result.
    pub fn promote_classes(&self) -> PropagationResult {
        self.try_promote_classes().unwrap_or_else(|e| {
            warn!(root = %self.root.display(), error = %e, "class promotion failed");
            PropagationResult::failure(e.to_string())
        })
    }

    /// Run propagation for the configured target.
    ///
    /// Errors only for invalid input (empty target, bad root, bad config).
    /// Per-file I/O failures are recorded in the result instead.
    pub fn try_run(&self) -> DepropResult<PropagationResult> {
        let name = self.target.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(DepropError::invalid_argument("method name must not be empty"));
        }
        let target = Target::with_signature(name, self.signature.clone());

        let config = self.resolve_config()?;
        let mut corpus = Corpus::load(&self.root, config.extension(), &config.exclude)?;
        let marker = Marker::from_config(&config);

        let default_heuristics;
        let heuristics: &dyn SourceHeuristics = match &self.heuristics {
            Some(h) => h.as_ref(),
            None => {
                default_heuristics = TextHeuristics::from_config(&config);
                &default_heuristics
            }
        };

        let mut agg = ResultAggregator::new();
        agg.log(format!("Starting deprecation process for method: {}", target.name));
        if let Some(sig) = &target.signature {
            agg.log(format!("Method signature: {}", sig));
        }
        agg.log(format!("Project path: {}", self.root.display()));
        agg.log(format!("Found {} source file(s)", corpus.len()));
        self.start(&corpus, &mut agg);

        info!(
            root = %self.root.display(),
            target = %target.name,
            files = corpus.len(),
            cascade = config.cascade.enabled,
            "starting propagation"
        );

        let mut marked = mark_target(&mut corpus, heuristics, &marker, &target, &mut agg);

        if config.cascade.enabled {
            let mut frontier = CascadeFrontier::new();
            frontier.mark_visited(&target.name);
            loop {
                for method in marked.drain(..) {
                    for callee in heuristics.find_call_sites(&method.body) {
                        if frontier.push(&callee) {
                            agg.record_cascade(&method.name, &callee);
                        }
                    }
                }
                let Some(next) = frontier.pop() else {
                    break;
                };
                marked = mark_target(&mut corpus, heuristics, &marker, &Target::named(next), &mut agg);
            }
            debug!(visited = frontier.visited_count(), "cascade settled");
        }

        agg.blank();
        agg.log("Checking for classes to deprecate...");
        promote_all(&mut corpus, heuristics, &marker, &mut agg);

        Ok(self.finish(corpus, agg))
    }

    /// Promote every class whose members are all marked, without a target.
    pub fn try_promote_classes(&self) -> DepropResult<PropagationResult> {
        let config = self.resolve_config()?;
        let mut corpus = Corpus::load(&self.root, config.extension(), &config.exclude)?;
        let marker = Marker::from_config(&config);

        let default_heuristics;
        let heuristics: &dyn SourceHeuristics = match &self.heuristics {
            Some(h) => h.as_ref(),
            None => {
                default_heuristics = TextHeuristics::from_config(&config);
                &default_heuristics
            }
        };

        let mut agg = ResultAggregator::new();
        agg.log(format!("Checking for classes to deprecate in: {}", self.root.display()));
        agg.log(format!("Found {} source file(s)", corpus.len()));
        self.start(&corpus, &mut agg);

        promote_all(&mut corpus, heuristics, &marker, &mut agg);

        Ok(self.finish(corpus, agg))
    }

    fn resolve_config(&self) -> DepropResult<DepropConfig> {
        let mut config = match &self.config {
            Some(cfg) => cfg.clone(),
            None => load_config(&self.root)
                .map_err(|e| DepropError::config(self.root.join(CONFIG_FILE), format!("{:#}", e)))?
                .unwrap_or_default(),
        };
        if let Some(enabled) = self.cascade {
            config.cascade.enabled = enabled;
        }
        if let Some(mode) = self.scope_mode {
            config.scope.mode = mode;
        }
        Ok(config)
    }

    fn start(&self, corpus: &Corpus, agg: &mut ResultAggregator) {
        if self.dry_run {
            agg.log("Dry run: no files will be written");
        }
        if corpus.is_empty() {
            warn!(root = %self.root.display(), "no source files found");
        }
        for err in corpus.load_errors() {
            warn!(path = ?err.path(), error = %err, "skipping unreadable file");
            agg.record_error(err);
        }
    }

    /// Write changed buffers (unless dry run) and freeze the result.
    fn finish(&self, mut corpus: Corpus, mut agg: ResultAggregator) -> PropagationResult {
        agg.blank();
        if self.dry_run {
            for path in corpus.dirty_paths() {
                agg.record_file_pending(&path);
            }
        } else {
            let report = corpus.commit();
            for path in &report.written {
                agg.record_file_updated(path);
            }
            for err in &report.errors {
                warn!(path = ?err.path(), error = %err, "failed to write file");
                agg.record_error(err);
            }
        }

        let result = agg.finish();
        info!(
            success = result.success,
            files_updated = result.files_updated,
            methods = result.methods_marked,
            classes = result.types_promoted,
            dry_run = self.dry_run,
            "propagation finished"
        );
        result
    }
}

/// Mark every unmarked declaration of `target` across the corpus.
///
/// Sites, bodies and scopes are read from each file before its first
/// insertion; insertions then go bottom-up.
fn mark_target(
    corpus: &mut Corpus,
    heuristics: &dyn SourceHeuristics,
    marker: &Marker,
    target: &Target,
    agg: &mut ResultAggregator,
) -> Vec<MarkedMethod> {
    let mut marked = Vec::new();

    for index in 0..corpus.len() {
        let Some(file) = corpus.file_mut(index) else {
            continue;
        };
        let decls = heuristics.find_declarations(file.lines(), target, marker);
        if decls.is_empty() {
            continue;
        }
        agg.record_occurrences(file.path(), decls.len());

        let lines = file.lines();
        let candidates: Vec<(DeclarationSite, String)> = decls
            .into_iter()
            .map(|decl_line| {
                let site = DeclarationSite {
                    kind: DeclKind::Method,
                    name: target.name.clone(),
                    file: index,
                    decl_line,
                    lexical_start: heuristics.lexical_start(lines, decl_line),
                    end_line: heuristics.find_scope_end(lines, decl_line),
                };
                let body = site.body_text(lines);
                (site, body)
            })
            .collect();

        let sites = candidates.iter().map(|(site, _)| site.clone()).collect();
        let applied = apply_markers(file, sites, marker);

        // Applied bottom-up; report top-down.
        for site in applied.iter().rev() {
            agg.record_method(&site.name, file.path(), site.decl_line);
            if let Some((_, body)) = candidates.iter().find(|(s, _)| s.decl_line == site.decl_line) {
                marked.push(MarkedMethod {
                    name: site.name.clone(),
                    body: body.clone(),
                });
            }
        }
    }

    debug!(target = %target.name, marked = marked.len(), "target resolved");
    marked
}

fn promote_all(
    corpus: &mut Corpus,
    heuristics: &dyn SourceHeuristics,
    marker: &Marker,
    agg: &mut ResultAggregator,
) {
    let promotion = ClassPromotion::new(heuristics, marker);
    for index in 0..corpus.len() {
        let Some(file) = corpus.file_mut(index) else {
            continue;
        };
        let outcomes = promotion.promote_file(file, index);
        for outcome in outcomes
            .iter()
            .filter(|o| o.state == PromotionState::Promoted)
        {
            agg.record_promotion(&outcome.site.name, file.path());
        }
    }
}
