//! deprop-core: textual deprecation marker propagation for source trees
//!
//! This library marks a named method as deprecated across a corpus of source
//! files, cascades the marker to the methods it calls, and promotes a class
//! once every member it declares is marked. It works purely on text; there is
//! no parsing or type resolution.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deprop_core::prelude::*;
//!
//! let result = Deprop::new("/path/to/project")
//!     .with_target("add")
//!     .run();
//!
//! println!("{}", result.details);
//! ```
//!
//! # Module Organization
//!
//! - [`corpus`]: File discovery and owned per-file line buffers
//! - [`declarations`]: Method and class declaration scanning
//! - [`scope`]: Lexical start and brace-counted scope end
//! - [`marker`]: The two-line marker and the "already marked" check
//! - [`rewrite`]: Bottom-up marker insertion
//! - [`cascade`]: Callee discovery and the visited-set worklist
//! - [`promote`]: Class promotion
//! - [`heuristics`]: The trait through which all pattern matching is reached
//! - [`engine`]: Fluent builder that sequences a run
//! - [`result`]: Run outcome and its accumulator
//! - [`error`]: Typed error handling

pub mod cascade;
pub mod config;
pub mod corpus;
pub mod declarations;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod logging;
pub mod marker;
pub mod prelude;
pub mod promote;
pub mod report;
pub mod result;
pub mod rewrite;
pub mod scope;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DepropError, DepropResult, IoResultExt};

// Builder API
pub use engine::Deprop;

// Results
pub use result::{PropagationResult, ResultAggregator};

// Configuration
pub use config::{
    load_config, AccessorRule, CascadeConfig, DepropConfig, MarkerConfig, ScopeConfig, ScopeMode,
    CONFIG_FILE, DEFAULT_EXTENSION, DEFAULT_MARKER_ANNOTATION, DEFAULT_MARKER_COMMENT,
};

// Logging
pub use logging::{init_logging, LogFormat};

// Corpus
pub use corpus::{gather_source_files, CommitReport, Corpus, SourceFile, EXCLUDED_DIRS};

// Scanning
pub use declarations::{
    find_method_declarations, find_type_declarations, member_declaration_name,
    type_declaration_name, DeclKind, DeclarationSite, Target, TargetMatcher,
};
pub use scope::{direct_member_lines, find_scope_end, lexical_start, DepthCounter};

// Marking
pub use marker::{Marker, LOOKBACK_WINDOW};
pub use rewrite::{apply_markers, insertion_line, mark_site};

// Cascade and promotion
pub use cascade::{find_call_sites, is_accessor_name, CallFilter, CascadeFrontier};
pub use promote::{ClassPromotion, PromotionOutcome, PromotionState};

// Heuristics seam
pub use heuristics::{SourceHeuristics, TextHeuristics};

// Reporting
pub use report::{print_json, print_plain, render_plain};

#[cfg(test)]
mod tests;
