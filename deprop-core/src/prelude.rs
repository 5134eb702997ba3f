//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deprop_core::prelude::*;
//! ```

// Builder API and its outcome
pub use crate::engine::Deprop;
pub use crate::result::PropagationResult;

// Errors
pub use crate::error::{DepropError, DepropResult};

// Configuration
pub use crate::config::{load_config, DepropConfig, ScopeMode};

// Extension point
pub use crate::heuristics::{SourceHeuristics, TextHeuristics};
pub use crate::declarations::Target;
pub use crate::marker::Marker;

// Reporting
pub use crate::report::{print_json, print_plain};
