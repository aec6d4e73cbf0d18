//! Type analysis
//!
//! The structural subtype relation, the variance helper built on it, and the
//! merge engine that folds runtime observations into records.

pub mod merge;
pub mod subtype;
pub mod variance;

pub use merge::{MergeEngine, MergeOutcome, UnsupportedPolicy};
pub use subtype::is_subtype;
pub use variance::Variance;
