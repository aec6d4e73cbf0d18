//! Runtime structural type inference
//!
//! Observations of live values (attribute reads and writes, method calls)
//! are folded into structural types: nominal names, method signatures,
//! attribute records and their unions, intersections and fusions. Records
//! only ever narrow to the more specific observation or fork into an
//! intersection of incompatible ones.

// Core modules
pub mod analysis;
pub mod core;
pub mod errors;
pub mod infrastructure;
pub mod observe;

// Re-export commonly used items
pub use analysis::{is_subtype, MergeEngine, MergeOutcome, UnsupportedPolicy, Variance};
pub use core::{AttrMap, Frame, FusionType, Location, MethodType, ObjectType, Type, TypeKind};
pub use errors::{ConfigError, Result, TypeError};
pub use infrastructure::{init_logging, Config, LogConfig};
pub use observe::{Arg, ClassMonitor, Describe, HostValue, Invocation, NominalSource, Tracked};
