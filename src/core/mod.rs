//! Core type model
//!
//! The closed set of type variants and the provenance records attached to
//! them.

pub mod location;
pub mod types;

pub use location::{Frame, Location};
pub use types::{AttrMap, FusionType, MethodType, ObjectType, Type, TypeKind};
