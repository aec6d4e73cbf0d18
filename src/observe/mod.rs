//! Observation adapters
//!
//! The boundary between a host's interception layer and the type engine:
//! values are described by [`Describe`], observed through [`Tracked`] and, per
//! class, accumulated by [`ClassMonitor`].

pub mod monitor;
pub mod tracker;
pub mod value;

pub use monitor::{ClassMonitor, Invocation};
pub use tracker::{Arg, Tracked};
pub use value::{Describe, HostValue, NominalSource};
