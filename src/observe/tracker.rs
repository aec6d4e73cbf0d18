//! Per-value observation
//!
//! A [`Tracked`] value owns a structural record that grows as the host
//! reports attribute reads, attribute writes and method calls on it. Clones
//! share both the value and the record, so a tracked value passed as an
//! argument contributes its current shape to the callee's signature.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::analysis::merge::{MergeEngine, MergeOutcome};
use crate::core::location::{Frame, Location};
use crate::core::types::{AttrMap, Type};
use crate::errors::Result;
use crate::observe::value::{Describe, HostValue};

/// An argument as seen at a call site
#[derive(Debug, Clone)]
pub enum Arg {
    /// A plain value, typed by its class
    Value(HostValue),
    /// A value already under observation, typed by its record
    Tracked(Tracked),
}

impl Arg {
    fn observed_type(&self, location: &Location) -> Type {
        match self {
            Arg::Value(value) => Type::nominal(value.class_name()).with_location(location.clone()),
            Arg::Tracked(tracked) => tracked.record(),
        }
    }
}

impl From<HostValue> for Arg {
    fn from(value: HostValue) -> Self {
        Arg::Value(value)
    }
}

impl From<Tracked> for Arg {
    fn from(tracked: Tracked) -> Self {
        Arg::Tracked(tracked)
    }
}

impl From<&Tracked> for Arg {
    fn from(tracked: &Tracked) -> Self {
        Arg::Tracked(tracked.clone())
    }
}

/// The wrapped value and what has been observed about it, kept under one
/// lock so every handle sees the same state.
#[derive(Debug)]
struct Observed {
    value: HostValue,
    record: Type,
}

#[derive(Debug, Clone)]
pub struct Tracked {
    shared: Arc<Mutex<Observed>>,
    engine: MergeEngine,
}

impl Tracked {
    pub fn new(value: HostValue) -> Self {
        let record = value.describe();
        Self {
            shared: Arc::new(Mutex::new(Observed { value, record })),
            engine: MergeEngine::default(),
        }
    }

    /// Start a fresh observation of the same underlying value
    pub fn rewrap(&self) -> Self {
        Self::new(self.value()).with_engine(self.engine)
    }

    pub fn with_engine(mut self, engine: MergeEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Snapshot of the wrapped value, including writes made through any handle
    pub fn value(&self) -> HostValue {
        self.shared.lock().value.clone()
    }

    /// Snapshot of the record accumulated so far
    pub fn record(&self) -> Type {
        self.shared.lock().record.clone()
    }

    pub fn shares_record_with(&self, other: &Tracked) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Observe a field read. Callables are returned without being recorded;
    /// their shape is recorded when they are called.
    pub fn read_attr(&self, name: &str, frame: Frame) -> Result<Option<HostValue>> {
        let mut observed = self.shared.lock();
        let Some(value) = observed.value.field(name).cloned() else {
            return Ok(None);
        };
        if value.is_callable() {
            return Ok(Some(value));
        }

        let ty = Type::nominal(value.class_name()).with_location(frame);
        self.merge(&mut observed, name, ty)?;
        Ok(Some(value))
    }

    /// Observe a field write; the value is stored on the wrapped instance
    pub fn write_attr(&self, name: &str, value: HostValue) -> Result<MergeOutcome> {
        let mut observed = self.shared.lock();
        let ty = Type::nominal(value.class_name());
        if let HostValue::Instance { fields, .. } = &mut observed.value {
            fields.insert(name.to_string(), value);
        }
        self.merge(&mut observed, name, ty)
    }

    /// Observe one call of method `name` with its arguments and result
    pub fn record_call(
        &self,
        name: &str,
        args: &[Arg],
        kwargs: &[(&str, Arg)],
        ret: &HostValue,
        frame: Frame,
    ) -> Result<MergeOutcome> {
        let location = Location::from_frame(frame);
        // Argument records are snapshotted before taking our own lock, since
        // a value may be passed to its own method.
        let params = args.iter().map(|a| a.observed_type(&location)).collect();
        let named: AttrMap = kwargs
            .iter()
            .map(|(k, a)| (k.to_string(), a.observed_type(&location)))
            .collect();
        let ret = Type::nominal(ret.class_name()).with_location(location.clone());

        let ty = Type::method(params, named, ret).with_location(location);
        self.merge(&mut self.shared.lock(), name, ty)
    }

    fn merge(&self, observed: &mut Observed, name: &str, ty: Type) -> Result<MergeOutcome> {
        let outcome = self.engine.add_attr(&mut observed.record, name, ty)?;
        debug!(class = observed.value.class_name(), attr = name, ?outcome, "observation recorded");
        Ok(outcome)
    }
}

impl From<HostValue> for Tracked {
    fn from(value: HostValue) -> Self {
        Self::new(value)
    }
}
