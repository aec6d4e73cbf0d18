//! Class-level monitoring
//!
//! Each monitored class owns one accumulating object record. Every
//! instrumented method routes its invocations through an [`Invocation`],
//! which tracks the arguments for the duration of the call and folds the
//! resulting signature into the class record under the method's name.
//!
//! Records live in a `DashMap`, so calls on one class are serialized by the
//! entry lock while different classes proceed independently.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::analysis::merge::{MergeEngine, MergeOutcome};
use crate::core::location::{Frame, Location};
use crate::core::types::{AttrMap, Type};
use crate::errors::Result;
use crate::observe::tracker::Tracked;
use crate::observe::value::HostValue;

#[derive(Debug, Default)]
pub struct ClassMonitor {
    classes: DashMap<String, Type>,
    engine: MergeEngine,
}

impl ClassMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: MergeEngine) -> Self {
        Self {
            classes: DashMap::new(),
            engine,
        }
    }

    /// Create the class's record. Returns false if it was already monitored,
    /// in which case the existing record is left alone.
    pub fn register(&self, class: &str) -> bool {
        match self.classes.entry(class.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Type::empty_object());
                info!(class, "class monitored");
                true
            }
        }
    }

    pub fn is_monitored(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Snapshot of the record accumulated for `class`
    pub fn record_of(&self, class: &str) -> Option<Type> {
        self.classes.get(class).map(|r| r.value().clone())
    }

    /// Monitored class names, sorted
    pub fn classes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Start observing one call of `class.method`. Arguments are tracked
    /// so that member accesses on them during the call shape the signature.
    #[track_caller]
    pub fn begin(
        &self,
        class: &str,
        method: &str,
        args: Vec<HostValue>,
        kwargs: Vec<(String, HostValue)>,
    ) -> Invocation<'_> {
        debug!(class, method, "method invoked");
        Invocation {
            monitor: self,
            class: class.to_string(),
            method: method.to_string(),
            args: args.into_iter().map(|v| self.track(v)).collect(),
            kwargs: kwargs.into_iter().map(|(k, v)| (k, self.track(v))).collect(),
            frame: Frame::caller(),
        }
    }

    /// Observe a call whose arguments were not inspected during the call
    #[track_caller]
    pub fn record_invocation(
        &self,
        class: &str,
        method: &str,
        args: Vec<HostValue>,
        kwargs: Vec<(String, HostValue)>,
        ret: &HostValue,
    ) -> Result<MergeOutcome> {
        self.begin(class, method, args, kwargs).finish(ret)
    }

    fn track(&self, value: HostValue) -> Tracked {
        Tracked::new(value).with_engine(self.engine)
    }

    fn merge(&self, class: &str, method: &str, observed: Type) -> Result<MergeOutcome> {
        let mut record = self
            .classes
            .entry(class.to_string())
            .or_insert_with(Type::empty_object);
        self.engine.add_attr(&mut record, method, observed)
    }
}

/// One in-flight method call on a monitored class
#[derive(Debug)]
pub struct Invocation<'m> {
    monitor: &'m ClassMonitor,
    class: String,
    method: String,
    args: Vec<Tracked>,
    kwargs: Vec<(String, Tracked)>,
    frame: Frame,
}

impl Invocation<'_> {
    pub fn arg(&self, index: usize) -> Option<&Tracked> {
        self.args.get(index)
    }

    pub fn kwarg(&self, name: &str) -> Option<&Tracked> {
        self.kwargs.iter().find(|(k, _)| k == name).map(|(_, t)| t)
    }

    /// Close the call with its return value and merge the observed signature
    pub fn finish(self, ret: &HostValue) -> Result<MergeOutcome> {
        let location = Location::from_frame(self.frame);
        let params = self.args.iter().map(Tracked::record).collect();
        let named: AttrMap = self
            .kwargs
            .iter()
            .map(|(k, t)| (k.clone(), t.record()))
            .collect();
        let ret = Type::nominal(ret.class_name());
        let observed = Type::method(params, named, ret).with_location(location);

        let outcome = self.monitor.merge(&self.class, &self.method, observed)?;
        debug!(class = %self.class, method = %self.method, ?outcome, "invocation recorded");
        Ok(outcome)
    }
}
