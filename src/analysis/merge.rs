//! Structural merge engine
//!
//! Folds observations into an object's attribute record. An attribute only
//! ever narrows to the more specific of two comparable observations or forks
//! into an intersection of incompatible ones, so the record is a complete
//! history of observed shapes. Intersections are never collapsed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::location::Location;
use crate::core::types::{Type, TypeKind};
use crate::errors::{Result, TypeError};

/// What to do when the subtype check between the recorded and the observed
/// type has no defined rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Treat the pair as unrelated in that direction
    #[default]
    Incomparable,
    /// Return the error to the caller, leaving the record untouched
    Propagate,
}

/// Which branch of the attribute merge was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The attribute was new
    Inserted,
    /// The observation was more specific and replaced the recorded type
    Replaced,
    /// The recorded type was already at least as specific
    Kept,
    /// The two were incompatible; both now live in a fresh intersection
    Forked,
    /// The recorded intersection gained another member
    Widened,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEngine {
    policy: UnsupportedPolicy,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnsupportedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnsupportedPolicy {
        self.policy
    }

    /// Merge `observed` into `record.attrs[name]`
    pub fn add_attr(
        &self,
        record: &mut Type,
        name: impl Into<String>,
        observed: Type,
    ) -> Result<MergeOutcome> {
        let name = name.into();
        let record_desc = record.variant_name();
        let attrs = record.attrs_mut().ok_or_else(|| TypeError::NotARecord {
            found: record_desc.to_string(),
        })?;

        let Some(current) = attrs.get_mut(&name) else {
            debug!(attr = %name, observed = %observed, "attribute inserted");
            attrs.insert(name, observed);
            return Ok(MergeOutcome::Inserted);
        };

        if let TypeKind::Intersection(members) = &mut current.kind {
            append_member(members, &mut current.location, observed);
            debug!(attr = %name, merged = %current, "intersection widened");
            return Ok(MergeOutcome::Widened);
        }

        let outcome = if self.check(&observed, current)? {
            *current = observed;
            MergeOutcome::Replaced
        } else if self.check(current, &observed)? {
            MergeOutcome::Kept
        } else {
            let previous = std::mem::replace(current, Type::bottom());
            *current = Type::intersection(vec![previous, observed]);
            MergeOutcome::Forked
        };

        debug!(attr = %name, merged = %current, ?outcome, "attribute merged");
        Ok(outcome)
    }

    /// Append `member` to a union or intersection without simplification
    pub fn add_type(&self, composite: &mut Type, member: Type) -> Result<()> {
        let found = composite.variant_name();
        match &mut composite.kind {
            TypeKind::Union(members) | TypeKind::Intersection(members) => {
                append_member(members, &mut composite.location, member);
                Ok(())
            }
            _ => Err(TypeError::NotAComposite {
                found: found.to_string(),
            }),
        }
    }

    /// Append the frames of `location` to the node's own location
    pub fn add_loc(&self, node: &mut Type, location: &Location) {
        extend_location(&mut node.location, location);
    }

    /// Seed a method slot with a placeholder signature, overwriting whatever
    /// was recorded under `name`
    pub fn add_empty_method<I, K>(
        &self,
        record: &mut Type,
        name: impl Into<String>,
        n_params: usize,
        named_keys: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let found = record.variant_name();
        let attrs = record.attrs_mut().ok_or_else(|| TypeError::NotARecord {
            found: found.to_string(),
        })?;
        attrs.insert(name.into(), Type::empty_method(n_params, named_keys));
        Ok(())
    }

    fn check(&self, sub: &Type, sup: &Type) -> Result<bool> {
        match sub.is_subtype(sup) {
            Ok(related) => Ok(related),
            Err(err) if err.is_unsupported_comparison() => match self.policy {
                UnsupportedPolicy::Incomparable => {
                    debug!(error = %err, "treating unsupported comparison as unrelated");
                    Ok(false)
                }
                UnsupportedPolicy::Propagate => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

fn append_member(members: &mut Vec<Type>, location: &mut Option<Location>, member: Type) {
    if let Some(member_loc) = &member.location {
        extend_location(location, member_loc);
    }
    members.push(member);
}

fn extend_location(target: &mut Option<Location>, source: &Location) {
    match target {
        Some(existing) => existing.extend(source),
        None => *target = Some(source.clone()),
    }
}

impl Type {
    pub fn add_attr(&mut self, name: impl Into<String>, observed: Type) -> Result<MergeOutcome> {
        MergeEngine::default().add_attr(self, name, observed)
    }

    pub fn add_type(&mut self, member: Type) -> Result<()> {
        MergeEngine::default().add_type(self, member)
    }

    pub fn add_loc(&mut self, location: &Location) {
        MergeEngine::default().add_loc(self, location)
    }

    pub fn add_empty_method<I, K>(
        &mut self,
        name: impl Into<String>,
        n_params: usize,
        named_keys: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        MergeEngine::default().add_empty_method(self, name, n_params, named_keys)
    }
}
