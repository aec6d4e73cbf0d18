//! Subtyping relation over the type algebra
//!
//! `is_subtype(l, r)` is total except for the pairs listed below, which fail
//! with [`TypeError::UnsupportedComparison`] instead of guessing:
//!
//! - a union or intersection on the left
//! - an object or fusion on the left against a nominal, union or
//!   intersection on the right
//!
//! Location metadata is never consulted.

use tracing::trace;

use crate::analysis::variance::Variance;
use crate::core::types::{AttrMap, MethodType, Type, TypeKind};
use crate::errors::{Result, TypeError};

pub fn is_subtype(l: &Type, r: &Type) -> Result<bool> {
    let result = match &l.kind {
        // Only Top itself, not a universal rule.
        TypeKind::Top => Ok(matches!(r.kind, TypeKind::Top)),
        TypeKind::Bottom => Ok(true),
        // A fusion carries a nominal identity, so its name alone decides.
        TypeKind::Nominal(name) => Ok(match &r.kind {
            TypeKind::Nominal(other) => other == name,
            TypeKind::Fusion(fusion) => fusion.name == *name,
            _ => false,
        }),
        TypeKind::Method(method) => match &r.kind {
            TypeKind::Method(other) => is_method_subtype(method, other),
            _ => Ok(false),
        },
        TypeKind::Object(obj) => is_record_subtype(l, &obj.attrs, r),
        TypeKind::Fusion(fusion) => is_record_subtype(l, &fusion.attrs, r),
        TypeKind::Union(_) | TypeKind::Intersection(_) => Err(unsupported(l, r)),
    };

    trace!(left = %l, right = %r, ?result, "subtype check");
    result
}

/// Parameters are contravariant, the return is covariant. `l` must accept at
/// least the positional parameters of `r` and every named parameter of `r`.
fn is_method_subtype(l: &MethodType, r: &MethodType) -> Result<bool> {
    if l.params.len() < r.params.len() {
        return Ok(false);
    }

    for (l_param, r_param) in l.params.iter().zip(&r.params) {
        if !Variance::Contravariant.relate(l_param, r_param)? {
            return Ok(false);
        }
    }

    for (name, r_param) in &r.named {
        match l.named.get(name) {
            Some(l_param) => {
                if !Variance::Contravariant.relate(l_param, r_param)? {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }

    Variance::Covariant.relate(&l.ret, &r.ret)
}

/// Width and depth subtyping: `l` knows at least every member `r` knows,
/// each at a subtype.
fn is_record_subtype(l: &Type, l_attrs: &AttrMap, r: &Type) -> Result<bool> {
    let r_attrs = match &r.kind {
        TypeKind::Object(obj) => &obj.attrs,
        TypeKind::Fusion(fusion) => &fusion.attrs,
        TypeKind::Nominal(_) | TypeKind::Union(_) | TypeKind::Intersection(_) => {
            return Err(unsupported(l, r));
        }
        TypeKind::Top | TypeKind::Bottom | TypeKind::Method(_) => return Ok(false),
    };

    if l_attrs.len() < r_attrs.len() {
        return Ok(false);
    }

    for (name, r_attr) in r_attrs {
        match l_attrs.get(name) {
            Some(l_attr) => {
                if !Variance::Covariant.relate(l_attr, r_attr)? {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }

    Ok(true)
}

fn unsupported(l: &Type, r: &Type) -> TypeError {
    TypeError::unsupported(
        format!("{} {}", l.variant_name(), l),
        format!("{} {}", r.variant_name(), r),
    )
}

impl Type {
    pub fn is_subtype(&self, other: &Type) -> Result<bool> {
        is_subtype(self, other)
    }
}
