//! Property tests for the subtype relation and the merge engine.
//!
//! Generated types are "observed" shapes: nominals, methods and records
//! nested to a bounded depth, plus the Top and Bottom placeholders. Unions
//! and intersections are left out since the relation rejects them on the
//! left.

use dyty::analysis::MergeOutcome;
use dyty::core::{Frame, Location, Type, TypeKind};
use proptest::prelude::*;

const NAMES: &[&str] = &["int", "str", "bool", "float", "NoneType", "A", "B"];
const KEYS: &[&str] = &["a", "b", "x", "y", "name", "value"];

fn arb_key() -> impl Strategy<Value = String> {
    prop::sample::select(KEYS).prop_map(str::to_string)
}

fn arb_nominal() -> impl Strategy<Value = Type> {
    prop::sample::select(NAMES).prop_map(|name| Type::nominal(name))
}

fn arb_observed(depth: u32) -> BoxedStrategy<Type> {
    let leaf = prop_oneof![
        6 => arb_nominal(),
        1 => Just(Type::top()),
        1 => Just(Type::bottom()),
    ];
    if depth == 0 {
        return leaf.boxed();
    }

    let inner = arb_observed(depth - 1);
    prop_oneof![
        3 => leaf,
        1 => (
            prop::collection::vec(inner.clone(), 0..3),
            prop::collection::btree_map(arb_key(), inner.clone(), 0..2),
            inner.clone(),
        )
            .prop_map(|(params, named, ret)| Type::method(params, named, ret)),
        1 => prop::collection::btree_map(arb_key(), inner, 0..4).prop_map(|attrs| Type::object(attrs)),
    ]
    .boxed()
}

fn arb_method() -> impl Strategy<Value = Type> {
    (
        prop::collection::vec(arb_observed(1), 0..4),
        prop::collection::btree_map(arb_key(), arb_observed(1), 0..3),
        arb_observed(1),
    )
        .prop_map(|(params, named, ret)| Type::method(params, named, ret))
}

fn arb_location() -> impl Strategy<Value = Location> {
    prop::collection::vec(
        ("[a-z]{1,8}\\.py", 1u32..500, "[a-z_]{1,10}", "[a-z()., ]{0,20}")
            .prop_map(|(file, line, function, code)| Frame::new(file, line, function, code)),
        1..4,
    )
    .prop_map(|frames| {
        let mut location = Location::new();
        for frame in frames {
            location.push_frame(frame);
        }
        location
    })
}

proptest! {
    /// Every observed shape is a subtype of itself.
    #[test]
    fn subtype_reflexive(ty in arb_observed(3)) {
        prop_assert!(ty.is_subtype(&ty).unwrap());
    }

    /// Bottom sits below everything, composites included.
    #[test]
    fn bottom_below_everything(ty in arb_observed(3), other in arb_observed(1)) {
        prop_assert!(Type::bottom().is_subtype(&ty).unwrap());
        let union = Type::union(vec![ty, other]);
        prop_assert!(Type::bottom().is_subtype(&union).unwrap());
    }

    /// Only Top itself (and Bottom) is below Top.
    #[test]
    fn nothing_else_below_top(ty in arb_observed(3)) {
        prop_assume!(!matches!(ty.kind, TypeKind::Top | TypeKind::Bottom));
        prop_assert!(!ty.is_subtype(&Type::top()).unwrap());
    }

    /// Top is below nothing but Top.
    #[test]
    fn top_only_below_top(ty in arb_observed(3)) {
        let expected = matches!(ty.kind, TypeKind::Top);
        prop_assert_eq!(Type::top().is_subtype(&ty).unwrap(), expected);
    }

    #[test]
    fn equality_ignores_location(ty in arb_observed(3), a in arb_location(), b in arb_location()) {
        let left = ty.clone().with_location(a);
        let mut right = ty.clone();
        right.add_loc(&b);
        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &ty);
        prop_assert_eq!(left.to_string(), right.to_string());
    }

    /// Seeing the same method twice leaves the record as it was.
    #[test]
    fn add_attr_idempotent(method in arb_method()) {
        let mut record = Type::empty_object();
        record.add_attr("m", method.clone()).unwrap();
        let once = record.clone();

        let outcome = record.add_attr("m", method).unwrap();
        prop_assert_ne!(outcome, MergeOutcome::Forked);
        prop_assert_eq!(&record, &once);
        prop_assert_eq!(record.to_string(), once.to_string());
    }

    /// The merged attribute is always one of: the observation, the previous
    /// value, or an intersection ending in the observation.
    #[test]
    fn add_attr_keeps_history(seen in prop::collection::vec(arb_method(), 1..6)) {
        let mut record = Type::empty_object();
        for observed in seen {
            let previous = record.attr("m").cloned();
            let outcome = record.add_attr("m", observed.clone()).unwrap();
            let current = record.attr("m").cloned().unwrap();

            match outcome {
                MergeOutcome::Inserted | MergeOutcome::Replaced => prop_assert_eq!(current, observed),
                MergeOutcome::Kept => prop_assert_eq!(Some(current), previous),
                MergeOutcome::Forked | MergeOutcome::Widened => {
                    let members = current.members().unwrap_or_default();
                    prop_assert_eq!(members.last(), Some(&observed));
                }
            }
        }
    }

    /// Record printing depends only on the attribute set.
    #[test]
    fn printing_canonical(attrs in prop::collection::btree_map(arb_key(), arb_observed(2), 0..6)) {
        let pairs: Vec<(String, Type)> = attrs.into_iter().collect();
        let forward = Type::object(pairs.clone());
        let backward = Type::object(pairs.into_iter().rev());
        prop_assert_eq!(forward.to_string(), backward.to_string());
        prop_assert_eq!(forward, backward);
    }
}
