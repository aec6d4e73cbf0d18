use std::collections::BTreeMap;
use std::fmt;

use crate::core::location::Location;

/// Attribute or named-parameter map. Keys are unique and iterate in
/// lexicographic order, which is the canonical order for printing.
pub type AttrMap = BTreeMap<String, Type>;

/// A type node: one variant of the closed type algebra plus optional
/// provenance. The location never takes part in equality.
#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Supertype of everything; placeholder for "not yet observed"
    Top,
    /// Subtype of everything; placeholder for "never returns / uninitialized"
    Bottom,

    /// Identified purely by name (primitive or class name)
    Nominal(String),

    /// Signature of one observed call
    Method(MethodType),

    /// Structural record of everything known about an object's members
    Object(ObjectType),

    /// "is one of"; member order is significant
    Union(Vec<Type>),
    /// "is all of"; records incompatible observations of one member
    Intersection(Vec<Type>),

    /// Nominal identity fused with a structural record, e.g. `A[foo: ...]`
    Fusion(FusionType),
}

#[derive(Debug, Clone)]
pub struct MethodType {
    pub params: Vec<Type>,
    pub named: AttrMap,
    pub ret: Box<Type>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusionType {
    pub name: String,
    pub attrs: AttrMap,
}

impl MethodType {
    pub fn new(params: Vec<Type>, named: AttrMap, ret: Type) -> Self {
        Self {
            params,
            named,
            ret: Box::new(ret),
        }
    }

    /// Placeholder signature for a method slot that has not been called yet:
    /// `Top` for every parameter and `Bottom` for the return.
    pub fn create_empty<I, K>(n_params: usize, named_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            params: (0..n_params).map(|_| Type::top()).collect(),
            named: named_keys
                .into_iter()
                .map(|k| (k.into(), Type::top()))
                .collect(),
            ret: Box::new(Type::bottom()),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

// Return types are not compared: two observations of the same call shape
// are the same signature.
impl PartialEq for MethodType {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.named == other.named
    }
}

impl Eq for MethodType {}

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn top() -> Self {
        Self::new(TypeKind::Top)
    }

    pub fn bottom() -> Self {
        Self::new(TypeKind::Bottom)
    }

    pub fn nominal(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Nominal(name.into()))
    }

    pub fn method<I, K>(params: Vec<Type>, named: I, ret: Type) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        let named = named.into_iter().map(|(k, t)| (k.into(), t)).collect();
        Self::new(TypeKind::Method(MethodType::new(params, named, ret)))
    }

    pub fn empty_method<I, K>(n_params: usize, named_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::new(TypeKind::Method(MethodType::create_empty(n_params, named_keys)))
    }

    pub fn object<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        let attrs = attrs.into_iter().map(|(k, t)| (k.into(), t)).collect();
        Self::new(TypeKind::Object(ObjectType { attrs }))
    }

    pub fn empty_object() -> Self {
        Self::new(TypeKind::Object(ObjectType::default()))
    }

    pub fn union(members: Vec<Type>) -> Self {
        Self::new(TypeKind::Union(members))
    }

    pub fn intersection(members: Vec<Type>) -> Self {
        Self::new(TypeKind::Intersection(members))
    }

    pub fn fusion<I, K>(name: impl Into<String>, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Type)>,
        K: Into<String>,
    {
        let attrs = attrs.into_iter().map(|(k, t)| (k.into(), t)).collect();
        Self::new(TypeKind::Fusion(FusionType {
            name: name.into(),
            attrs,
        }))
    }

    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn variant_name(&self) -> &'static str {
        match &self.kind {
            TypeKind::Top => "Top",
            TypeKind::Bottom => "Bottom",
            TypeKind::Nominal(_) => "Nominal",
            TypeKind::Method(_) => "Method",
            TypeKind::Object(_) => "Object",
            TypeKind::Union(_) => "Union",
            TypeKind::Intersection(_) => "Intersection",
            TypeKind::Fusion(_) => "Fusion",
        }
    }

    /// Name of a nominal or fusion type
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Nominal(name) => Some(name),
            TypeKind::Fusion(fusion) => Some(&fusion.name),
            _ => None,
        }
    }

    /// Attribute record of an object or fusion type
    pub fn attrs(&self) -> Option<&AttrMap> {
        match &self.kind {
            TypeKind::Object(obj) => Some(&obj.attrs),
            TypeKind::Fusion(fusion) => Some(&fusion.attrs),
            _ => None,
        }
    }

    pub fn attrs_mut(&mut self) -> Option<&mut AttrMap> {
        match &mut self.kind {
            TypeKind::Object(obj) => Some(&mut obj.attrs),
            TypeKind::Fusion(fusion) => Some(&mut fusion.attrs),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&Type> {
        self.attrs().and_then(|attrs| attrs.get(name))
    }

    /// Members of a union or intersection
    pub fn members(&self) -> Option<&[Type]> {
        match &self.kind {
            TypeKind::Union(members) | TypeKind::Intersection(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodType> {
        match &self.kind {
            TypeKind::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_) | TypeKind::Fusion(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TypeKind::Union(_) | TypeKind::Intersection(_))
    }
}

impl From<TypeKind> for Type {
    fn from(kind: TypeKind) -> Self {
        Self::new(kind)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Type {}

fn write_attrs(f: &mut fmt::Formatter<'_>, attrs: &AttrMap) -> fmt::Result {
    write!(
        f,
        "[{}]",
        attrs
            .iter()
            .map(|(name, ty)| format!("{}: {}", name, ty))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn write_members(f: &mut fmt::Formatter<'_>, members: &[Type], sep: &str) -> fmt::Result {
    write!(
        f,
        "{}",
        members
            .iter()
            .map(|t| format!("({})", t))
            .collect::<Vec<_>>()
            .join(sep)
    )
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|t| t.to_string())
            .chain(self.named.iter().map(|(k, t)| format!("{}:{}", k, t)))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({}) -> {}", params, self.ret)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Top => write!(f, "<<Top>>"),
            TypeKind::Bottom => write!(f, "<<Bottom>>"),
            TypeKind::Nominal(name) => write!(f, "{}", name),
            TypeKind::Method(method) => write!(f, "{}", method),
            TypeKind::Object(obj) => write_attrs(f, &obj.attrs),
            TypeKind::Union(members) => write_members(f, members, " or "),
            TypeKind::Intersection(members) => write_members(f, members, " and "),
            TypeKind::Fusion(fusion) => {
                write!(f, "{}", fusion.name)?;
                write_attrs(f, &fusion.attrs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::Frame;

    fn n(name: &str) -> Type {
        Type::nominal(name)
    }

    fn no_named() -> Vec<(String, Type)> {
        Vec::new()
    }

    #[test]
    fn test_top_bottom_display() {
        assert_eq!(Type::top().to_string(), "<<Top>>");
        assert_eq!(Type::bottom().to_string(), "<<Bottom>>");
    }

    #[test]
    fn test_union_display() {
        assert_eq!(Type::union(vec![n("A"), n("B")]).to_string(), "(A) or (B)");
        assert_eq!(
            Type::union(vec![n("A"), n("B"), n("C")]).to_string(),
            "(A) or (B) or (C)"
        );
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Type::method(vec![], no_named(), n("A")).to_string(), "() -> A");
        assert_eq!(Type::method(vec![n("A")], no_named(), n("B")).to_string(), "(A) -> B");
        assert_eq!(
            Type::method(vec![n("A"), n("B")], no_named(), n("C")).to_string(),
            "(A, B) -> C"
        );
        assert_eq!(
            Type::method(vec![n("A"), n("B")], [("k1", n("C"))], n("D")).to_string(),
            "(A, B, k1:C) -> D"
        );
        assert_eq!(
            Type::method(vec![n("A"), n("B")], [("k2", n("D")), ("k1", n("C"))], n("E"))
                .to_string(),
            "(A, B, k1:C, k2:D) -> E"
        );
        assert_eq!(Type::method(vec![], [("k", n("C"))], n("D")).to_string(), "(k:C) -> D");
    }

    #[test]
    fn test_empty_method() {
        assert_eq!(
            Type::empty_method(1, ["a", "b"]).to_string(),
            "(<<Top>>, a:<<Top>>, b:<<Top>>) -> <<Bottom>>"
        );
        let empty = MethodType::create_empty(0, Vec::<String>::new());
        assert_eq!(empty.arity(), 0);
        assert_eq!(*empty.ret, Type::bottom());
    }

    #[test]
    fn test_intersection_display() {
        let m1 = Type::method(vec![n("A"), n("B")], no_named(), n("C"));
        let m2 = Type::method(vec![n("D"), n("E")], no_named(), n("F"));
        assert_eq!(
            Type::intersection(vec![m1, m2]).to_string(),
            "((A, B) -> C) and ((D, E) -> F)"
        );
    }

    #[test]
    fn test_object_display_sorted() {
        assert_eq!(Type::empty_object().to_string(), "[]");
        let obj = Type::object([
            ("foo", Type::method(vec![n("int")], no_named(), n("int"))),
            ("bar", Type::method(vec![n("int"), n("int")], no_named(), n("int"))),
        ]);
        assert_eq!(obj.to_string(), "[bar: (int, int) -> int, foo: (int) -> int]");
    }

    #[test]
    fn test_fusion_display() {
        let m1 = Type::method(vec![n("A")], no_named(), n("B"));
        let m2 = Type::method(vec![n("C")], no_named(), n("D"));
        assert_eq!(Type::fusion("Foo", [("m", m1.clone())]).to_string(), "Foo[m: (A) -> B]");
        assert_eq!(
            Type::fusion("Foo", [("m2", m2), ("m1", m1)]).to_string(),
            "Foo[m1: (A) -> B, m2: (C) -> D]"
        );
        assert_eq!(Type::fusion("Foo", no_named()).to_string(), "Foo[]");
    }

    #[test]
    fn test_equality_by_variant() {
        assert_eq!(Type::top(), Type::top());
        assert_ne!(Type::top(), Type::bottom());
        assert_eq!(n("A"), n("A"));
        assert_ne!(n("A"), n("B"));
        assert_ne!(n("A"), Type::top());
        assert_ne!(Type::fusion("A", no_named()), n("A"));
        assert_ne!(Type::fusion("A", no_named()), Type::empty_object());
    }

    #[test]
    fn test_union_equality_is_ordered() {
        assert_eq!(Type::union(vec![]), Type::union(vec![]));
        assert_ne!(Type::union(vec![]), Type::union(vec![n("A")]));
        let ab = Type::union(vec![n("A"), n("B")]);
        assert_eq!(ab, Type::union(vec![n("A"), n("B")]));
        assert_ne!(ab, Type::union(vec![n("B"), n("A")]));
        assert_ne!(ab, Type::union(vec![n("A"), n("B"), n("A")]));
        assert_ne!(ab, Type::intersection(vec![n("A"), n("B")]));
    }

    #[test]
    fn test_method_equality() {
        let m = |params: Vec<Type>, c: &str, d: &str| {
            Type::method(params, [("c", n(c)), ("d", n(d))], n("E"))
        };
        let base = m(vec![n("A"), n("B")], "C", "D");
        assert_eq!(base, m(vec![n("A"), n("B")], "C", "D"));
        assert_ne!(base, m(vec![n("A"), n("B")], "C", "E"));
        assert_ne!(base, m(vec![n("A")], "C", "D"));
        assert_ne!(base, m(vec![n("A"), n("E")], "C", "D"));
        assert_ne!(
            base,
            Type::method(vec![n("A"), n("B")], [("c", n("C"))], n("E"))
        );
        assert_eq!(
            Type::method(vec![], no_named(), Type::bottom()),
            Type::method(vec![], no_named(), Type::bottom())
        );
    }

    #[test]
    fn test_method_equality_ignores_return() {
        assert_eq!(
            Type::method(vec![n("A")], no_named(), n("B")),
            Type::method(vec![n("A")], no_named(), n("C"))
        );
    }

    #[test]
    fn test_object_equality() {
        assert_eq!(Type::empty_object(), Type::empty_object());
        let m = Type::method(vec![n("A")], [("k1", n("B"))], n("C"));
        assert_ne!(Type::empty_object(), Type::object([("m", m.clone())]));
        assert_eq!(Type::object([("m1", m.clone())]), Type::object([("m1", m.clone())]));
        assert_ne!(Type::object([("m1", m.clone())]), Type::object([("m2", m)]));
    }

    #[test]
    fn test_equality_ignores_location() {
        let plain = Type::object([("x", n("int"))]);
        let located = Type::object([("x", n("int").with_location(Frame::new("a.py", 1, "f", "")))])
            .with_location(Frame::new("b.py", 2, "g", "x"));
        assert_eq!(plain, located);
    }

    #[test]
    fn test_accessors() {
        let mut obj = Type::object([("x", n("int"))]);
        assert!(obj.is_record());
        assert_eq!(obj.attr("x"), Some(&n("int")));
        obj.attrs_mut().unwrap().insert("y".into(), n("str"));
        assert_eq!(obj.to_string(), "[x: int, y: str]");
        assert_eq!(Type::fusion("F", no_named()).name(), Some("F"));
        assert_eq!(n("A").variant_name(), "Nominal");
        assert!(n("A").attrs().is_none());
        assert_eq!(Type::union(vec![n("A")]).members().map(|m| m.len()), Some(1));
    }
}
