use crate::core::types::Type;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variance {
    Covariant,     // A <: B => F[A] <: F[B]
    Contravariant, // A <: B => F[B] <: F[A]
    Invariant,     // Related only when both directions hold
}

impl Variance {
    /// Check that the component `sub`, taken from the candidate subtype, is
    /// acceptable against `sup`, taken from the candidate supertype, in a
    /// position of this variance.
    pub fn relate(self, sub: &Type, sup: &Type) -> Result<bool> {
        match self {
            Self::Covariant => sub.is_subtype(sup),
            Self::Contravariant => sup.is_subtype(sub),
            Self::Invariant => Ok(sub.is_subtype(sup)? && sup.is_subtype(sub)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relate_directions() {
        let bottom = Type::bottom();
        let a = Type::nominal("A");

        assert!(Variance::Covariant.relate(&bottom, &a).unwrap());
        assert!(!Variance::Contravariant.relate(&bottom, &a).unwrap());
        assert!(Variance::Contravariant.relate(&a, &bottom).unwrap());
        assert!(Variance::Invariant.relate(&a, &Type::nominal("A")).unwrap());
        assert!(!Variance::Invariant.relate(&bottom, &a).unwrap());
    }

    #[test]
    fn test_relate_propagates_unsupported() {
        let union = Type::union(vec![Type::nominal("A")]);
        assert!(Variance::Covariant.relate(&union, &Type::nominal("A")).is_err());
        assert!(Variance::Contravariant.relate(&Type::nominal("A"), &union).is_err());
    }
}
