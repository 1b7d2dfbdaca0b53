use serde::{Deserialize, Serialize};

use crate::capstone::Capstone;
use crate::classical::Classical;
use crate::composite::Composite;
use crate::elementary::Elementary;
use crate::prismatic::Prismatic;

/// The combinatorial identity of a CRF solid.
///
/// Equality is structural: two specs are the same solid description iff all
/// their fields match. Degenerate entries (a square bipyramid, say) compare
/// different from their canonical identity (the octahedron) until
/// [`PolyhedronSpecs::canonicalize`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolyhedronSpecs {
    Classical(Classical),
    Prismatic(Prismatic),
    Capstone(Capstone),
    Composite(Composite),
    Elementary(Elementary),
}

impl PolyhedronSpecs {
    /// The deterministic reference-geometry lookup key.
    pub fn canonical_name(&self) -> String {
        match self {
            PolyhedronSpecs::Classical(c) => c.canonical_name(),
            PolyhedronSpecs::Prismatic(p) => p.canonical_name(),
            PolyhedronSpecs::Capstone(c) => c.canonical_name(),
            PolyhedronSpecs::Composite(c) => c.canonical_name(),
            PolyhedronSpecs::Elementary(e) => e.canonical_name(),
        }
    }

    /// Fold a degenerate spec onto the canonical spec of the same solid.
    /// Idempotent; non-degenerate specs return themselves.
    pub fn canonicalize(&self) -> PolyhedronSpecs {
        let folded = match self {
            PolyhedronSpecs::Classical(c) => c.fold(),
            PolyhedronSpecs::Prismatic(p) => p.fold(),
            PolyhedronSpecs::Capstone(c) => c.fold(),
            PolyhedronSpecs::Composite(c) => c.fold(),
            PolyhedronSpecs::Elementary(_) => None,
        };
        match folded {
            // One fold can land on another degenerate entry.
            Some(next) => next.canonicalize(),
            None => *self,
        }
    }

    pub fn is_chiral(&self) -> bool {
        match self {
            PolyhedronSpecs::Classical(c) => c.is_chiral(),
            PolyhedronSpecs::Capstone(c) => c.is_chiral(),
            _ => false,
        }
    }

    pub fn is_classical(&self) -> bool {
        matches!(self, PolyhedronSpecs::Classical(_))
    }

    pub fn as_classical(&self) -> Option<&Classical> {
        match self {
            PolyhedronSpecs::Classical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_capstone(&self) -> Option<&Capstone> {
        match self {
            PolyhedronSpecs::Capstone(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_prismatic(&self) -> Option<&Prismatic> {
        match self {
            PolyhedronSpecs::Prismatic(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            PolyhedronSpecs::Composite(c) => Some(c),
            _ => None,
        }
    }

    /// Every spec in the taxonomy, raw (folds included).
    pub fn universe() -> Vec<PolyhedronSpecs> {
        let mut out = Vec::new();
        out.extend(Classical::universe().into_iter().map(PolyhedronSpecs::Classical));
        out.extend(Prismatic::universe().into_iter().map(PolyhedronSpecs::Prismatic));
        out.extend(Capstone::universe().into_iter().map(PolyhedronSpecs::Capstone));
        out.extend(Composite::universe().into_iter().map(PolyhedronSpecs::Composite));
        out.extend(Elementary::universe().into_iter().map(PolyhedronSpecs::Elementary));
        out
    }

    /// Canonical specs for every distinct catalog name.
    pub fn catalog() -> Vec<PolyhedronSpecs> {
        let mut seen = std::collections::BTreeSet::new();
        let mut out = Vec::new();
        for spec in Self::universe() {
            let canonical = spec.canonicalize();
            if seen.insert(canonical.canonical_name()) {
                out.push(canonical);
            }
        }
        out
    }

    /// Reverse lookup: canonical specs for a catalog name.
    pub fn from_name(name: &str) -> Option<PolyhedronSpecs> {
        Self::catalog()
            .into_iter()
            .find(|s| s.canonical_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_canonicalize_is_idempotent() {
        for spec in PolyhedronSpecs::universe() {
            let once = spec.canonicalize();
            assert_eq!(once, once.canonicalize());
        }
    }

    #[test]
    fn test_canonicalize_preserves_name() {
        for spec in PolyhedronSpecs::universe() {
            assert_eq!(
                spec.canonical_name(),
                spec.canonicalize().canonical_name(),
                "fold changed the name of {spec:?}"
            );
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut by_name: BTreeMap<String, PolyhedronSpecs> = BTreeMap::new();
        for spec in PolyhedronSpecs::catalog() {
            let prev = by_name.insert(spec.canonical_name(), spec);
            assert!(prev.is_none(), "duplicate canonical entry");
        }
        // 5 Platonic + 13 Archimedean + 14 distinct prisms/antiprisms + 92
        // Johnson solids. Chiral mirror pairs share a name.
        assert_eq!(by_name.len(), 124);
    }

    #[test]
    fn test_from_name_round_trip() {
        for name in ["cube", "gyroelongated pentagonal pyramid", "snub cube"] {
            let spec = PolyhedronSpecs::from_name(name).expect("known name");
            assert_eq!(spec.canonical_name(), name);
        }
        assert!(PolyhedronSpecs::from_name("hypercube").is_none());
    }
}
