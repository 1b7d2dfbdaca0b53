use serde::{Deserialize, Serialize};

use crate::classical::Classical;
use crate::common::{FacetKind, Family};
use crate::names::polygon_adjective;
use crate::specs::PolyhedronSpecs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrismaticKind {
    Prism,
    Antiprism,
}

impl PrismaticKind {
    pub const ALL: [PrismaticKind; 2] = [PrismaticKind::Prism, PrismaticKind::Antiprism];
}

/// A prism or antiprism over an n-gon base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prismatic {
    /// Base polygon side count, 3..=10.
    pub base: u8,
    pub kind: PrismaticKind,
}

pub const MIN_PRISMATIC_BASE: u8 = 3;
pub const MAX_PRISMATIC_BASE: u8 = 10;

impl Prismatic {
    pub fn prism(base: u8) -> Self {
        Self {
            base,
            kind: PrismaticKind::Prism,
        }
    }

    pub fn antiprism(base: u8) -> Self {
        Self {
            base,
            kind: PrismaticKind::Antiprism,
        }
    }

    pub fn valid(&self) -> bool {
        (MIN_PRISMATIC_BASE..=MAX_PRISMATIC_BASE).contains(&self.base)
    }

    /// Structural update switching prism and antiprism.
    pub fn with_kind(self, kind: PrismaticKind) -> Self {
        Self { kind, ..self }
    }

    /// The square prism and triangular antiprism are Platonic solids.
    pub fn fold(&self) -> Option<PolyhedronSpecs> {
        match (self.base, self.kind) {
            (4, PrismaticKind::Prism) => Some(PolyhedronSpecs::Classical(Classical::regular(
                Family::Octahedral,
                Some(FacetKind::Face),
            ))),
            (3, PrismaticKind::Antiprism) => Some(PolyhedronSpecs::Classical(
                Classical::regular(Family::Octahedral, Some(FacetKind::Vertex)),
            )),
            _ => None,
        }
    }

    pub fn canonical_name(&self) -> String {
        if let Some(folded) = self.fold() {
            return folded.canonical_name();
        }
        let kind = match self.kind {
            PrismaticKind::Prism => "prism",
            PrismaticKind::Antiprism => "antiprism",
        };
        format!("{} {}", polygon_adjective(self.base as usize), kind)
    }

    pub fn universe() -> Vec<Prismatic> {
        let mut out = Vec::new();
        for base in MIN_PRISMATIC_BASE..=MAX_PRISMATIC_BASE {
            for kind in PrismaticKind::ALL {
                out.push(Prismatic { base, kind });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prismatic_names() {
        assert_eq!(Prismatic::prism(3).canonical_name(), "triangular prism");
        assert_eq!(
            Prismatic::antiprism(5).canonical_name(),
            "pentagonal antiprism"
        );
    }

    #[test]
    fn test_platonic_folds() {
        assert_eq!(Prismatic::prism(4).canonical_name(), "cube");
        assert_eq!(Prismatic::antiprism(3).canonical_name(), "octahedron");
    }

    #[test]
    fn test_universe_size() {
        assert_eq!(Prismatic::universe().len(), 16);
    }
}
