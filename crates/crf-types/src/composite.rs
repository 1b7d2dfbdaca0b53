use serde::{Deserialize, Serialize};

use crate::capstone::{Capstone, CapstoneKind, Elongation};
use crate::classical::{Classical, ClassicalForm};
use crate::common::{Align, FacetKind, Family};
use crate::prismatic::Prismatic;
use crate::specs::PolyhedronSpecs;

/// Source solids that admit augmentation, diminution, or gyration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositeBase {
    TriangularPrism,
    PentagonalPrism,
    HexagonalPrism,
    Dodecahedron,
    Icosahedron,
    TruncatedTetrahedron,
    TruncatedCube,
    TruncatedDodecahedron,
    Rhombicosidodecahedron,
}

impl CompositeBase {
    pub const ALL: [CompositeBase; 9] = [
        CompositeBase::TriangularPrism,
        CompositeBase::PentagonalPrism,
        CompositeBase::HexagonalPrism,
        CompositeBase::Dodecahedron,
        CompositeBase::Icosahedron,
        CompositeBase::TruncatedTetrahedron,
        CompositeBase::TruncatedCube,
        CompositeBase::TruncatedDodecahedron,
        CompositeBase::Rhombicosidodecahedron,
    ];

    /// Specs of the unmodified base solid.
    pub fn specs(self) -> PolyhedronSpecs {
        match self {
            CompositeBase::TriangularPrism => PolyhedronSpecs::Prismatic(Prismatic::prism(3)),
            CompositeBase::PentagonalPrism => PolyhedronSpecs::Prismatic(Prismatic::prism(5)),
            CompositeBase::HexagonalPrism => PolyhedronSpecs::Prismatic(Prismatic::prism(6)),
            CompositeBase::Dodecahedron => PolyhedronSpecs::Classical(Classical::regular(
                Family::Icosahedral,
                Some(FacetKind::Face),
            )),
            CompositeBase::Icosahedron => PolyhedronSpecs::Classical(Classical::regular(
                Family::Icosahedral,
                Some(FacetKind::Vertex),
            )),
            CompositeBase::TruncatedTetrahedron => PolyhedronSpecs::Classical(Classical {
                family: Family::Tetrahedral,
                form: ClassicalForm::Truncated,
                facet: None,
                twist: None,
            }),
            CompositeBase::TruncatedCube => PolyhedronSpecs::Classical(Classical {
                family: Family::Octahedral,
                form: ClassicalForm::Truncated,
                facet: Some(FacetKind::Face),
                twist: None,
            }),
            CompositeBase::TruncatedDodecahedron => PolyhedronSpecs::Classical(Classical {
                family: Family::Icosahedral,
                form: ClassicalForm::Truncated,
                facet: Some(FacetKind::Face),
                twist: None,
            }),
            CompositeBase::Rhombicosidodecahedron => PolyhedronSpecs::Classical(Classical {
                family: Family::Icosahedral,
                form: ClassicalForm::Cantellated,
                facet: None,
                twist: None,
            }),
        }
    }

    pub fn canonical_name(self) -> String {
        self.specs().canonical_name()
    }

    /// How many times the base can be augmented.
    pub fn max_augmented(self) -> u8 {
        match self {
            CompositeBase::TriangularPrism => 3,
            CompositeBase::PentagonalPrism => 2,
            CompositeBase::HexagonalPrism => 3,
            CompositeBase::Dodecahedron => 3,
            // Only the tridiminished icosahedron takes an augment.
            CompositeBase::Icosahedron => 1,
            CompositeBase::TruncatedTetrahedron => 1,
            CompositeBase::TruncatedCube => 2,
            CompositeBase::TruncatedDodecahedron => 3,
            CompositeBase::Rhombicosidodecahedron => 0,
        }
    }

    pub fn max_diminished(self) -> u8 {
        match self {
            CompositeBase::Icosahedron | CompositeBase::Rhombicosidodecahedron => 3,
            _ => 0,
        }
    }

    pub fn max_gyrate(self) -> u8 {
        match self {
            CompositeBase::Rhombicosidodecahedron => 3,
            _ => 0,
        }
    }

    /// Whether a second modification has distinct meta and para placements.
    pub fn pairs_need_align(self) -> bool {
        matches!(
            self,
            CompositeBase::HexagonalPrism
                | CompositeBase::Dodecahedron
                | CompositeBase::Icosahedron
                | CompositeBase::TruncatedDodecahedron
                | CompositeBase::Rhombicosidodecahedron
        )
    }

    /// Side count of an augmentable face on this base.
    pub fn augment_face_sides(self) -> usize {
        match self {
            CompositeBase::TriangularPrism
            | CompositeBase::PentagonalPrism
            | CompositeBase::HexagonalPrism => 4,
            CompositeBase::Dodecahedron => 5,
            // The scar left by tridiminishing is a pentagon.
            CompositeBase::Icosahedron => 5,
            CompositeBase::TruncatedTetrahedron => 6,
            CompositeBase::TruncatedCube => 8,
            CompositeBase::TruncatedDodecahedron => 10,
            CompositeBase::Rhombicosidodecahedron => 0,
        }
    }

    /// What gets attached when augmenting this base.
    pub fn augment_cap(self) -> CapstoneKind {
        match self {
            CompositeBase::TriangularPrism
            | CompositeBase::PentagonalPrism
            | CompositeBase::HexagonalPrism
            | CompositeBase::Dodecahedron
            | CompositeBase::Icosahedron => CapstoneKind::Pyramid,
            _ => CapstoneKind::Cupola,
        }
    }
}

/// A base solid with some number of augmented, diminished, or gyrated sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composite {
    pub base: CompositeBase,
    pub augmented: u8,
    pub diminished: u8,
    pub gyrate: u8,
    /// Placement of the second modification, when meta and para differ.
    pub align: Option<Align>,
}

impl Composite {
    pub fn augmented(base: CompositeBase) -> Self {
        Self {
            base,
            augmented: 1,
            diminished: 0,
            gyrate: 0,
            align: None,
        }
    }

    pub fn diminished(base: CompositeBase, count: u8) -> Self {
        Self {
            base,
            augmented: 0,
            diminished: count,
            gyrate: 0,
            align: None,
        }
    }

    pub fn gyrate(base: CompositeBase, count: u8) -> Self {
        Self {
            base,
            augmented: 0,
            diminished: 0,
            gyrate: count,
            align: None,
        }
    }

    pub fn with_align(self, align: Align) -> Self {
        Self {
            align: Some(align),
            ..self
        }
    }

    pub fn with_augmented(self, augmented: u8) -> Self {
        Self { augmented, ..self }.clear_stale_align()
    }

    pub fn with_diminished(self, diminished: u8) -> Self {
        Self { diminished, ..self }.clear_stale_align()
    }

    pub fn with_gyrate(self, gyrate: u8) -> Self {
        Self { gyrate, ..self }.clear_stale_align()
    }

    fn clear_stale_align(self) -> Self {
        if self.modification_count() == 2 && self.base.pairs_need_align() {
            self
        } else {
            Self { align: None, ..self }
        }
    }

    pub fn modification_count(&self) -> u8 {
        self.augmented + self.diminished + self.gyrate
    }

    pub fn valid(&self) -> bool {
        let b = self.base;
        if self.augmented > b.max_augmented()
            || self.diminished > b.max_diminished()
            || self.gyrate > b.max_gyrate()
        {
            return false;
        }
        let total = self.modification_count();
        if total == 0 {
            return false;
        }
        // Gyrations and diminutions of the rhombicosidodecahedron share the
        // same twelve cupola sites; at most three are modified.
        if b == CompositeBase::Rhombicosidodecahedron && self.gyrate + self.diminished > 3 {
            return false;
        }
        // The icosahedron takes an augment only after tridiminishing.
        if b == CompositeBase::Icosahedron && self.augmented == 1 && self.diminished != 3 {
            return false;
        }
        let wants_align = total == 2 && b.pairs_need_align();
        self.align.is_some() == wants_align
    }

    /// Fold degenerate composites onto their canonical identity.
    pub fn fold(&self) -> Option<PolyhedronSpecs> {
        if self.modification_count() == 0 {
            return Some(self.base.specs());
        }
        if self.base != CompositeBase::Icosahedron || self.augmented != 0 {
            return None;
        }
        match (self.diminished, self.align) {
            // One cap off the icosahedron is the gyroelongated pentagonal
            // pyramid.
            (1, _) => Some(PolyhedronSpecs::Capstone(
                Capstone::pyramid(5).with_elongation(Elongation::Antiprism),
            )),
            // Two antipodal caps off leave the pentagonal antiprism.
            (2, Some(Align::Para)) => {
                Some(PolyhedronSpecs::Prismatic(Prismatic::antiprism(5)))
            }
            _ => None,
        }
    }

    fn modifier(count: u8, align: Option<Align>, word: &str) -> String {
        let align_prefix = match align {
            Some(Align::Para) => "para",
            Some(Align::Meta) => "meta",
            None => "",
        };
        format!(
            "{}{}{}",
            align_prefix,
            crate::names::count_prefix(count as usize),
            word
        )
    }

    pub fn canonical_name(&self) -> String {
        if let Some(folded) = self.fold() {
            return folded.canonical_name();
        }
        let base_name = self.base.canonical_name();
        if self.base == CompositeBase::Rhombicosidodecahedron {
            let mut words = Vec::new();
            let pair = self.modification_count() == 2;
            if self.gyrate > 0 {
                let align = if pair { self.align } else { None };
                words.push(Self::modifier(self.gyrate, align, "gyrate"));
            }
            if self.diminished > 0 {
                let align = if pair && self.gyrate == 0 { self.align } else { None };
                words.push(Self::modifier(self.diminished, align, "diminished"));
            }
            words.push(base_name);
            return words.join(" ");
        }
        if self.base == CompositeBase::Icosahedron {
            let diminished = Self::modifier(self.diminished, self.align, "diminished");
            return if self.augmented > 0 {
                format!("augmented {diminished} {base_name}")
            } else {
                format!("{diminished} {base_name}")
            };
        }
        format!(
            "{} {}",
            Self::modifier(self.augmented, self.align, "augmented"),
            base_name
        )
    }

    pub fn universe() -> Vec<Composite> {
        let mut out = Vec::new();
        for base in CompositeBase::ALL {
            for augmented in 0..=base.max_augmented() {
                for diminished in 0..=base.max_diminished() {
                    for gyrate in 0..=base.max_gyrate() {
                        for align in [None, Some(Align::Meta), Some(Align::Para)] {
                            let spec = Composite {
                                base,
                                augmented,
                                diminished,
                                gyrate,
                                align,
                            };
                            if spec.valid() {
                                out.push(spec);
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_augmented_prism_names() {
        let spec = Composite::augmented(CompositeBase::TriangularPrism);
        assert_eq!(spec.canonical_name(), "augmented triangular prism");
        let spec = spec.with_augmented(3);
        assert_eq!(spec.canonical_name(), "triaugmented triangular prism");
    }

    #[test]
    fn test_dodecahedron_alignment_names() {
        let spec = Composite::augmented(CompositeBase::Dodecahedron)
            .with_augmented(2)
            .with_align(Align::Para);
        assert_eq!(spec.canonical_name(), "parabiaugmented dodecahedron");
    }

    #[test]
    fn test_icosahedron_folds() {
        let one = Composite::diminished(CompositeBase::Icosahedron, 1);
        assert_eq!(one.canonical_name(), "gyroelongated pentagonal pyramid");
        let para = Composite::diminished(CompositeBase::Icosahedron, 2).with_align(Align::Para);
        assert_eq!(para.canonical_name(), "pentagonal antiprism");
        let meta = Composite::diminished(CompositeBase::Icosahedron, 2).with_align(Align::Meta);
        assert_eq!(meta.canonical_name(), "metabidiminished icosahedron");
    }

    #[test]
    fn test_rhombicosidodecahedron_combo_names() {
        let rco = CompositeBase::Rhombicosidodecahedron;
        assert_eq!(
            Composite::gyrate(rco, 1).canonical_name(),
            "gyrate rhombicosidodecahedron"
        );
        let spec = Composite {
            base: rco,
            augmented: 0,
            diminished: 1,
            gyrate: 1,
            align: Some(Align::Meta),
        };
        assert_eq!(
            spec.canonical_name(),
            "metagyrate diminished rhombicosidodecahedron"
        );
        let spec = Composite {
            base: rco,
            augmented: 0,
            diminished: 2,
            gyrate: 1,
            align: None,
        };
        assert_eq!(
            spec.canonical_name(),
            "gyrate bidiminished rhombicosidodecahedron"
        );
    }

    #[test]
    fn test_universe_entries_are_valid() {
        let universe = Composite::universe();
        assert!(universe.iter().all(Composite::valid));
        let names: Vec<String> = universe.iter().map(|c| c.canonical_name()).collect();
        assert!(names.contains(&"augmented truncated tetrahedron".to_string()));
        assert!(names.contains(&"tridiminished icosahedron".to_string()));
        assert!(names.contains(&"trigyrate rhombicosidodecahedron".to_string()));
    }
}
