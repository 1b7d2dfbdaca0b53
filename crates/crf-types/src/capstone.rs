use serde::{Deserialize, Serialize};

use crate::classical::{Classical, ClassicalForm};
use crate::common::{FacetKind, Family, Gyration, Twist};
use crate::names::polygon_adjective;
use crate::prismatic::Prismatic;
use crate::specs::PolyhedronSpecs;

/// What sits on top of a capstone solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapstoneKind {
    Pyramid,
    Cupola,
    Rotunda,
    /// One cupola and one rotunda (pentagonal only, count 2).
    CupolaRotunda,
}

impl CapstoneKind {
    pub const ALL: [CapstoneKind; 4] = [
        CapstoneKind::Pyramid,
        CapstoneKind::Cupola,
        CapstoneKind::Rotunda,
        CapstoneKind::CupolaRotunda,
    ];
}

/// Band inserted between the caps (or between cap and base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Elongation {
    None,
    Prism,
    Antiprism,
}

impl Elongation {
    pub const ALL: [Elongation; 3] = [Elongation::None, Elongation::Prism, Elongation::Antiprism];

    fn prefix(self) -> &'static str {
        match self {
            Elongation::None => "",
            Elongation::Prism => "elongated ",
            Elongation::Antiprism => "gyroelongated ",
        }
    }
}

/// A pyramid, cupola, or rotunda solid: one or two caps over a polygonal
/// cross-section, optionally elongated by a prism or antiprism band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capstone {
    /// Cap base polygon: 2..=5. Base 2 is the digonal cupola (fastigium).
    pub base: u8,
    pub kind: CapstoneKind,
    /// Number of caps, 1 or 2.
    pub count: u8,
    pub elongation: Elongation,
    /// Relative rotation of the second cap (cupola/rotunda forms only).
    pub gyrate: Option<Gyration>,
    /// Handedness of the chiral gyroelongated two-cap forms.
    pub twist: Option<Twist>,
}

impl Capstone {
    pub fn new(base: u8, kind: CapstoneKind, count: u8, elongation: Elongation) -> Self {
        Self {
            base,
            kind,
            count,
            elongation,
            gyrate: None,
            twist: None,
        }
    }

    pub fn pyramid(base: u8) -> Self {
        Self::new(base, CapstoneKind::Pyramid, 1, Elongation::None)
    }

    pub fn cupola(base: u8) -> Self {
        Self::new(base, CapstoneKind::Cupola, 1, Elongation::None)
    }

    pub fn rotunda() -> Self {
        Self::new(5, CapstoneKind::Rotunda, 1, Elongation::None)
    }

    // ── Structural updates ──────────────────────────────────────────────────

    pub fn with_elongation(self, elongation: Elongation) -> Self {
        // A gyration choice only exists while the band does not force it.
        let gyrate = if elongation == Elongation::Antiprism {
            None
        } else {
            self.gyrate
        };
        Self {
            elongation,
            gyrate,
            twist: None,
            ..self
        }
    }

    pub fn with_gyrate(self, gyrate: Gyration) -> Self {
        Self {
            gyrate: Some(gyrate),
            ..self
        }
    }

    pub fn with_twist(self, twist: Twist) -> Self {
        Self {
            twist: Some(twist),
            ..self
        }
    }

    /// Add a second cap of the given kind (pairing a cupola and a rotunda
    /// yields the cupolarotunda).
    pub fn with_second_cap(self, cap: CapstoneKind, gyrate: Option<Gyration>) -> Self {
        let kind = if cap == self.kind {
            self.kind
        } else {
            CapstoneKind::CupolaRotunda
        };
        Self {
            kind,
            count: 2,
            gyrate,
            ..self
        }
    }

    // ── Predicates ──────────────────────────────────────────────────────────

    pub fn is_pyramid(&self) -> bool {
        self.kind == CapstoneKind::Pyramid
    }

    pub fn is_fastigium(&self) -> bool {
        self.base == 2
    }

    pub fn is_elongated(&self) -> bool {
        self.elongation == Elongation::Prism
    }

    pub fn is_gyroelongated(&self) -> bool {
        self.elongation == Elongation::Antiprism
    }

    pub fn is_bi(&self) -> bool {
        self.count == 2
    }

    pub fn is_chiral(&self) -> bool {
        self.twist.is_some()
    }

    /// Side count of the ring the cap sits on (cupolas and rotundas spread
    /// onto a 2n-gon).
    pub fn boundary_sides(&self) -> usize {
        match self.kind {
            CapstoneKind::Pyramid => self.base as usize,
            _ => 2 * self.base as usize,
        }
    }

    /// Whether a two-cap cupola/rotunda form carries an ortho/gyro choice.
    fn wants_gyrate(&self) -> bool {
        self.count == 2
            && self.kind != CapstoneKind::Pyramid
            && self.elongation != Elongation::Antiprism
    }

    /// Whether a gyroelongated two-cap cupola/rotunda form is chiral.
    fn wants_twist(&self) -> bool {
        self.count == 2
            && self.kind != CapstoneKind::Pyramid
            && self.elongation == Elongation::Antiprism
    }

    pub fn valid(&self) -> bool {
        let base_ok = match self.kind {
            CapstoneKind::Pyramid => (3..=5).contains(&self.base),
            CapstoneKind::Cupola => (2..=5).contains(&self.base),
            CapstoneKind::Rotunda | CapstoneKind::CupolaRotunda => self.base == 5,
        };
        if !base_ok || !(1..=2).contains(&self.count) {
            return false;
        }
        if self.kind == CapstoneKind::CupolaRotunda && self.count != 2 {
            return false;
        }
        // Gyroelongating a triangular pyramid merges coplanar faces.
        if self.kind == CapstoneKind::Pyramid
            && self.base == 3
            && self.elongation == Elongation::Antiprism
        {
            return false;
        }
        // The fastigium family: only the plain roof and the gyrobifastigium.
        if self.base == 2 {
            let plain = self.count == 1 && self.gyrate.is_none();
            let gyrobi = self.count == 2 && self.gyrate == Some(Gyration::Gyro);
            if self.elongation != Elongation::None || !(plain || gyrobi) {
                return false;
            }
            return self.twist.is_none();
        }
        if self.gyrate.is_some() != self.wants_gyrate() {
            return false;
        }
        self.twist.is_some() == self.wants_twist()
    }

    /// Fold degenerate capstones onto their canonical identity.
    pub fn fold(&self) -> Option<PolyhedronSpecs> {
        let classical = |family, facet: Option<FacetKind>, form| {
            Some(PolyhedronSpecs::Classical(Classical {
                family,
                form,
                facet,
                twist: None,
            }))
        };
        match (self.base, self.kind, self.count, self.elongation) {
            (3, CapstoneKind::Pyramid, 1, Elongation::None) => {
                classical(Family::Tetrahedral, None, ClassicalForm::Regular)
            }
            (4, CapstoneKind::Pyramid, 2, Elongation::None) => classical(
                Family::Octahedral,
                Some(FacetKind::Vertex),
                ClassicalForm::Regular,
            ),
            (5, CapstoneKind::Pyramid, 2, Elongation::Antiprism) => classical(
                Family::Icosahedral,
                Some(FacetKind::Vertex),
                ClassicalForm::Regular,
            ),
            (2, CapstoneKind::Cupola, 1, Elongation::None) => {
                Some(PolyhedronSpecs::Prismatic(Prismatic::prism(3)))
            }
            (3, CapstoneKind::Cupola, 2, Elongation::None)
                if self.gyrate == Some(Gyration::Gyro) =>
            {
                classical(Family::Octahedral, None, ClassicalForm::Rectified)
            }
            (5, CapstoneKind::Rotunda, 2, Elongation::None)
                if self.gyrate == Some(Gyration::Gyro) =>
            {
                classical(Family::Icosahedral, None, ClassicalForm::Rectified)
            }
            (4, CapstoneKind::Cupola, 2, Elongation::Prism)
                if self.gyrate == Some(Gyration::Ortho) =>
            {
                classical(Family::Octahedral, None, ClassicalForm::Cantellated)
            }
            _ => None,
        }
    }

    pub fn canonical_name(&self) -> String {
        if let Some(folded) = self.fold() {
            return folded.canonical_name();
        }
        if self.base == 2 {
            let body = if self.count == 1 {
                "fastigium"
            } else {
                "gyrobifastigium"
            };
            return format!("{}{}", self.elongation.prefix(), body);
        }
        let gyration = |g: Option<Gyration>| match g {
            Some(Gyration::Ortho) => "ortho",
            Some(Gyration::Gyro) => "gyro",
            None => "",
        };
        let body = match (self.kind, self.count) {
            (CapstoneKind::Pyramid, 1) => "pyramid".to_string(),
            (CapstoneKind::Pyramid, _) => "bipyramid".to_string(),
            (CapstoneKind::Cupola, 1) => "cupola".to_string(),
            (CapstoneKind::Cupola, _) => format!("{}bicupola", gyration(self.gyrate)),
            (CapstoneKind::Rotunda, 1) => "rotunda".to_string(),
            (CapstoneKind::Rotunda, _) => format!("{}birotunda", gyration(self.gyrate)),
            (CapstoneKind::CupolaRotunda, _) => {
                format!("{}cupolarotunda", gyration(self.gyrate))
            }
        };
        format!(
            "{}{} {}",
            self.elongation.prefix(),
            polygon_adjective(self.base as usize),
            body
        )
    }

    pub fn universe() -> Vec<Capstone> {
        let mut out = Vec::new();
        for base in 2..=5u8 {
            for kind in CapstoneKind::ALL {
                for count in 1..=2u8 {
                    for elongation in Elongation::ALL {
                        let gyrates: Vec<Option<Gyration>> = vec![
                            None,
                            Some(Gyration::Ortho),
                            Some(Gyration::Gyro),
                        ];
                        for gyrate in gyrates {
                            for twist in [None, Some(Twist::Left), Some(Twist::Right)] {
                                let spec = Capstone {
                                    base,
                                    kind,
                                    count,
                                    elongation,
                                    gyrate,
                                    twist,
                                };
                                if spec.valid() {
                                    out.push(spec);
                                }
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
    fn test_johnson_names() {
        assert_eq!(Capstone::pyramid(4).canonical_name(), "square pyramid");
        assert_eq!(
            Capstone::pyramid(4)
                .with_elongation(Elongation::Prism)
                .canonical_name(),
            "elongated square pyramid"
        );
        assert_eq!(
            Capstone::pyramid(5)
                .with_elongation(Elongation::Antiprism)
                .canonical_name(),
            "gyroelongated pentagonal pyramid"
        );
        assert_eq!(
            Capstone::cupola(5)
                .with_second_cap(CapstoneKind::Rotunda, Some(Gyration::Ortho))
                .canonical_name(),
            "pentagonal orthocupolarotunda"
        );
    }

    #[test]
    fn test_folds() {
        assert_eq!(Capstone::pyramid(3).canonical_name(), "tetrahedron");
        let square_bipyramid = Capstone::new(4, CapstoneKind::Pyramid, 2, Elongation::None);
        assert_eq!(square_bipyramid.canonical_name(), "octahedron");
        let gyro_bipyramid = Capstone::new(5, CapstoneKind::Pyramid, 2, Elongation::Antiprism);
        assert_eq!(gyro_bipyramid.canonical_name(), "icosahedron");
        let pseudo = Capstone::new(4, CapstoneKind::Cupola, 2, Elongation::Prism)
            .with_gyrate(Gyration::Ortho);
        assert_eq!(pseudo.canonical_name(), "rhombicuboctahedron");
    }

    #[test]
    fn test_pseudo_rhombicuboctahedron_is_distinct() {
        let gyro = Capstone::new(4, CapstoneKind::Cupola, 2, Elongation::Prism)
            .with_gyrate(Gyration::Gyro);
        assert_eq!(gyro.canonical_name(), "elongated square gyrobicupola");
    }

    #[test]
    fn test_triangular_pyramid_cannot_gyroelongate() {
        let spec = Capstone::pyramid(3).with_elongation(Elongation::Antiprism);
        assert!(!spec.valid());
    }

    #[test]
    fn test_gyrobifastigium() {
        let spec = Capstone::new(2, CapstoneKind::Cupola, 2, Elongation::None)
            .with_gyrate(Gyration::Gyro);
        assert!(spec.valid());
        assert_eq!(spec.canonical_name(), "gyrobifastigium");
    }

    #[test]
    fn test_universe_entries_are_valid() {
        let universe = Capstone::universe();
        assert!(universe.iter().all(Capstone::valid));
        // Chiral entries come in left/right pairs sharing one name.
        let chiral: Vec<&Capstone> = universe.iter().filter(|c| c.is_chiral()).collect();
        assert!(chiral.len() % 2 == 0);
        assert!(!chiral.is_empty());
    }
}
