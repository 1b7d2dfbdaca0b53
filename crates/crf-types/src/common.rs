use serde::{Deserialize, Serialize};

/// Symmetry family of a classical solid, keyed by its primary polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Triangle-based (tetrahedral symmetry).
    Tetrahedral,
    /// Square-based (octahedral symmetry).
    Octahedral,
    /// Pentagon-based (icosahedral symmetry).
    Icosahedral,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Tetrahedral, Family::Octahedral, Family::Icosahedral];

    /// Side count of the family's primary polygon.
    pub fn face_sides(self) -> usize {
        match self {
            Family::Tetrahedral => 3,
            Family::Octahedral => 4,
            Family::Icosahedral => 5,
        }
    }

    /// Vertex degree of the family's regular vertex-facet solid
    /// (octahedron: 4, icosahedron: 5; the tetrahedron is self-dual).
    pub fn vertex_degree(self) -> usize {
        self.face_sides()
    }
}

/// Which facet a classical solid is built on: the face form (cube,
/// dodecahedron) or the vertex form (octahedron, icosahedron).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    Face,
    Vertex,
}

impl FacetKind {
    pub const ALL: [FacetKind; 2] = [FacetKind::Face, FacetKind::Vertex];

    pub fn opposite(self) -> FacetKind {
        match self {
            FacetKind::Face => FacetKind::Vertex,
            FacetKind::Vertex => FacetKind::Face,
        }
    }
}

/// Handedness choice for chiral results (snub solids, gyroelongated
/// bicupolae). Enantiomorphs share one canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Twist {
    Left,
    Right,
}

impl Twist {
    pub const ALL: [Twist; 2] = [Twist::Left, Twist::Right];

    pub fn opposite(self) -> Twist {
        match self {
            Twist::Left => Twist::Right,
            Twist::Right => Twist::Left,
        }
    }
}

/// Relative placement of two modified patches on one solid: adjacent-ish
/// (meta) or antipodal (para).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    Meta,
    Para,
}

impl Align {
    pub const ALL: [Align; 2] = [Align::Meta, Align::Para];
}

/// Whether a rotated cap's faces line up with its neighbors (ortho) or are
/// offset by a half step (gyro).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gyration {
    Ortho,
    Gyro,
}

impl Gyration {
    pub const ALL: [Gyration; 2] = [Gyration::Ortho, Gyration::Gyro];

    pub fn opposite(self) -> Gyration {
        match self {
            Gyration::Ortho => Gyration::Gyro,
            Gyration::Gyro => Gyration::Ortho,
        }
    }
}
