use crf_kernel::KernelError;
use crf_kernel::forme::Forme;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::mesh::cap::CapKind;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::{Align, FacetKind, Gyration, Twist};
use thiserror::Error;

pub type OpsResult<T> = Result<T, OpError>;

/// Failures surfaced by the operation engine.
#[derive(Debug, Error)]
pub enum OpError {
    /// No graph entry connects this solid under the given options.
    #[error("\"{op}\" does not apply to the {name}")]
    NotApplicable { op: &'static str, name: String },

    /// More than one graph entry matches; the caller skipped the options
    /// check. The engine never guesses, since a guess silently changes
    /// which named solid is produced.
    #[error("\"{op}\" on the {name} needs options to disambiguate")]
    AmbiguousOptions { op: &'static str, name: String },

    /// A concrete site (face, cap) does not fit the requested operation.
    #[error("unsuitable site: {detail}")]
    UnsuitableSite { detail: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl OpError {
    pub fn site(detail: impl Into<String>) -> Self {
        OpError::UnsuitableSite {
            detail: detail.into(),
        }
    }
}

/// Which end of an operation pair a solid sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Intrinsic options distinguishing parallel graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryOpts {
    /// Which regular form a merged form contracts or cumulates to.
    pub facet: Option<FacetKind>,
    /// Handedness of a chiral result.
    pub twist: Option<Twist>,
    /// Ortho/gyro choice when attaching or rotating a cap.
    pub gyrate: Option<Gyration>,
    /// Meta/para placement of a second modification.
    pub align: Option<Align>,
    /// What kind of cap an augmentation attaches.
    pub cap: Option<CapKind>,
    /// Side count of the mated face, separating augmentations of one base.
    pub face_sides: Option<usize>,
}

impl EntryOpts {
    /// Whether caller-given (partial) options accept an entry's options:
    /// every field the caller fixed must match.
    pub fn accepts(&self, entry: &EntryOpts) -> bool {
        fn ok<T: PartialEq>(given: Option<T>, entry: Option<T>) -> bool {
            given.is_none() || given == entry
        }
        ok(self.facet, entry.facet)
            && ok(self.twist, entry.twist)
            && ok(self.gyrate, entry.gyrate)
            && ok(self.align, entry.align)
            && ok(self.cap, entry.cap)
            && ok(self.face_sides, entry.face_sides)
    }
}

/// Caller-supplied options: a partial entry filter plus a concrete site.
#[derive(Debug, Clone, Default)]
pub struct OpOptions {
    pub entry: EntryOpts,
    /// Target face (augment, gyrate, cupola/rotunda diminish).
    pub face: Option<usize>,
    /// Peak vertex (pyramid-cap diminish).
    pub vertex: Option<usize>,
}

impl OpOptions {
    pub fn with_facet(mut self, facet: FacetKind) -> Self {
        self.entry.facet = Some(facet);
        self
    }

    pub fn with_twist(mut self, twist: Twist) -> Self {
        self.entry.twist = Some(twist);
        self
    }

    pub fn with_gyrate(mut self, gyrate: Gyration) -> Self {
        self.entry.gyrate = Some(gyrate);
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.entry.align = Some(align);
        self
    }

    pub fn with_cap(mut self, cap: CapKind) -> Self {
        self.entry.cap = Some(cap);
        self
    }

    pub fn at_face(mut self, face: usize) -> Self {
        self.face = Some(face);
        self
    }

    pub fn at_vertex(mut self, vertex: usize) -> Self {
        self.vertex = Some(vertex);
        self
    }
}

/// Interpolation data handed to the animation collaborator. Index `i` of
/// `start` always corresponds to index `i` of `end_vertices`.
#[derive(Debug, Clone)]
pub struct Animation {
    pub start: Polyhedron,
    pub end_vertices: Vec<Point3d>,
}

impl Animation {
    /// Positions at parameter `t`, linearly interpolated.
    pub fn at(&self, t: f64) -> Vec<Point3d> {
        self.start
            .vertex_positions()
            .iter()
            .zip(&self.end_vertices)
            .map(|(a, b)| a.lerp(b, t))
            .collect()
    }

    /// The completed state: end positions on the start topology, with
    /// coincident seams merged and degenerate faces dropped. Collapsed
    /// edges skew the mean edge length toward zero, so the merge tolerance
    /// comes from the longest edge.
    pub fn completed(&self) -> Polyhedron {
        let finished = self.start.with_vertices(self.end_vertices.clone());
        let longest = finished
            .edges()
            .map(|e| e.length())
            .fold(0.0f64, f64::max);
        finished.deduplicate(longest * 1e-4)
    }
}

/// What an applied operation hands back.
#[derive(Debug, Clone)]
pub struct OpResult {
    pub result: Forme,
    pub animation: Animation,
}
