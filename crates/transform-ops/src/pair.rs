//! The operation-pair engine.
//!
//! Most operations are structural inverses of each other (augment/diminish,
//! elongate/shorten, expand/contract), so one pair definition derives both
//! directions, guaranteeing they are exact inverses by construction.
//!
//! `apply` aligns a *middle* realization (the finer topology both ends share)
//! into the calling forme's own frame, aligns the opposite side's reference
//! geometry into the same frame, and produces equal-length start/end vertex
//! arrays over the middle topology for linear interpolation.

use crf_kernel::forme::Forme;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::PolyhedronSpecs;
use tracing::debug;

use crate::types::{Animation, EntryOpts, OpError, OpOptions, OpResult, OpsResult, Side};

/// One edge of an operation graph: applying the pair's left-name operation
/// to a solid matching `left` (under `opts`) yields `right`, and vice versa.
///
/// `left`/`right` are canonicalized for matching; `raw_left`/`raw_right`
/// keep the generating taxonomy entry for the geometric algorithms (a
/// folded entry like the square bipyramid matches formes as "octahedron"
/// but still describes a two-cap pyramid solid).
#[derive(Debug, Clone)]
pub struct GraphEntry {
    pub left: PolyhedronSpecs,
    pub right: PolyhedronSpecs,
    pub raw_left: PolyhedronSpecs,
    pub raw_right: PolyhedronSpecs,
    pub opts: EntryOpts,
}

impl GraphEntry {
    pub fn new(raw_left: PolyhedronSpecs, raw_right: PolyhedronSpecs, opts: EntryOpts) -> Self {
        Self {
            left: raw_left.canonicalize(),
            right: raw_right.canonicalize(),
            raw_left,
            raw_right,
            opts,
        }
    }

    pub fn specs(&self, side: Side) -> &PolyhedronSpecs {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn raw(&self, side: Side) -> &PolyhedronSpecs {
        match side {
            Side::Left => &self.raw_left,
            Side::Right => &self.raw_right,
        }
    }

    /// Structural duplicate check used when materializing graphs.
    pub fn same_edge(&self, other: &GraphEntry) -> bool {
        self.left == other.left && self.right == other.right && self.opts == other.opts
    }
}

/// Everything a pair's hooks need about one application.
pub struct PairCtx<'a> {
    pub entry: &'a GraphEntry,
    pub side: Side,
    pub source: &'a Forme,
    pub options: &'a OpOptions,
}

/// The middle realization plus everything derived while building it.
pub struct MiddleData {
    /// Interpolation topology, aligned into the source frame.
    pub geom: Polyhedron,
    /// Aligned left realization, when resolved.
    pub left: Option<Polyhedron>,
    /// Aligned right realization, when resolved.
    pub right: Option<Polyhedron>,
    /// Subdivision provenance: per middle vertex, the (vertex, neighbor)
    /// pair of the left realization it came from.
    pub origins: Option<Vec<(usize, usize)>>,
    /// Direct vertex correspondence middle → right realization.
    pub vertex_map: Option<Vec<usize>>,
    /// Face classes of the middle playing the left and right roles.
    pub face_classes: Option<(Vec<usize>, Vec<usize>)>,
    /// Precomputed opposite-side positions for custom middles whose morph
    /// is cheapest to produce while building (gyration).
    pub alt_positions: Option<Vec<Point3d>>,
}

impl MiddleData {
    pub fn plain(geom: Polyhedron) -> Self {
        Self {
            geom,
            left: None,
            right: None,
            origins: None,
            vertex_map: None,
            face_classes: None,
            alt_positions: None,
        }
    }

    pub fn aligned(&self, side: Side) -> Option<&Polyhedron> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    fn set_aligned(&mut self, side: Side, geom: Polyhedron) {
        match side {
            Side::Left => self.left = Some(geom),
            Side::Right => self.right = Some(geom),
        }
    }

    pub fn require(&self, side: Side) -> OpsResult<&Polyhedron> {
        self.aligned(side)
            .ok_or_else(|| OpError::site("aligned realization missing"))
    }
}

/// A bidirectional operation defined once for both directions.
pub trait OpPair: Send + Sync {
    /// Public operation name when applied left-to-right.
    fn left_name(&self) -> &'static str;

    /// Public operation name when applied right-to-left.
    fn right_name(&self) -> &'static str;

    /// The materialized graph.
    fn graph(&self) -> &[GraphEntry];

    /// Which side's realization carries the interpolation topology; `None`
    /// means [`OpPair::custom_middle`] computes a third realization.
    fn middle_side(&self) -> Option<Side>;

    /// Candidate canonical frames for a realization of `side`. The first
    /// candidate is the canonical one (used for the calling forme); all are
    /// tried when aligning reference geometry, scored by coincidence with
    /// the realization they must match.
    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>>;

    /// Vertex positions realizing `side` on the middle topology. The
    /// default is the middle's own positions.
    fn morph(&self, ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        let _ = (ctx, side);
        Ok(middle.geom.vertex_positions().to_vec())
    }

    /// Compute a third middle realization, already aligned into the source
    /// frame (given by `src_pose`).
    fn custom_middle(&self, ctx: &PairCtx<'_>, src_pose: &Pose) -> OpsResult<MiddleData> {
        let _ = (ctx, src_pose);
        Err(OpError::site("pair declared a custom middle but builds none"))
    }
}

/// Symmetric nearest-point misfit between two position sets.
pub fn misfit(a: &[Point3d], b: &[Point3d]) -> f64 {
    let one_way = |from: &[Point3d], to: &[Point3d]| -> f64 {
        from.iter()
            .map(|p| {
                to.iter()
                    .map(|q| p.distance_to(q))
                    .fold(f64::MAX, f64::min)
            })
            .sum::<f64>()
    };
    one_way(a, b) + one_way(b, a)
}

/// Entries whose `side` matches the forme's specs and whose options are
/// accepted by the caller's.
pub fn matching_entries<'g>(
    graph: &'g [GraphEntry],
    side: Side,
    forme: &Forme,
    options: &OpOptions,
) -> Vec<&'g GraphEntry> {
    let specs = forme.specs.canonicalize();
    let mut given = options.entry;
    // A concrete face pins down the mated side count.
    if given.face_sides.is_none() {
        if let Some(face) = options.face {
            if face < forme.geom.face_count()
                && graph.iter().any(|e| e.opts.face_sides.is_some())
            {
                given.face_sides = Some(forme.geom.face_vertices(face).len());
            }
        }
    }
    graph
        .iter()
        .filter(|e| *e.specs(side) == specs)
        .filter(|e| given.accepts(&e.opts))
        .collect()
}

/// Run one side of a pair against a forme.
pub fn apply_pair(
    pair: &dyn OpPair,
    side: Side,
    forme: &Forme,
    options: &OpOptions,
) -> OpsResult<OpResult> {
    let op_name = match side {
        Side::Left => pair.left_name(),
        Side::Right => pair.right_name(),
    };
    let entries = matching_entries(pair.graph(), side, forme, options);
    let entry = match entries.len() {
        0 => {
            return Err(OpError::NotApplicable {
                op: op_name,
                name: forme.canonical_name(),
            });
        }
        1 => entries[0],
        _ => {
            return Err(OpError::AmbiguousOptions {
                op: op_name,
                name: forme.canonical_name(),
            });
        }
    };
    let other = side.opposite();
    let ctx = PairCtx {
        entry,
        side,
        source: forme,
        options,
    };
    debug!(
        op = op_name,
        from = %forme.canonical_name(),
        to = %entry.specs(other).canonical_name(),
        "applying operation"
    );

    let src_pose = pair
        .poses(&ctx, side, forme)?
        .into_iter()
        .next()
        .ok_or_else(|| OpError::site("no pose for the source realization"))?;
    let other_ref = Forme::load(entry.raw(other))?;

    // Resolve the middle realization in the source frame.
    let mut middle = match pair.middle_side() {
        Some(ms) if ms == side => MiddleData::plain(forme.geom.clone()),
        Some(ms) => {
            let aligned = align_scored(pair, &ctx, ms, &other_ref, &src_pose, |candidate| {
                let mut trial = MiddleData::plain(candidate.clone());
                trial.set_aligned(side, forme.geom.clone());
                let start = pair.morph(&ctx, side, &trial)?;
                Ok(misfit(&start, forme.geom.vertex_positions()))
            })?;
            let mut data = MiddleData::plain(aligned.clone());
            data.set_aligned(ms, aligned);
            data
        }
        None => pair.custom_middle(&ctx, &src_pose)?,
    };
    if middle.aligned(side).is_none() {
        middle.set_aligned(side, forme.geom.clone());
    }

    // Resolve the opposite reference in the same frame.
    if middle.aligned(other).is_none() {
        let end_hint = pair.morph(&ctx, other, &middle).ok();
        let aligned = align_scored(pair, &ctx, other, &other_ref, &src_pose, |candidate| {
            match &end_hint {
                Some(end) => Ok(misfit(candidate.vertex_positions(), end)),
                None => Ok(0.0),
            }
        })?;
        middle.set_aligned(other, aligned);
    }

    let start = pair.morph(&ctx, side, &middle)?;
    let end = pair.morph(&ctx, other, &middle)?;
    if start.len() != middle.geom.vertex_count() || end.len() != start.len() {
        return Err(OpError::site(
            "morph produced mismatched interpolation arrays",
        ));
    }

    let result_geom = middle.require(other)?.clone();
    Ok(OpResult {
        result: Forme::new(*entry.specs(other), result_geom),
        animation: Animation {
            start: middle.geom.with_vertices(start),
            end_vertices: end,
        },
    })
}

/// Align a reference realization into the source frame, trying every
/// candidate pose and keeping the best-scoring alignment.
fn align_scored(
    pair: &dyn OpPair,
    ctx: &PairCtx<'_>,
    ref_side: Side,
    reference: &Forme,
    src_pose: &Pose,
    mut score: impl FnMut(&Polyhedron) -> OpsResult<f64>,
) -> OpsResult<Polyhedron> {
    let candidates = pair.poses(ctx, ref_side, reference)?;
    if candidates.is_empty() {
        return Err(OpError::site("no pose for a reference realization"));
    }
    let mut best: Option<(f64, Polyhedron)> = None;
    for pose in &candidates {
        let transform = Pose::align(pose, src_pose).map_err(OpError::from)?;
        let aligned = reference.geom.transformed(&transform);
        if candidates.len() == 1 {
            return Ok(aligned);
        }
        let s = score(&aligned)?;
        if best.as_ref().map(|(b, _)| s < *b).unwrap_or(true) {
            best = Some((s, aligned));
        }
    }
    match best {
        Some((_, aligned)) => Ok(aligned),
        None => Err(OpError::site("no alignment candidate scored")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misfit_zero_for_identical_sets() {
        let pts = vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ];
        assert!(misfit(&pts, &pts) < 1e-12);
    }

    #[test]
    fn test_misfit_detects_displacement() {
        let a = vec![Point3d::new(0.0, 0.0, 0.0)];
        let b = vec![Point3d::new(3.0, 0.0, 0.0)];
        assert!((misfit(&a, &b) - 6.0).abs() < 1e-12);
    }
}
