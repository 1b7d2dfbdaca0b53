//! Truncation family: truncate/sharpen and rectify/cumulate.
//!
//! Both pairs interpolate on the truncated topology. Truncation's middle is
//! the truncated reference itself; rectification pre-subdivides the regular
//! solid (one duplicate per vertex-edge incidence) so that the half-ratio
//! cut collapses pairs of duplicates onto edge midpoints.

use std::sync::OnceLock;

use crf_kernel::forme::Forme;
use crf_kernel::geometry::plane::planes_intersection;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_types::{Classical, ClassicalForm, FacetKind, PolyhedronSpecs};

use crate::classify::{
    class_pose, majority_faces, minority_faces, rectified_class, truncation_subdivide,
};
use crate::pair::{GraphEntry, MiddleData, OpPair, PairCtx};
use crate::types::{EntryOpts, OpError, OpsResult, Side};

fn classical_entry(c: &Classical) -> PolyhedronSpecs {
    PolyhedronSpecs::Classical(*c)
}

fn family_sides(entry: &GraphEntry) -> OpsResult<usize> {
    entry
        .raw_left
        .as_classical()
        .map(|c| c.family.face_sides())
        .ok_or_else(|| OpError::site("truncation entry is not classical"))
}

/// Distance from the solid centroid to the plane of the given face class.
fn class_plane_distance(forme: &Forme, class: &[usize]) -> OpsResult<f64> {
    let first = *class
        .first()
        .ok_or_else(|| OpError::site("empty face class"))?;
    let plane = forme.geom.face(first).plane().map_err(OpError::from)?;
    Ok(plane.signed_distance(&forme.geom.centroid()).abs())
}

// ── Truncate / Sharpen ──────────────────────────────────────────────────────

pub struct TruncatePair {
    graph: Vec<GraphEntry>,
}

impl TruncatePair {
    fn build() -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();
        for c in Classical::universe() {
            let entry = if c.is_regular() {
                GraphEntry::new(
                    classical_entry(&c),
                    classical_entry(&c.with_form(ClassicalForm::Truncated)),
                    EntryOpts::default(),
                )
            } else if c.is_rectified() {
                GraphEntry::new(
                    classical_entry(&c),
                    classical_entry(&c.with_form(ClassicalForm::Bevelled)),
                    EntryOpts::default(),
                )
            } else {
                continue;
            };
            if !graph.iter().any(|e| e.same_edge(&entry)) {
                graph.push(entry);
            }
        }
        Self { graph }
    }
}

pub fn truncate_pair() -> &'static TruncatePair {
    static PAIR: OnceLock<TruncatePair> = OnceLock::new();
    PAIR.get_or_init(TruncatePair::build)
}

impl OpPair for TruncatePair {
    fn left_name(&self) -> &'static str {
        "truncate"
    }

    fn right_name(&self) -> &'static str {
        "sharpen"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        Some(Side::Right)
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let n = family_sides(ctx.entry)?;
        let class = match side {
            Side::Left => {
                let raw = ctx
                    .entry
                    .raw_left
                    .as_classical()
                    .ok_or_else(|| OpError::site("truncation entry is not classical"))?;
                if raw.is_rectified() {
                    rectified_class(&forme.geom, n, FacetKind::Face)?
                } else {
                    (0..forme.geom.face_count()).collect()
                }
            }
            Side::Right => majority_faces(&forme.geom),
        };
        // Truncation keeps the original face planes, so the class-plane
        // distance is the shared scale.
        let scale = class_plane_distance(forme, &class)?;
        Ok(vec![class_pose(&forme.geom, &class, scale)?])
    }

    fn morph(&self, _ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        match side {
            Side::Right => Ok(middle.geom.vertex_positions().to_vec()),
            Side::Left => sharpen_positions(&middle.geom),
        }
    }
}

/// Collapse every vertex-figure face to the apex its neighboring face
/// planes converge to.
fn sharpen_positions(
    geom: &crf_kernel::mesh::polyhedron::Polyhedron,
) -> OpsResult<Vec<Point3d>> {
    let minority = minority_faces(geom);
    let minority_set: std::collections::HashSet<usize> = minority.iter().copied().collect();
    let mut out = geom.vertex_positions().to_vec();
    for f in minority {
        let planes: Vec<_> = geom
            .face(f)
            .adjacent_face_indices()
            .into_iter()
            .filter(|g| !minority_set.contains(g))
            .map(|g| geom.face(g).plane())
            .collect::<Result<_, _>>()
            .map_err(OpError::from)?;
        let apex = planes_intersection(&planes).map_err(OpError::from)?;
        for &v in geom.face_vertices(f) {
            out[v] = apex;
        }
    }
    Ok(out)
}

// ── Rectify / Cumulate ──────────────────────────────────────────────────────

pub struct RectifyPair {
    graph: Vec<GraphEntry>,
}

impl RectifyPair {
    fn build() -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();
        for c in Classical::universe() {
            if !c.is_regular() {
                continue;
            }
            let entry = GraphEntry::new(
                classical_entry(&c),
                classical_entry(&c.with_form(ClassicalForm::Rectified)),
                EntryOpts {
                    facet: c.facet,
                    ..EntryOpts::default()
                },
            );
            if !graph.iter().any(|e| e.same_edge(&entry)) {
                graph.push(entry);
            }
        }
        Self { graph }
    }
}

pub fn rectify_pair() -> &'static RectifyPair {
    static PAIR: OnceLock<RectifyPair> = OnceLock::new();
    PAIR.get_or_init(RectifyPair::build)
}

impl OpPair for RectifyPair {
    fn left_name(&self) -> &'static str {
        "rectify"
    }

    fn right_name(&self) -> &'static str {
        "cumulate"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        None
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let n = family_sides(ctx.entry)?;
        match side {
            Side::Left => {
                // Midradius: rectification carries vertices to edge
                // midpoints, so the midsphere is the shared scale.
                let edge = forme
                    .geom
                    .edges()
                    .next()
                    .ok_or_else(|| OpError::site("empty mesh"))?;
                let scale = edge.midpoint().distance_to(&forme.geom.centroid());
                let class: Vec<usize> = (0..forme.geom.face_count()).collect();
                Ok(vec![class_pose(&forme.geom, &class, scale)?])
            }
            Side::Right => {
                let scale = forme
                    .geom
                    .vertex_position(0)
                    .distance_to(&forme.geom.centroid());
                let classes: Vec<Vec<usize>> = match ctx.entry.opts.facet {
                    Some(facet) => vec![rectified_class(&forme.geom, n, facet)?],
                    // The self-dual family: either triangle class can play
                    // the face role; the engine scores both.
                    None => vec![
                        rectified_class(&forme.geom, n, FacetKind::Face)?,
                        rectified_class(&forme.geom, n, FacetKind::Vertex)?,
                    ],
                };
                classes
                    .into_iter()
                    .map(|class| class_pose(&forme.geom, &class, scale))
                    .collect()
            }
        }
    }

    fn custom_middle(&self, ctx: &PairCtx<'_>, src_pose: &Pose) -> OpsResult<MiddleData> {
        let left_real = match ctx.side {
            Side::Left => ctx.source.geom.clone(),
            Side::Right => {
                let left_ref = Forme::load(&ctx.entry.raw_left)?;
                let pose = self
                    .poses(ctx, Side::Left, &left_ref)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| OpError::site("no pose for the regular form"))?;
                let t = Pose::align(&pose, src_pose).map_err(OpError::from)?;
                left_ref.geom.transformed(&t)
            }
        };
        let (subdivided, origins) = truncation_subdivide(&left_real)?;
        let mut data = MiddleData::plain(subdivided);
        data.origins = Some(origins);
        data.left = Some(left_real);
        Ok(data)
    }

    fn morph(&self, _ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        let origins = middle
            .origins
            .as_ref()
            .ok_or_else(|| OpError::site("rectify middle lost its provenance"))?;
        let base = middle.require(Side::Left)?;
        Ok(match side {
            Side::Left => origins
                .iter()
                .map(|&(v, _)| base.vertex_position(v))
                .collect(),
            Side::Right => origins
                .iter()
                .map(|&(v, u)| base.vertex_position(v).midpoint(&base.vertex_position(u)))
                .collect(),
        })
    }
}
