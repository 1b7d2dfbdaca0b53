//! Prism-insertion family: elongate/shorten, gyroelongate/shorten, and
//! turn.
//!
//! Elongation duplicates the ring at a cap boundary and inserts a band of
//! squares (prism) or alternating triangles (antiprism); shorten collapses
//! the band by sliding the cap back down (and unwinding the antiprism
//! twist). Turn morphs between the two band types over a pre-triangulated
//! topology.

use std::sync::OnceLock;

use crf_kernel::forme::Forme;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::geometry::transform::Transform;
use crf_kernel::mesh::cap::{Cap, CapKind, CapSearch};
use crf_kernel::mesh::facet::Facet;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::{Capstone, CapstoneKind, Elongation, Gyration, PolyhedronSpecs, Prismatic, PrismaticKind, Twist};

use crate::classify::faces_with_sides;
use crate::pair::{GraphEntry, MiddleData, OpPair, PairCtx};
use crate::types::{EntryOpts, OpError, OpsResult, Side};

/// Search matching a capstone spec's own cap.
fn search_for(spec: &Capstone) -> CapSearch {
    let kind = match spec.kind {
        CapstoneKind::Pyramid => CapKind::Pyramid,
        CapstoneKind::Cupola if spec.base == 2 => CapKind::Fastigium,
        CapstoneKind::Cupola => CapKind::Cupola,
        CapstoneKind::Rotunda | CapstoneKind::CupolaRotunda => CapKind::Rotunda,
    };
    CapSearch::kind(kind).with_base(spec.base as usize)
}

fn capstone_cap<'a>(geom: &'a Polyhedron, raw: &PolyhedronSpecs) -> OpsResult<Cap<'a>> {
    let spec = raw
        .as_capstone()
        .ok_or_else(|| OpError::site("expected a capstone entry"))?;
    let caps = Cap::find_all(geom, &search_for(spec)).map_err(OpError::from)?;
    caps.into_iter()
        .next()
        .ok_or_else(|| OpError::site(format!("no {:?} cap found", spec.kind)))
}

/// Cap on `geom` whose axis best matches `axis`.
fn cap_on_axis<'a>(
    geom: &'a Polyhedron,
    raw: &PolyhedronSpecs,
    axis: &crf_kernel::geometry::vector::Vec3,
) -> OpsResult<Cap<'a>> {
    let spec = raw
        .as_capstone()
        .ok_or_else(|| OpError::site("expected a capstone entry"))?;
    let caps = Cap::find_all(geom, &search_for(spec)).map_err(OpError::from)?;
    caps.into_iter()
        .max_by(|a, b| {
            a.axis()
                .dot(axis)
                .partial_cmp(&b.axis().dot(axis))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| OpError::site("no cap on the source axis"))
}

/// Shorten positions: the cap stays anchored (alignment is taken from its
/// frame) while everything below it rises until the band collapses; an
/// antiprism band also unwinds by the half-step that brings the two rings
/// into register.
fn collapse_band_positions(
    geom: &Polyhedron,
    cap: &Cap<'_>,
    unwind: bool,
) -> OpsResult<Vec<Point3d>> {
    let plane = cap.boundary_plane().map_err(OpError::from)?;
    let axis = plane.normal;
    let ring_centroid = Facet::centroid(cap);

    let cap_vertices: std::collections::HashSet<usize> =
        cap.all_vertices().into_iter().collect();
    // The band ring directly below the boundary.
    let mut below_ring: Vec<usize> = Vec::new();
    for &b in &cap.boundary {
        for &f in geom.vertex(b).face_indices() {
            if cap.contains_face(f) {
                continue;
            }
            for &v in geom.face_vertices(f) {
                if !cap_vertices.contains(&v) && !below_ring.contains(&v) {
                    below_ring.push(v);
                }
            }
        }
    }
    if below_ring.is_empty() {
        return Err(OpError::site("no band below the cap boundary"));
    }
    let rise: f64 = below_ring
        .iter()
        .map(|&v| -plane.signed_distance(&geom.vertex_position(v)))
        .sum::<f64>()
        / below_ring.len() as f64;

    // Unwinding angle: the half step that carries the lower ring onto the
    // boundary ring.
    let angle = if unwind {
        let b0 = geom.vertex_position(cap.boundary[0]);
        let u = (b0 - ring_centroid).rejected_from(&axis);
        below_ring
            .iter()
            .map(|&v| {
                let w = (geom.vertex_position(v) - ring_centroid).rejected_from(&axis);
                w.signed_angle_to(&u, &axis)
            })
            .min_by(|a, b| {
                a.abs()
                    .partial_cmp(&b.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let slide = Transform::rotation_about(ring_centroid, &axis, angle)
        .then(&Transform::translation(axis * rise));
    let mut out = geom.vertex_positions().to_vec();
    for (v, p) in out.iter_mut().enumerate() {
        if !cap_vertices.contains(&v) {
            *p = slide.apply(p);
        }
    }
    Ok(out)
}

fn elongation_graph(band: Elongation) -> Vec<GraphEntry> {
    let mut graph: Vec<GraphEntry> = Vec::new();
    for c in Capstone::universe() {
        if c.elongation != Elongation::None {
            continue;
        }
        let mut right = c.with_elongation(band);
        if band == Elongation::Antiprism
            && right.count == 2
            && right.kind != CapstoneKind::Pyramid
        {
            // Gyroelongating a two-cap form trades the ortho/gyro choice
            // for a handedness.
            right = right.with_twist(match c.gyrate {
                Some(Gyration::Gyro) => Twist::Right,
                _ => Twist::Left,
            });
        }
        if !right.valid() {
            continue;
        }
        let entry = GraphEntry::new(
            PolyhedronSpecs::Capstone(c),
            PolyhedronSpecs::Capstone(right),
            EntryOpts::default(),
        );
        if !graph.iter().any(|e| e.same_edge(&entry)) {
            graph.push(entry);
        }
    }
    graph
}

pub struct ElongationPair {
    band: Elongation,
    graph: Vec<GraphEntry>,
}

pub fn elongate_pair() -> &'static ElongationPair {
    static PAIR: OnceLock<ElongationPair> = OnceLock::new();
    PAIR.get_or_init(|| ElongationPair {
        band: Elongation::Prism,
        graph: elongation_graph(Elongation::Prism),
    })
}

pub fn gyroelongate_pair() -> &'static ElongationPair {
    static PAIR: OnceLock<ElongationPair> = OnceLock::new();
    PAIR.get_or_init(|| ElongationPair {
        band: Elongation::Antiprism,
        graph: elongation_graph(Elongation::Antiprism),
    })
}

impl OpPair for ElongationPair {
    fn left_name(&self) -> &'static str {
        match self.band {
            Elongation::Antiprism => "gyroelongate",
            _ => "elongate",
        }
    }

    fn right_name(&self) -> &'static str {
        "shorten"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        Some(Side::Right)
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let cap = capstone_cap(&forme.geom, ctx.entry.raw(side))?;
        Ok(vec![cap.cap_pose()])
    }

    fn morph(&self, ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        match side {
            Side::Right => Ok(middle.geom.vertex_positions().to_vec()),
            Side::Left => {
                let src_axis = self
                    .poses(ctx, ctx.side, ctx.source)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| OpError::site("source lost its cap"))?
                    .axis;
                let cap = cap_on_axis(&middle.geom, ctx.entry.raw(Side::Right), &src_axis)?;
                collapse_band_positions(&middle.geom, &cap, self.band == Elongation::Antiprism)
            }
        }
    }
}

// ── Turn (prism band ↔ antiprism band) ──────────────────────────────────────

pub struct TurnPair {
    graph: Vec<GraphEntry>,
}

impl TurnPair {
    fn build() -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();
        for p in Prismatic::universe() {
            if p.kind != PrismaticKind::Prism {
                continue;
            }
            let entry = GraphEntry::new(
                PolyhedronSpecs::Prismatic(p),
                PolyhedronSpecs::Prismatic(p.with_kind(PrismaticKind::Antiprism)),
                EntryOpts::default(),
            );
            if !graph.iter().any(|e| e.same_edge(&entry)) {
                graph.push(entry);
            }
        }
        for c in Capstone::universe() {
            if c.elongation != Elongation::Prism {
                continue;
            }
            let mut right = c.with_elongation(Elongation::Antiprism);
            if right.count == 2 && right.kind != CapstoneKind::Pyramid {
                right = right.with_twist(match c.gyrate {
                    Some(Gyration::Gyro) => Twist::Right,
                    _ => Twist::Left,
                });
            }
            if !right.valid() {
                continue;
            }
            let entry = GraphEntry::new(
                PolyhedronSpecs::Capstone(c),
                PolyhedronSpecs::Capstone(right),
                EntryOpts::default(),
            );
            if !graph.iter().any(|e| e.same_edge(&entry)) {
                graph.push(entry);
            }
        }
        Self { graph }
    }

    fn ring_size(raw: &PolyhedronSpecs) -> OpsResult<usize> {
        match raw {
            PolyhedronSpecs::Prismatic(p) => Ok(p.base as usize),
            PolyhedronSpecs::Capstone(c) => Ok(c.boundary_sides()),
            _ => Err(OpError::site("turn entry is neither prismatic nor capstone")),
        }
    }
}

pub fn turn_pair() -> &'static TurnPair {
    static PAIR: OnceLock<TurnPair> = OnceLock::new();
    PAIR.get_or_init(TurnPair::build)
}

impl OpPair for TurnPair {
    fn left_name(&self) -> &'static str {
        "turn"
    }

    fn right_name(&self) -> &'static str {
        "turn"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        None
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        match ctx.entry.raw(side) {
            PolyhedronSpecs::Prismatic(p) => {
                let ring = faces_with_sides(&forme.geom, p.base as usize);
                let face = forme
                    .geom
                    .face(*ring.first().ok_or_else(|| OpError::site("prism lost its ring face"))?);
                let v0 = forme.geom.vertex_position(face.vertex_indices()[0]);
                Ok(vec![Pose::new(
                    face.centroid(),
                    face.edge_length(),
                    face.normal(),
                    v0 - face.centroid(),
                )])
            }
            raw => {
                let cap = capstone_cap(&forme.geom, raw)?;
                Ok(vec![cap.cap_pose()])
            }
        }
    }

    fn custom_middle(&self, ctx: &PairCtx<'_>, src_pose: &Pose) -> OpsResult<MiddleData> {
        let align_in = |pair_side: Side| -> OpsResult<Polyhedron> {
            if pair_side == ctx.side {
                return Ok(ctx.source.geom.clone());
            }
            let reference = Forme::load(ctx.entry.raw(pair_side))?;
            let pose = self
                .poses(ctx, pair_side, &reference)?
                .into_iter()
                .next()
                .ok_or_else(|| OpError::site("no pose for turn reference"))?;
            let t = Pose::align(&pose, src_pose).map_err(OpError::from)?;
            Ok(reference.geom.transformed(&t))
        };
        let prism_form = align_in(Side::Left)?;
        let antiprism_form = align_in(Side::Right)?;

        let map = turn_vertex_map(
            &prism_form,
            &antiprism_form,
            src_pose,
            Self::ring_size(&ctx.entry.raw_left)?,
        )?;

        // Split band squares along the diagonal that exists on the
        // antiprism side.
        let axis = src_pose
            .axis
            .normalized()
            .ok_or_else(|| OpError::site("degenerate turn axis"))?;
        let mut faces: Vec<Vec<usize>> = Vec::new();
        for face in prism_form.face_lists() {
            if face.len() != 4 {
                faces.push(face.clone());
                continue;
            }
            let normal = crf_kernel::geometry::plane::Plane::best_fit(
                &face
                    .iter()
                    .map(|&v| prism_form.vertex_position(v))
                    .collect::<Vec<_>>(),
            )
            .map_err(OpError::from)?
            .normal;
            if normal.dot(&axis).abs() > 0.3 {
                faces.push(face.clone());
                continue;
            }
            let (a, b, c, d) = (face[0], face[1], face[2], face[3]);
            if antiprism_form.has_edge(map[a], map[c]) {
                faces.push(vec![a, b, c]);
                faces.push(vec![a, c, d]);
            } else if antiprism_form.has_edge(map[b], map[d]) {
                faces.push(vec![b, c, d]);
                faces.push(vec![b, d, a]);
            } else {
                return Err(OpError::site("band square matches neither antiprism diagonal"));
            }
        }

        let mut data = MiddleData::plain(prism_form.with_faces(faces));
        data.left = Some(prism_form);
        data.right = Some(antiprism_form);
        data.vertex_map = Some(map);
        Ok(data)
    }

    fn morph(&self, _ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        match side {
            Side::Left => Ok(middle.geom.vertex_positions().to_vec()),
            Side::Right => {
                let map = middle
                    .vertex_map
                    .as_ref()
                    .ok_or_else(|| OpError::site("turn middle lost its vertex map"))?;
                let target = middle.require(Side::Right)?;
                Ok(map.iter().map(|&m| target.vertex_position(m)).collect())
            }
        }
    }
}

/// Correspondence between a prism-banded and antiprism-banded realization:
/// the anchored part matches by proximity, the far part by proximity after
/// the half-step ring rotation whose direction fits best.
fn turn_vertex_map(
    from: &Polyhedron,
    to: &Polyhedron,
    src_pose: &Pose,
    ring: usize,
) -> OpsResult<Vec<usize>> {
    let axis = src_pose
        .axis
        .normalized()
        .ok_or_else(|| OpError::site("degenerate turn axis"))?;
    let tol = 0.3;

    let nearest = |p: &Point3d| -> (usize, f64) {
        let mut best = (0usize, f64::MAX);
        for (i, q) in to.vertex_positions().iter().enumerate() {
            let d = p.distance_to(q);
            if d < best.1 {
                best = (i, d);
            }
        }
        best
    };

    let mut map: Vec<Option<usize>> = vec![None; from.vertex_count()];
    let mut unmatched: Vec<usize> = Vec::new();
    for (v, p) in from.vertex_positions().iter().enumerate() {
        let (i, d) = nearest(p);
        if d < tol {
            map[v] = Some(i);
        } else {
            unmatched.push(v);
        }
    }

    let half_step = std::f64::consts::PI / ring as f64;
    let mut best: Option<(f64, Vec<(usize, usize)>)> = None;
    for sign in [1.0, -1.0] {
        let rotation = Transform::rotation_about(src_pose.origin, &axis, sign * half_step);
        let mut total = 0.0;
        let mut assignment = Vec::new();
        for &v in &unmatched {
            let p = rotation.apply(&from.vertex_position(v));
            let (i, d) = nearest(&p);
            total += d;
            assignment.push((v, i));
        }
        if best.as_ref().map(|(b, _)| total < *b).unwrap_or(true) {
            best = Some((total, assignment));
        }
    }
    if let Some((total, assignment)) = best {
        if total > tol * (unmatched.len().max(1) as f64) {
            return Err(OpError::site("turn correspondence did not converge"));
        }
        for (v, i) in assignment {
            map[v] = Some(i);
        }
    }
    map.into_iter()
        .enumerate()
        .map(|(v, m)| m.ok_or_else(|| OpError::site(format!("vertex {v} unmatched in turn"))))
        .collect()
}
