//! Cut-and-paste family: augment/diminish and gyrate.
//!
//! One pair covers every augmentable family (capstones over prisms and
//! antiprisms, second caps, augmented prisms and classicals, diminished
//! icosahedra and rhombicosidodecahedra). Site choices are validated by
//! trial surgery against the reference geometry of the destination, so an
//! ortho/gyro or meta/para choice is never guessed from a convention.

use std::sync::OnceLock;

use crf_kernel::catalog::johnson;
use crf_kernel::forme::Forme;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::geometry::transform::Transform;
use crf_kernel::mesh::cap::{Cap, CapKind, CapSearch, Peak};
use crf_kernel::mesh::compose::{attach, cap_solid, remove_cap};
use crf_kernel::mesh::facet::Facet;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::{
    Align, Capstone, CapstoneKind, Composite, CompositeBase, Elongation, Gyration,
    PolyhedronSpecs, Prismatic, PrismaticKind,
};

use crate::classify::faces_with_sides;
use crate::pair::{GraphEntry, MiddleData, OpPair, PairCtx};
use crate::types::{EntryOpts, OpError, OpsResult, Side};

fn cap_kind_of(kind: CapstoneKind, base: u8) -> CapKind {
    match kind {
        CapstoneKind::Pyramid => CapKind::Pyramid,
        CapstoneKind::Cupola if base == 2 => CapKind::Fastigium,
        CapstoneKind::Cupola => CapKind::Cupola,
        CapstoneKind::Rotunda | CapstoneKind::CupolaRotunda => CapKind::Rotunda,
    }
}

/// Cap base polygon implied by an entry's cap kind and mated face.
fn cap_base(kind: CapKind, face_sides: usize) -> usize {
    match kind {
        CapKind::Pyramid => face_sides,
        CapKind::Cupola | CapKind::Rotunda => face_sides / 2,
        CapKind::Fastigium => 2,
    }
}

/// The attachable piece for a cap kind: (solid, mating face index).
fn cap_piece(kind: CapKind, base: usize) -> OpsResult<(Polyhedron, usize)> {
    Ok(match kind {
        CapKind::Pyramid => (johnson::pyramid(base), 0),
        CapKind::Cupola => (johnson::cupola(base), 1),
        CapKind::Rotunda => {
            let r = johnson::rotunda().map_err(OpError::from)?;
            let mating = r.face_count() - 1;
            (r, mating)
        }
        CapKind::Fastigium => (johnson::prism(3), 2),
    })
}

fn entry_cap(opts: &EntryOpts) -> OpsResult<(CapKind, usize)> {
    let kind = opts
        .cap
        .ok_or_else(|| OpError::site("cut-and-paste entry lacks a cap kind"))?;
    let sides = opts
        .face_sides
        .ok_or_else(|| OpError::site("cut-and-paste entry lacks a face size"))?;
    Ok((kind, cap_base(kind, sides)))
}

fn cap_search(kind: CapKind, base: usize) -> CapSearch {
    CapSearch::kind(kind).with_base(base)
}

/// Caps on `geom` matching the entry, sorted by how well their axis fits.
fn cap_by_axis<'a>(
    geom: &'a Polyhedron,
    kind: CapKind,
    base: usize,
    axis: &crf_kernel::geometry::vector::Vec3,
) -> OpsResult<Cap<'a>> {
    let caps = Cap::find_all(geom, &cap_search(kind, base)).map_err(OpError::from)?;
    caps.into_iter()
        .max_by(|a, b| {
            a.axis()
                .dot(axis)
                .partial_cmp(&b.axis().dot(axis))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| OpError::site("no cap along the expected axis"))
}

// ── Augment / Diminish ──────────────────────────────────────────────────────

pub struct AugmentPair {
    graph: Vec<GraphEntry>,
}

impl AugmentPair {
    fn push(graph: &mut Vec<GraphEntry>, entry: GraphEntry) {
        if !graph.iter().any(|e| e.same_edge(&entry)) {
            graph.push(entry);
        }
    }

    fn build() -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();

        // Capstones over their bands: diminishing a banded single-cap solid
        // leaves the bare prism or antiprism.
        for c in Capstone::universe() {
            if c.count != 1 || c.elongation == Elongation::None {
                continue;
            }
            // The pentagonal antiprism case belongs to the icosahedron
            // chain below, where the meta/para choice lives.
            if c.kind == CapstoneKind::Pyramid
                && c.base == 5
                && c.elongation == Elongation::Antiprism
            {
                continue;
            }
            let band_kind = match c.elongation {
                Elongation::Prism => PrismaticKind::Prism,
                _ => PrismaticKind::Antiprism,
            };
            let left = Prismatic {
                base: c.boundary_sides() as u8,
                kind: band_kind,
            };
            let opts = EntryOpts {
                cap: Some(cap_kind_of(c.kind, c.base)),
                face_sides: Some(c.boundary_sides()),
                ..EntryOpts::default()
            };
            Self::push(
                &mut graph,
                GraphEntry::new(
                    PolyhedronSpecs::Prismatic(left),
                    PolyhedronSpecs::Capstone(c),
                    opts,
                ),
            );
        }

        // Second caps: a one-cap solid takes another cap on its open base.
        for c in Capstone::universe() {
            if c.count != 2 {
                continue;
            }
            // The icosahedron fold is owned by the icosahedron chain.
            if c.kind == CapstoneKind::Pyramid
                && c.base == 5
                && c.elongation == Elongation::Antiprism
            {
                continue;
            }
            let lefts: Vec<(Capstone, CapstoneKind)> = match c.kind {
                CapstoneKind::CupolaRotunda => vec![
                    (
                        Capstone::new(5, CapstoneKind::Cupola, 1, c.elongation),
                        CapstoneKind::Rotunda,
                    ),
                    (
                        Capstone::new(5, CapstoneKind::Rotunda, 1, c.elongation),
                        CapstoneKind::Cupola,
                    ),
                ],
                kind => vec![(Capstone::new(c.base, kind, 1, c.elongation), kind)],
            };
            for (left, attached) in lefts {
                if !left.valid() {
                    continue;
                }
                let opts = EntryOpts {
                    cap: Some(cap_kind_of(attached, c.base)),
                    face_sides: Some(c.boundary_sides()),
                    gyrate: c.gyrate,
                    twist: c.twist,
                    ..EntryOpts::default()
                };
                Self::push(
                    &mut graph,
                    GraphEntry::new(
                        PolyhedronSpecs::Capstone(left),
                        PolyhedronSpecs::Capstone(c),
                        opts,
                    ),
                );
            }
        }

        // The icosahedron chain: cap by cap down to J63, plus the augment
        // of the central triangle (J64).
        {
            let pyramid5 = EntryOpts {
                cap: Some(CapKind::Pyramid),
                face_sides: Some(5),
                ..EntryOpts::default()
            };
            let dim = |d: u8, align: Option<Align>| {
                let mut c = Composite::diminished(CompositeBase::Icosahedron, d);
                if let Some(a) = align {
                    c = c.with_align(a);
                }
                PolyhedronSpecs::Composite(c)
            };
            Self::push(
                &mut graph,
                GraphEntry::new(dim(1, None), dim(0, None), pyramid5),
            );
            Self::push(
                &mut graph,
                GraphEntry::new(
                    dim(2, Some(Align::Para)),
                    dim(1, None),
                    EntryOpts {
                        align: Some(Align::Para),
                        ..pyramid5
                    },
                ),
            );
            Self::push(
                &mut graph,
                GraphEntry::new(
                    dim(2, Some(Align::Meta)),
                    dim(1, None),
                    EntryOpts {
                        align: Some(Align::Meta),
                        ..pyramid5
                    },
                ),
            );
            Self::push(
                &mut graph,
                GraphEntry::new(dim(3, None), dim(2, Some(Align::Meta)), pyramid5),
            );
            let j63 = Composite::diminished(CompositeBase::Icosahedron, 3);
            Self::push(
                &mut graph,
                GraphEntry::new(
                    PolyhedronSpecs::Composite(j63),
                    PolyhedronSpecs::Composite(j63.with_augmented(1)),
                    EntryOpts {
                        cap: Some(CapKind::Pyramid),
                        face_sides: Some(3),
                        ..EntryOpts::default()
                    },
                ),
            );
        }

        // Augmented prisms, classicals, and the rhombicosidodecahedron
        // diminish chains.
        for right in Composite::universe() {
            let base = right.base;
            if base == CompositeBase::Icosahedron {
                continue;
            }
            let cap_kind = match base.augment_cap() {
                CapstoneKind::Pyramid => CapKind::Pyramid,
                _ => CapKind::Cupola,
            };
            if right.augmented > 0 {
                let left = reduced(right, |c| c.with_augmented(c.augmented - 1));
                if let Some(left) = left {
                    Self::push(
                        &mut graph,
                        GraphEntry::new(
                            left,
                            PolyhedronSpecs::Composite(right),
                            EntryOpts {
                                cap: Some(cap_kind),
                                face_sides: Some(base.augment_face_sides()),
                                align: right.align,
                                ..EntryOpts::default()
                            },
                        ),
                    );
                }
            }
            if right.diminished > 0 && base == CompositeBase::Rhombicosidodecahedron {
                // Diminished forms are the LEFT (smaller) side; augmenting
                // them restores a cupola, upright or gyrated.
                let ortho_parent = reduced(right, |c| c.with_diminished(c.diminished - 1));
                if let Some(parent) = ortho_parent {
                    Self::push(
                        &mut graph,
                        GraphEntry::new(
                            PolyhedronSpecs::Composite(right),
                            parent,
                            EntryOpts {
                                cap: Some(CapKind::Cupola),
                                face_sides: Some(10),
                                gyrate: Some(Gyration::Ortho),
                                align: right.align,
                                ..EntryOpts::default()
                            },
                        ),
                    );
                }
                let gyro_parent = reduced(right, |c| {
                    c.with_diminished(c.diminished - 1).with_gyrate(c.gyrate + 1)
                });
                if let Some(parent) = gyro_parent {
                    Self::push(
                        &mut graph,
                        GraphEntry::new(
                            PolyhedronSpecs::Composite(right),
                            parent,
                            EntryOpts {
                                cap: Some(CapKind::Cupola),
                                face_sides: Some(10),
                                gyrate: Some(Gyration::Gyro),
                                align: right.align,
                                ..EntryOpts::default()
                            },
                        ),
                    );
                }
            }
        }

        Self { graph }
    }
}

/// A composite with one modification undone; alignment is refilled with
/// the meta placement when the survivors still need one, and an untouched
/// base collapses to its own specs.
fn reduced(c: Composite, f: impl Fn(Composite) -> Composite) -> Option<PolyhedronSpecs> {
    let mut r = f(c);
    if r.modification_count() == 0 {
        return Some(r.base.specs());
    }
    if !r.valid() && r.align.is_none() {
        r = r.with_align(c.align.unwrap_or(Align::Meta));
    }
    if !r.valid() {
        return None;
    }
    Some(PolyhedronSpecs::Composite(r))
}

pub fn augment_pair() -> &'static AugmentPair {
    static PAIR: OnceLock<AugmentPair> = OnceLock::new();
    PAIR.get_or_init(AugmentPair::build)
}

impl AugmentPair {
    /// Pick (and trial-validate) the face an augmentation mates with.
    fn resolve_target_face(&self, ctx: &PairCtx<'_>, forme: &Forme) -> OpsResult<usize> {
        let (kind, base) = entry_cap(&ctx.entry.opts)?;
        let sides = ctx.entry.opts.face_sides.unwrap_or(base);
        let candidates: Vec<usize> = match ctx.options.face {
            Some(f) if f < forme.geom.face_count() => vec![f],
            Some(f) => {
                return Err(OpError::site(format!("face {f} out of range")));
            }
            None => faces_with_sides(&forme.geom, sides),
        };
        let (piece, mating) = cap_piece(kind, base)?;
        let target = Forme::load(ctx.entry.raw(Side::Right))?;
        for f in candidates {
            if forme.geom.face_vertices(f).len() != sides {
                continue;
            }
            for offset in [0usize, 1] {
                if let Ok(trial) = attach(&forme.geom, f, &piece, mating, offset) {
                    if trial.is_same(&target.geom) {
                        return Ok(f);
                    }
                }
            }
        }
        Err(OpError::site(format!(
            "no {sides}-gon face of the {} takes this augment",
            forme.canonical_name()
        )))
    }

    /// Pick (and trial-validate) the cap a diminution removes.
    fn resolve_source_cap<'a>(
        &self,
        ctx: &PairCtx<'_>,
        geom: &'a Polyhedron,
    ) -> OpsResult<Cap<'a>> {
        let (kind, base) = entry_cap(&ctx.entry.opts)?;
        let caps = Cap::find_all(geom, &cap_search(kind, base)).map_err(OpError::from)?;
        if let Some(v) = ctx.options.vertex {
            return caps
                .into_iter()
                .find(|c| c.peak == Peak::Vertex(v))
                .ok_or_else(|| OpError::site(format!("no cap peaked at vertex {v}")));
        }
        if let Some(f) = ctx.options.face {
            return caps
                .into_iter()
                .find(|c| c.peak == Peak::Face(f))
                .ok_or_else(|| OpError::site(format!("no cap peaked at face {f}")));
        }
        let target = Forme::load(ctx.entry.raw(Side::Left))?;
        caps.into_iter()
            .find(|cap| remove_cap(geom, cap).is_same(&target.geom))
            .ok_or_else(|| OpError::site("no removable cap matches this entry"))
    }
}

impl OpPair for AugmentPair {
    fn left_name(&self) -> &'static str {
        "augment"
    }

    fn right_name(&self) -> &'static str {
        "diminish"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        Some(Side::Right)
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let is_source = side == ctx.side;
        match side {
            Side::Left => {
                if is_source {
                    let f = self.resolve_target_face(ctx, forme)?;
                    let face = forme.geom.face(f);
                    let v0 = forme.geom.vertex_position(face.vertex_indices()[0]);
                    Ok(vec![Pose::new(
                        face.centroid(),
                        face.edge_length(),
                        face.normal(),
                        v0 - face.centroid(),
                    )])
                } else {
                    // The scar face of the diminished reference: every
                    // matching face, every ring phase; the engine scores.
                    let sides = ctx
                        .entry
                        .opts
                        .face_sides
                        .ok_or_else(|| OpError::site("entry lacks a face size"))?;
                    let mut out = Vec::new();
                    for f in faces_with_sides(&forme.geom, sides) {
                        let face = forme.geom.face(f);
                        for &v in face.vertex_indices() {
                            out.push(Pose::new(
                                face.centroid(),
                                face.edge_length(),
                                face.normal(),
                                forme.geom.vertex_position(v) - face.centroid(),
                            ));
                        }
                    }
                    Ok(out)
                }
            }
            Side::Right => {
                if is_source {
                    let cap = self.resolve_source_cap(ctx, &forme.geom)?;
                    Ok(vec![cap.cap_pose()])
                } else {
                    let (kind, base) = entry_cap(&ctx.entry.opts)?;
                    let caps =
                        Cap::find_all(&forme.geom, &cap_search(kind, base)).map_err(OpError::from)?;
                    let mut out = Vec::new();
                    for cap in &caps {
                        let origin = Facet::centroid(cap);
                        let scale = cap.cap_pose().scale;
                        for &b in &cap.boundary {
                            out.push(Pose::new(
                                origin,
                                scale,
                                cap.axis(),
                                forme.geom.vertex_position(b) - origin,
                            ));
                        }
                    }
                    Ok(out)
                }
            }
        }
    }

    fn morph(&self, ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        match side {
            Side::Right => Ok(middle.geom.vertex_positions().to_vec()),
            Side::Left => {
                // Flatten the attached cap into its boundary plane.
                let axis = self
                    .poses(ctx, ctx.side, ctx.source)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| OpError::site("source lost its site"))?
                    .axis;
                let (kind, base) = entry_cap(&ctx.entry.opts)?;
                let cap = cap_by_axis(&middle.geom, kind, base, &axis)?;
                let plane = cap.boundary_plane().map_err(OpError::from)?;
                let mut out = middle.geom.vertex_positions().to_vec();
                for &v in &cap.inner {
                    out[v] = plane.project(&out[v]);
                }
                Ok(out)
            }
        }
    }
}

// ── Gyrate ──────────────────────────────────────────────────────────────────

pub struct GyratePair {
    graph: Vec<GraphEntry>,
}

impl GyratePair {
    fn build() -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();
        let mut push = |entry: GraphEntry| {
            if !graph.iter().any(|e| e.same_edge(&entry)) {
                graph.push(entry);
            }
        };

        // Two-cap capstones: ortho and gyro forms of one solid.
        for c in Capstone::universe() {
            if c.gyrate != Some(Gyration::Ortho) {
                continue;
            }
            let gyro = c.with_gyrate(Gyration::Gyro);
            if !gyro.valid() {
                continue;
            }
            push(GraphEntry::new(
                PolyhedronSpecs::Capstone(c),
                PolyhedronSpecs::Capstone(gyro),
                EntryOpts {
                    cap: Some(cap_kind_of(c.kind, c.base)),
                    face_sides: Some(c.boundary_sides()),
                    ..EntryOpts::default()
                },
            ));
        }

        // Rhombicosidodecahedra: turning one cupola in place.
        for right in Composite::universe() {
            if right.base != CompositeBase::Rhombicosidodecahedron || right.gyrate == 0 {
                continue;
            }
            if let Some(left) = reduced(right, |c| c.with_gyrate(c.gyrate - 1)) {
                push(GraphEntry::new(
                    left,
                    PolyhedronSpecs::Composite(right),
                    EntryOpts {
                        cap: Some(CapKind::Cupola),
                        face_sides: Some(10),
                        align: right.align,
                        ..EntryOpts::default()
                    },
                ));
            }
        }

        Self { graph }
    }

    /// The cap to rotate: given explicitly, or the first whose trial
    /// gyration produces the other side's solid.
    fn resolve_cap<'a>(&self, ctx: &PairCtx<'_>, geom: &'a Polyhedron) -> OpsResult<Cap<'a>> {
        let (kind, base) = entry_cap(&ctx.entry.opts)?;
        let caps = Cap::find_all(geom, &cap_search(kind, base)).map_err(OpError::from)?;
        if let Some(f) = ctx.options.face {
            return caps
                .into_iter()
                .find(|c| c.peak == Peak::Face(f))
                .ok_or_else(|| OpError::site(format!("no cap peaked at face {f}")));
        }
        let target = Forme::load(ctx.entry.raw(ctx.side.opposite()))?;
        for cap in &caps {
            let piece = cap_solid(geom, cap);
            let removed = remove_cap(geom, cap);
            let scar = removed.face_count() - 1;
            let mating = piece.face_count() - 1;
            for offset in [1usize, 0] {
                if let Ok(turned) = attach(&removed, scar, &piece, mating, offset) {
                    if !turned.is_same(geom) && turned.is_same(&target.geom) {
                        return self::first_cap_at(geom, kind, base, &cap.axis());
                    }
                }
            }
        }
        Err(OpError::site("no cap gyrates into this entry"))
    }
}

fn first_cap_at<'a>(
    geom: &'a Polyhedron,
    kind: CapKind,
    base: usize,
    axis: &crf_kernel::geometry::vector::Vec3,
) -> OpsResult<Cap<'a>> {
    cap_by_axis(geom, kind, base, axis)
}

pub fn gyrate_pair() -> &'static GyratePair {
    static PAIR: OnceLock<GyratePair> = OnceLock::new();
    PAIR.get_or_init(GyratePair::build)
}

/// Duplicate the boundary ring of a cap so the cap can rotate freely:
/// cap faces reference fresh copies of the ring vertices.
fn split_cap_ring(geom: &Polyhedron, cap: &Cap<'_>) -> (Polyhedron, Vec<usize>) {
    let mut positions = geom.vertex_positions().to_vec();
    let mut copy_of = std::collections::HashMap::new();
    for &b in &cap.boundary {
        copy_of.insert(b, positions.len());
        positions.push(geom.vertex_position(b));
    }
    let faces: Vec<Vec<usize>> = geom
        .face_lists()
        .iter()
        .enumerate()
        .map(|(fi, face)| {
            if cap.contains_face(fi) {
                face.iter()
                    .map(|v| copy_of.get(v).copied().unwrap_or(*v))
                    .collect()
            } else {
                face.clone()
            }
        })
        .collect();
    let mut moving: Vec<usize> = cap.inner.clone();
    moving.extend(copy_of.values().copied());
    (Polyhedron::new(positions, faces), moving)
}

impl OpPair for GyratePair {
    fn left_name(&self) -> &'static str {
        "gyrate"
    }

    fn right_name(&self) -> &'static str {
        "gyrate"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        None
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        if side == ctx.side {
            let cap = self.resolve_cap(ctx, &forme.geom)?;
            Ok(vec![cap.cap_pose()])
        } else {
            let (kind, base) = entry_cap(&ctx.entry.opts)?;
            let caps = Cap::find_all(&forme.geom, &cap_search(kind, base)).map_err(OpError::from)?;
            let mut out = Vec::new();
            for cap in &caps {
                let origin = Facet::centroid(cap);
                let scale = cap.cap_pose().scale;
                for &b in &cap.boundary {
                    out.push(Pose::new(
                        origin,
                        scale,
                        cap.axis(),
                        forme.geom.vertex_position(b) - origin,
                    ));
                }
            }
            Ok(out)
        }
    }

    fn custom_middle(&self, ctx: &PairCtx<'_>, _src_pose: &Pose) -> OpsResult<MiddleData> {
        let cap = self.resolve_cap(ctx, &ctx.source.geom)?;
        let axis = cap.axis();
        let center = Facet::centroid(&cap);
        let step = 2.0 * std::f64::consts::PI / cap.boundary.len() as f64;
        let (split, moving) = split_cap_ring(&ctx.source.geom, &cap);

        let turn = Transform::rotation_about(center, &axis, step);
        let mut alt = split.vertex_positions().to_vec();
        for &v in &moving {
            alt[v] = turn.apply(&alt[v]);
        }

        let mut data = MiddleData::plain(split);
        data.alt_positions = Some(alt);
        Ok(data)
    }

    fn morph(&self, ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        if side == ctx.side {
            Ok(middle.geom.vertex_positions().to_vec())
        } else {
            middle
                .alt_positions
                .clone()
                .ok_or_else(|| OpError::site("gyrate middle lost its rotated positions"))
        }
    }
}
