//! Resize family: expand/contract, snub/contract, twist, and dual.
//!
//! All of these relate a regular solid to its cantellated or snub form by
//! rigid whole-face motion. The collapse positions are derived from the two
//! aligned reference solids (matched corners), never from empirical
//! constants. The dual rides the same machinery with the cantellated form
//! as its middle realization.

use std::sync::OnceLock;

use crf_kernel::forme::Forme;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::{Classical, ClassicalForm, FacetKind, PolyhedronSpecs, Twist};

use crate::classify::{cantellated_class, class_pose, contract_positions, snub_class};
use crate::pair::{GraphEntry, MiddleData, OpPair, PairCtx, misfit};
use crate::types::{EntryOpts, OpError, OpsResult, Side};

fn family_sides(entry: &GraphEntry) -> OpsResult<usize> {
    entry
        .raw_left
        .as_classical()
        .map(|c| c.family.face_sides())
        .ok_or_else(|| OpError::site("resize entry is not classical"))
}

/// Frame anchored on a regular solid's vertices rather than its faces.
fn vertex_frame(geom: &Polyhedron, scale: f64) -> OpsResult<Pose> {
    let center = geom.centroid();
    let v0 = geom.vertex_position(0);
    let nearest = geom
        .vertex_positions()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 0)
        .min_by(|(_, a), (_, b)| {
            a.distance_to(&v0)
                .partial_cmp(&b.distance_to(&v0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(_, p)| *p)
        .ok_or_else(|| OpError::site("vertex frame needs two vertices"))?;
    Ok(Pose::new(center, scale, v0 - center, nearest - center))
}

// ── Expand / Snub (shared shape) ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizeKind {
    Expand,
    Snub,
}

pub struct ResizePair {
    kind: ResizeKind,
    graph: Vec<GraphEntry>,
}

impl ResizePair {
    fn build(kind: ResizeKind) -> Self {
        let mut graph: Vec<GraphEntry> = Vec::new();
        for c in Classical::universe() {
            if !c.is_regular() {
                continue;
            }
            let entries: Vec<GraphEntry> = match kind {
                ResizeKind::Expand => vec![GraphEntry::new(
                    PolyhedronSpecs::Classical(c),
                    PolyhedronSpecs::Classical(c.with_form(ClassicalForm::Cantellated)),
                    EntryOpts {
                        facet: c.facet,
                        ..EntryOpts::default()
                    },
                )],
                ResizeKind::Snub => {
                    if c.family == crf_types::Family::Tetrahedral {
                        // The tetrahedral snub folds onto the icosahedron
                        // and is not part of the graph.
                        Vec::new()
                    } else {
                        Twist::ALL
                            .iter()
                            .map(|&twist| {
                                GraphEntry::new(
                                    PolyhedronSpecs::Classical(c),
                                    PolyhedronSpecs::Classical(
                                        c.with_form(ClassicalForm::Snub).with_twist(twist),
                                    ),
                                    EntryOpts {
                                        facet: c.facet,
                                        twist: Some(twist),
                                        ..EntryOpts::default()
                                    },
                                )
                            })
                            .collect()
                    }
                }
            };
            for entry in entries {
                if !graph.iter().any(|e| e.same_edge(&entry)) {
                    graph.push(entry);
                }
            }
        }
        Self { kind, graph }
    }

    fn right_class(
        &self,
        geom: &Polyhedron,
        sides: usize,
        facet: FacetKind,
    ) -> OpsResult<Vec<usize>> {
        match self.kind {
            ResizeKind::Expand => cantellated_class(geom, sides, facet),
            ResizeKind::Snub => snub_class(geom, sides, facet),
        }
    }
}

pub fn expand_pair() -> &'static ResizePair {
    static PAIR: OnceLock<ResizePair> = OnceLock::new();
    PAIR.get_or_init(|| ResizePair::build(ResizeKind::Expand))
}

pub fn snub_pair() -> &'static ResizePair {
    static PAIR: OnceLock<ResizePair> = OnceLock::new();
    PAIR.get_or_init(|| ResizePair::build(ResizeKind::Snub))
}

impl OpPair for ResizePair {
    fn left_name(&self) -> &'static str {
        match self.kind {
            ResizeKind::Expand => "expand",
            ResizeKind::Snub => "snub",
        }
    }

    fn right_name(&self) -> &'static str {
        "contract"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        Some(Side::Right)
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let n = family_sides(ctx.entry)?;
        let scale = forme.edge_length();
        match side {
            Side::Left => {
                let class: Vec<usize> = (0..forme.geom.face_count()).collect();
                Ok(vec![class_pose(&forme.geom, &class, scale)?])
            }
            Side::Right => match ctx.entry.opts.facet {
                Some(facet) => Ok(vec![class_pose(
                    &forme.geom,
                    &self.right_class(&forme.geom, n, facet)?,
                    scale,
                )?]),
                // Tetrahedral family: either triangle class faces the
                // source; the engine scores both.
                None => Ok(vec![
                    class_pose(
                        &forme.geom,
                        &self.right_class(&forme.geom, n, FacetKind::Face)?,
                        scale,
                    )?,
                    class_pose(
                        &forme.geom,
                        &self.right_class(&forme.geom, n, FacetKind::Vertex)?,
                        scale,
                    )?,
                ]),
            },
        }
    }

    fn morph(&self, ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        match side {
            Side::Right => Ok(middle.geom.vertex_positions().to_vec()),
            Side::Left => {
                let n = family_sides(ctx.entry)?;
                let facet = ctx.entry.opts.facet.unwrap_or(FacetKind::Face);
                let class = self.right_class(&middle.geom, n, facet)?;
                contract_positions(&middle.geom, &class, middle.require(Side::Left)?)
            }
        }
    }
}

// ── Twist (cantellated ↔ snub) ──────────────────────────────────────────────

pub struct TwistPair {
    graph: Vec<GraphEntry>,
}

impl TwistPair {
    fn build() -> Self {
        let mut graph = Vec::new();
        for c in Classical::universe() {
            if !c.is_cantellated() || c.family == crf_types::Family::Tetrahedral {
                continue;
            }
            for twist in Twist::ALL {
                graph.push(GraphEntry::new(
                    PolyhedronSpecs::Classical(c),
                    PolyhedronSpecs::Classical(
                        c.with_form(ClassicalForm::Snub).with_twist(twist),
                    ),
                    EntryOpts {
                        twist: Some(twist),
                        ..EntryOpts::default()
                    },
                ));
            }
        }
        Self { graph }
    }
}

pub fn twist_pair() -> &'static TwistPair {
    static PAIR: OnceLock<TwistPair> = OnceLock::new();
    PAIR.get_or_init(TwistPair::build)
}

impl TwistPair {
    fn classes(geom: &Polyhedron, sides: usize, form: ClassicalForm) -> OpsResult<Vec<usize>> {
        match form {
            ClassicalForm::Cantellated => cantellated_class(geom, sides, FacetKind::Face),
            _ => snub_class(geom, sides, FacetKind::Face),
        }
    }

    /// Vertex correspondence between two class-aligned realizations: each
    /// vertex belongs to exactly one class face, matched by normal; within
    /// the matched face, corners pair by proximity.
    fn vertex_map(
        from: &Polyhedron,
        from_class: &[usize],
        to: &Polyhedron,
        to_class: &[usize],
    ) -> OpsResult<Vec<usize>> {
        let mut map: Vec<Option<usize>> = vec![None; from.vertex_count()];
        for &f in from_class {
            let normal = from.face(f).normal();
            let matched = to_class
                .iter()
                .copied()
                .max_by(|&a, &b| {
                    to.face(a)
                        .normal()
                        .dot(&normal)
                        .partial_cmp(&to.face(b).normal().dot(&normal))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .ok_or_else(|| OpError::site("twist target class is empty"))?;
            for &v in from.face_vertices(f) {
                let p = from.vertex_position(v);
                let nearest = to
                    .face_vertices(matched)
                    .iter()
                    .copied()
                    .min_by(|&a, &b| {
                        to.vertex_position(a)
                            .distance_to(&p)
                            .partial_cmp(&to.vertex_position(b).distance_to(&p))
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .ok_or_else(|| OpError::site("twist target face is empty"))?;
                map[v] = Some(nearest);
            }
        }
        map.into_iter()
            .enumerate()
            .map(|(v, m)| m.ok_or_else(|| OpError::site(format!("vertex {v} outside face class"))))
            .collect()
    }
}

impl OpPair for TwistPair {
    fn left_name(&self) -> &'static str {
        "twist"
    }

    fn right_name(&self) -> &'static str {
        "twist"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        None
    }

    fn poses(&self, ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let n = family_sides(ctx.entry)?;
        let form = match side {
            Side::Left => ClassicalForm::Cantellated,
            Side::Right => ClassicalForm::Snub,
        };
        let class = Self::classes(&forme.geom, n, form)?;
        Ok(vec![class_pose(&forme.geom, &class, forme.edge_length())?])
    }

    fn custom_middle(&self, ctx: &PairCtx<'_>, src_pose: &Pose) -> OpsResult<MiddleData> {
        let n = family_sides(ctx.entry)?;
        let align_in = |pair_side: Side| -> OpsResult<Polyhedron> {
            if pair_side == ctx.side {
                return Ok(ctx.source.geom.clone());
            }
            let reference = Forme::load(ctx.entry.raw(pair_side))?;
            let pose = self
                .poses(ctx, pair_side, &reference)?
                .into_iter()
                .next()
                .ok_or_else(|| OpError::site("no pose for twist reference"))?;
            let t = Pose::align(&pose, src_pose).map_err(OpError::from)?;
            Ok(reference.geom.transformed(&t))
        };
        let cantellated = align_in(Side::Left)?;
        let snub = align_in(Side::Right)?;

        let left_class = Self::classes(&cantellated, n, ClassicalForm::Cantellated)?;
        let right_class = Self::classes(&snub, n, ClassicalForm::Snub)?;
        let map = Self::vertex_map(&cantellated, &left_class, &snub, &right_class)?;

        // Split each edge square along the diagonal that exists as a snub
        // edge, so both endpoints of the animation share one topology.
        let class_set: std::collections::HashSet<usize> = left_class.iter().copied().collect();
        let mut faces: Vec<Vec<usize>> = Vec::new();
        for (fi, face) in cantellated.face_lists().iter().enumerate() {
            let is_edge_square = face.len() == 4 && !class_set.contains(&fi);
            if !is_edge_square {
                faces.push(face.clone());
                continue;
            }
            let (a, b, c, d) = (face[0], face[1], face[2], face[3]);
            let has_edge = |x: usize, y: usize| snub.has_edge(map[x], map[y]);
            if has_edge(a, c) {
                faces.push(vec![a, b, c]);
                faces.push(vec![a, c, d]);
            } else if has_edge(b, d) {
                faces.push(vec![b, c, d]);
                faces.push(vec![b, d, a]);
            } else {
                return Err(OpError::site("edge square matches neither snub diagonal"));
            }
        }

        let mut data = MiddleData::plain(cantellated.with_faces(faces));
        data.left = Some(cantellated);
        data.right = Some(snub);
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
                    .ok_or_else(|| OpError::site("twist middle lost its vertex map"))?;
                let snub = middle.require(Side::Right)?;
                Ok(map.iter().map(|&m| snub.vertex_position(m)).collect())
            }
        }
    }
}

// ── Dual ────────────────────────────────────────────────────────────────────

pub struct DualPair {
    graph: Vec<GraphEntry>,
}

impl DualPair {
    fn build() -> Self {
        let mut graph = Vec::new();
        for family in crf_types::Family::ALL {
            let (left, right) = match family {
                crf_types::Family::Tetrahedral => {
                    let t = Classical::regular(family, None);
                    (t, t)
                }
                _ => (
                    Classical::regular(family, Some(FacetKind::Face)),
                    Classical::regular(family, Some(FacetKind::Vertex)),
                ),
            };
            graph.push(GraphEntry::new(
                PolyhedronSpecs::Classical(left),
                PolyhedronSpecs::Classical(right),
                EntryOpts::default(),
            ));
        }
        Self { graph }
    }
}

pub fn dual_pair() -> &'static DualPair {
    static PAIR: OnceLock<DualPair> = OnceLock::new();
    PAIR.get_or_init(DualPair::build)
}

impl OpPair for DualPair {
    fn left_name(&self) -> &'static str {
        "dual"
    }

    fn right_name(&self) -> &'static str {
        "dual"
    }

    fn graph(&self) -> &[GraphEntry] {
        &self.graph
    }

    fn middle_side(&self) -> Option<Side> {
        None
    }

    fn poses(&self, _ctx: &PairCtx<'_>, side: Side, forme: &Forme) -> OpsResult<Vec<Pose>> {
        let scale = forme.edge_length();
        match side {
            Side::Left => {
                let class: Vec<usize> = (0..forme.geom.face_count()).collect();
                Ok(vec![class_pose(&forme.geom, &class, scale)?])
            }
            // The vertex form plays its role through its vertices: its
            // vertex directions line up with the face form's face normals.
            Side::Right => Ok(vec![vertex_frame(&forme.geom, scale)?]),
        }
    }

    fn custom_middle(&self, ctx: &PairCtx<'_>, src_pose: &Pose) -> OpsResult<MiddleData> {
        let n = family_sides(ctx.entry)?;
        let cant = Forme::load(&PolyhedronSpecs::Classical(Classical {
            family: ctx
                .entry
                .raw_left
                .as_classical()
                .ok_or_else(|| OpError::site("dual entry is not classical"))?
                .family,
            form: ClassicalForm::Cantellated,
            facet: None,
            twist: None,
        }))?;

        let class_assignments: Vec<(Vec<usize>, Vec<usize>)> = if n == 3 {
            let a = cantellated_class(&cant.geom, n, FacetKind::Face)?;
            let b = cantellated_class(&cant.geom, n, FacetKind::Vertex)?;
            vec![(a.clone(), b.clone()), (b, a)]
        } else {
            vec![(
                cantellated_class(&cant.geom, n, FacetKind::Face)?,
                cantellated_class(&cant.geom, n, FacetKind::Vertex)?,
            )]
        };

        let mut best: Option<(f64, MiddleData)> = None;
        for (left_class, right_class) in class_assignments {
            // The left-role class carries the octahedral/icosahedral axes
            // shared by both regular forms.
            let pose = class_pose(&cant.geom, &left_class, 1.0)?;
            let t = Pose::align(&pose, src_pose).map_err(OpError::from)?;
            let aligned = cant.geom.transformed(&t);
            let own_class = match ctx.side {
                Side::Left => &left_class,
                Side::Right => &right_class,
            };
            let start = contract_positions(&aligned, own_class, &ctx.source.geom)?;
            let score = misfit(&start, ctx.source.geom.vertex_positions());
            if best.as_ref().map(|(b, _)| score < *b).unwrap_or(true) {
                let mut data = MiddleData::plain(aligned);
                data.face_classes = Some((left_class.clone(), right_class.clone()));
                best = Some((score, data));
            }
        }
        best.map(|(_, d)| d)
            .ok_or_else(|| OpError::site("no cantellated alignment for dual"))
    }

    fn morph(&self, _ctx: &PairCtx<'_>, side: Side, middle: &MiddleData) -> OpsResult<Vec<Point3d>> {
        let (left_class, right_class) = middle
            .face_classes
            .as_ref()
            .ok_or_else(|| OpError::site("dual middle lost its face classes"))?;
        let class = match side {
            Side::Left => left_class,
            Side::Right => right_class,
        };
        contract_positions(&middle.geom, class, middle.require(side)?)
    }
}
