//! Parametric and compositional Johnson-solid constructions: pyramids,
//! cupolas, the rotunda, prisms and antiprisms, capstone assemblies, and
//! composite (augmented/diminished/gyrate) solids.

use std::collections::HashSet;
use std::f64::consts::PI;

use crf_types::{
    Align, Capstone, CapstoneKind, Composite, CompositeBase, Elongation, Gyration, Prismatic,
    PrismaticKind,
};

use crate::error::{KernelError, KernelResult};
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::mesh::cap::{Cap, CapKind, CapSearch};
use crate::mesh::compose::{attach, cap_solid, remove_cap};
use crate::mesh::facet::Facet;
use crate::mesh::polyhedron::Polyhedron;

fn ring_radius(n: usize) -> f64 {
    1.0 / (2.0 * (PI / n as f64).sin())
}

fn ring(n: usize, radius: f64, z: f64, angle_offset: f64) -> Vec<Point3d> {
    (0..n)
        .map(|k| {
            let angle = 2.0 * PI * k as f64 / n as f64 + angle_offset;
            Point3d::new(radius * angle.cos(), radius * angle.sin(), z)
        })
        .collect()
}

// ── Parametric builders (unit edge) ─────────────────────────────────────────

/// n-gonal prism. Faces: top, bottom, then laterals.
pub fn prism(n: usize) -> Polyhedron {
    let r = ring_radius(n);
    let mut vertices = ring(n, r, 0.5, 0.0);
    vertices.extend(ring(n, r, -0.5, 0.0));
    let mut faces = vec![
        (0..n).collect::<Vec<_>>(),
        (0..n).rev().map(|k| n + k).collect(),
    ];
    for k in 0..n {
        let next = (k + 1) % n;
        faces.push(vec![k, n + k, n + next, next]);
    }
    Polyhedron::new(vertices, faces)
}

/// n-gonal antiprism, top ring rotated a half step. Faces: top, bottom,
/// then the triangle band.
pub fn antiprism(n: usize) -> Polyhedron {
    let r = ring_radius(n);
    let half_step = PI / n as f64;
    let d2 = 2.0 * r * r * (1.0 - half_step.cos());
    let h = (1.0 - d2).sqrt();
    let mut vertices = ring(n, r, h / 2.0, half_step);
    vertices.extend(ring(n, r, -h / 2.0, 0.0));
    let mut faces = vec![
        (0..n).collect::<Vec<_>>(),
        (0..n).rev().map(|k| n + k).collect(),
    ];
    for k in 0..n {
        let next = (k + 1) % n;
        faces.push(vec![n + k, n + next, k]);
        faces.push(vec![k, n + next, next]);
    }
    Polyhedron::new(vertices, faces)
}

/// n-gonal pyramid, apex up. Faces: base first, then laterals.
pub fn pyramid(n: usize) -> Polyhedron {
    let r = ring_radius(n);
    let h = (1.0 - r * r).sqrt();
    let mut vertices = ring(n, r, 0.0, 0.0);
    vertices.push(Point3d::new(0.0, 0.0, h));
    let mut faces = vec![(0..n).rev().collect::<Vec<_>>()];
    for k in 0..n {
        faces.push(vec![k, (k + 1) % n, n]);
    }
    Polyhedron::new(vertices, faces)
}

/// n-gonal cupola: an n-gon lifted over a 2n-gon. Faces: top, bottom, then
/// squares and triangles.
pub fn cupola(n: usize) -> Polyhedron {
    let r_top = ring_radius(n);
    let r_bottom = ring_radius(2 * n);
    let offset = PI / (2.0 * n as f64);
    let d2 = r_top * r_top + r_bottom * r_bottom - 2.0 * r_top * r_bottom * offset.cos();
    let h = (1.0 - d2).sqrt();

    // Bottom ring first (indices 0..2n), then top ring (2n..3n), with the
    // top vertices centered over alternating bottom edges.
    let mut vertices = ring(2 * n, r_bottom, 0.0, 0.0);
    vertices.extend(ring(n, r_top, h, offset));
    let top = |k: usize| 2 * n + (k % n);

    let mut faces = vec![
        (0..n).map(top).collect::<Vec<_>>(),
        (0..2 * n).rev().collect(),
    ];
    for k in 0..n {
        faces.push(vec![top(k), (2 * k + 1) % (2 * n), (2 * k + 2) % (2 * n), top(k + 1)]);
    }
    for k in 0..n {
        faces.push(vec![top(k), 2 * k, (2 * k + 1) % (2 * n)]);
    }
    Polyhedron::new(vertices, faces)
}

/// Pentagonal rotunda, carved off the icosidodecahedron.
pub fn rotunda() -> KernelResult<Polyhedron> {
    let id = super::get("icosidodecahedron")?;
    let caps = Cap::find_all(&id, &CapSearch::kind(CapKind::Rotunda))?;
    let cap = caps
        .first()
        .ok_or_else(|| KernelError::invariant("icosidodecahedron lost its rotunda caps"))?;
    Ok(cap_solid(&id, cap))
}

// ── Capstone assembly ───────────────────────────────────────────────────────

pub fn build_prismatic(spec: &Prismatic) -> KernelResult<Polyhedron> {
    let n = spec.base as usize;
    Ok(match spec.kind {
        PrismaticKind::Prism => prism(n),
        PrismaticKind::Antiprism => antiprism(n),
    })
}

/// A single cap as a closed solid, plus the index of its mating face.
fn cap_piece(kind: CapstoneKind, base: usize, secondary: bool) -> KernelResult<(Polyhedron, usize)> {
    match kind {
        CapstoneKind::Pyramid => Ok((pyramid(base), 0)),
        CapstoneKind::Cupola if base == 2 => {
            // The fastigium is a triangular prism entered through a square.
            Ok((prism(3), 2))
        }
        CapstoneKind::Cupola => Ok((cupola(base), 1)),
        CapstoneKind::Rotunda => {
            let r = rotunda()?;
            let mating = r.face_count() - 1;
            Ok((r, mating))
        }
        CapstoneKind::CupolaRotunda => {
            if secondary {
                Ok((cupola(5), 1))
            } else {
                let r = rotunda()?;
                let mating = r.face_count() - 1;
                Ok((r, mating))
            }
        }
    }
}

/// The open face farthest down the build axis.
fn lowest_face_with_sides(poly: &Polyhedron, sides: usize) -> KernelResult<usize> {
    poly.faces()
        .filter(|f| f.sides() == sides)
        .min_by(|a, b| {
            a.centroid()
                .z
                .partial_cmp(&b.centroid().z)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|f| f.index)
        .ok_or_else(|| KernelError::invariant(format!("no open {sides}-gon face")))
}

/// Whether a two-cap solid has its caps aligned (ortho) rather than offset
/// (gyro): somewhere along the seam, matching face shapes meet.
pub fn classify_is_ortho(poly: &Polyhedron) -> KernelResult<bool> {
    let search = CapSearch {
        kinds: vec![CapKind::Cupola, CapKind::Rotunda, CapKind::Fastigium],
        base: None,
    };
    let caps = Cap::find_all(poly, &search)?;
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..caps.len() {
        for j in (i + 1)..caps.len() {
            let dot = caps[i].axis().dot(&caps[j].axis());
            if best.map(|(d, _, _)| dot < d).unwrap_or(true) {
                best = Some((dot, i, j));
            }
        }
    }
    let (_, i, j) = best.ok_or_else(|| {
        KernelError::invariant("gyration classification needs two caps")
    })?;
    let one: HashSet<usize> = caps[i].faces.iter().copied().collect();
    let two: HashSet<usize> = caps[j].faces.iter().copied().collect();
    let band: Vec<usize> = (0..poly.face_count())
        .filter(|f| !one.contains(f) && !two.contains(f))
        .collect();

    let sides = |f: usize| poly.face_vertices(f).len();
    if band.is_empty() {
        // Direct seam: compare the faces meeting across each equator edge.
        let map = poly.edge_face_map();
        for (&(a, b), &f1) in map.iter() {
            if a > b {
                continue;
            }
            let Some(&f2) = map.get(&(b, a)) else { continue };
            let pair_crosses = (one.contains(&f1) && two.contains(&f2))
                || (two.contains(&f1) && one.contains(&f2));
            if pair_crosses && sides(f1) == sides(f2) {
                return Ok(true);
            }
        }
        Ok(false)
    } else {
        // Banded seam: compare the two cap faces over and under each band
        // square.
        for &bf in &band {
            if sides(bf) != 4 {
                continue;
            }
            let partners: Vec<usize> = poly
                .face(bf)
                .adjacent_face_indices()
                .into_iter()
                .filter(|f| one.contains(f) || two.contains(f))
                .collect();
            if partners.len() == 2 && sides(partners[0]) == sides(partners[1]) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

pub fn build_capstone(spec: &Capstone) -> KernelResult<Polyhedron> {
    let m = spec.boundary_sides();
    let (cap1, cap1_mating) = cap_piece(spec.kind, spec.base as usize, false)?;

    let mut solid = cap1;
    let mut open = cap1_mating;
    match spec.elongation {
        Elongation::None => {}
        Elongation::Prism => {
            solid = attach(&solid, open, &prism(m), 0, 0)?;
            open = lowest_face_with_sides(&solid, m)?;
        }
        Elongation::Antiprism => {
            solid = attach(&solid, open, &antiprism(m), 0, 0)?;
            open = lowest_face_with_sides(&solid, m)?;
        }
    }

    if spec.count == 2 {
        let (cap2, cap2_mating) = cap_piece(spec.kind, spec.base as usize, true)?;
        let first_try = attach(&solid, open, &cap2, cap2_mating, 0)?;
        solid = match spec.gyrate {
            None => first_try,
            Some(gyrate) => {
                let want_ortho = gyrate == Gyration::Ortho;
                if classify_is_ortho(&first_try)? == want_ortho {
                    first_try
                } else {
                    attach(&solid, open, &cap2, cap2_mating, 1)?
                }
            }
        };
    }
    Ok(solid)
}

// ── Composite assembly ──────────────────────────────────────────────────────

/// A candidate modification site: a direction plus the face and vertex
/// footprints used to rank its relation to other sites.
struct Site {
    axis: Vec3,
    faces: HashSet<usize>,
    verts: HashSet<usize>,
}

impl Site {
    /// Sharing a face makes two modifications structurally impossible.
    fn conflicts(&self, other: &Site) -> bool {
        !self.faces.is_disjoint(&other.faces)
    }

    /// Sharing only vertices is allowed but ranks below a clean separation.
    fn touches(&self, other: &Site) -> bool {
        !self.verts.is_disjoint(&other.verts)
    }

    fn para(&self, other: &Site) -> bool {
        self.axis.dot(&other.axis) < -0.999
    }
}

/// Choose `count` mutually compatible sites honoring the meta/para choice.
/// Candidates are ranked: cleanly separated non-antipodal first, then
/// separated antipodal, then merely vertex-touching.
fn select_sites(sites: &[Site], count: usize, align: Option<Align>) -> KernelResult<Vec<usize>> {
    if sites.is_empty() {
        return Err(KernelError::invariant("no candidate modification sites"));
    }
    let mut chosen = vec![0usize];
    while chosen.len() < count {
        let usable = |i: usize| -> bool {
            !chosen.contains(&i) && chosen.iter().all(|&c| !sites[c].conflicts(&sites[i]))
        };
        let para_to_chosen = |i: usize| chosen.iter().any(|&c| sites[c].para(&sites[i]));
        let touches_chosen = |i: usize| chosen.iter().any(|&c| sites[c].touches(&sites[i]));

        let pick = |want_para: Option<bool>| -> Option<usize> {
            let pool: Vec<usize> = (0..sites.len())
                .filter(|&i| usable(i))
                .filter(|&i| match want_para {
                    Some(p) => para_to_chosen(i) == p,
                    None => true,
                })
                .collect();
            pool.iter()
                .copied()
                .find(|&i| !touches_chosen(i) && !para_to_chosen(i))
                .or_else(|| pool.iter().copied().find(|&i| !touches_chosen(i)))
                .or_else(|| pool.first().copied())
        };

        let next = match (chosen.len(), align) {
            (1, Some(Align::Para)) => pick(Some(true)),
            (1, Some(Align::Meta)) => pick(Some(false)),
            _ => pick(None),
        };
        let next = next.ok_or_else(|| {
            KernelError::invariant("no compatible modification site remains")
        })?;
        chosen.push(next);
    }
    Ok(chosen)
}

/// Face with the given side count whose normal best matches `axis`.
fn face_by_axis(poly: &Polyhedron, sides: usize, axis: &Vec3) -> KernelResult<usize> {
    poly.faces()
        .filter(|f| f.sides() == sides)
        .max_by(|a, b| {
            a.normal()
                .dot(axis)
                .partial_cmp(&b.normal().dot(axis))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|f| f.index)
        .ok_or_else(|| KernelError::invariant(format!("no {sides}-gon face on axis")))
}

/// Cap (of the given search) whose axis best matches `axis`.
fn cap_by_axis<'a>(
    poly: &'a Polyhedron,
    search: &CapSearch,
    axis: &Vec3,
) -> KernelResult<Cap<'a>> {
    let caps = Cap::find_all(poly, search)?;
    caps.into_iter()
        .max_by(|a, b| {
            a.axis()
                .dot(axis)
                .partial_cmp(&b.axis().dot(axis))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| KernelError::invariant("no cap on axis"))
}

pub fn build_composite(spec: &Composite) -> KernelResult<Polyhedron> {
    let base = super::get(&spec.base.canonical_name())?;
    match spec.base {
        CompositeBase::Icosahedron => diminish_icosahedron(spec, &base),
        CompositeBase::Rhombicosidodecahedron => modify_rhombicosidodecahedron(spec, &base),
        _ => augment_base(spec, &base),
    }
}

fn augment_base(spec: &Composite, base: &Polyhedron) -> KernelResult<Polyhedron> {
    let sides = spec.base.augment_face_sides();
    let sites: Vec<Site> = base
        .faces()
        .filter(|f| f.sides() == sides)
        .map(|f| Site {
            axis: f.normal(),
            faces: std::iter::once(f.index).collect(),
            verts: f.vertex_indices().iter().copied().collect(),
        })
        .collect();
    let chosen = select_sites(&sites, spec.augmented as usize, spec.align)?;

    let (cap, mating) = match spec.base.augment_cap() {
        CapstoneKind::Pyramid => (pyramid(sides), 0),
        _ => (cupola(sides / 2), 1),
    };

    let mut solid = base.clone();
    for &site in &chosen {
        let face = face_by_axis(&solid, sides, &sites[site].axis)?;
        solid = attach(&solid, face, &cap, mating, 0)?;
    }
    Ok(solid)
}

fn diminish_icosahedron(spec: &Composite, base: &Polyhedron) -> KernelResult<Polyhedron> {
    let search = CapSearch::primary().with_base(5);
    let caps = Cap::find_all(base, &search)?;
    let sites: Vec<Site> = caps
        .iter()
        .map(|c| Site {
            axis: c.axis(),
            faces: c.faces.iter().copied().collect(),
            verts: c.all_vertices().into_iter().collect(),
        })
        .collect();
    let chosen = select_sites(&sites, spec.diminished as usize, spec.align)?;

    let mut solid = base.clone();
    for &site in &chosen {
        let cap = cap_by_axis(&solid, &search, &sites[site].axis)?;
        solid = remove_cap(&solid, &cap);
    }

    if spec.augmented == 1 {
        // The only augmentable face of the tridiminished icosahedron is the
        // triangle surrounded by the three pentagon scars.
        let face = solid
            .faces()
            .find(|f| {
                f.sides() == 3
                    && f.adjacent_face_indices()
                        .iter()
                        .all(|&g| solid.face_vertices(g).len() == 5)
            })
            .map(|f| f.index)
            .ok_or_else(|| {
                KernelError::invariant("tridiminished icosahedron lost its central triangle")
            })?;
        solid = attach(&solid, face, &pyramid(3), 0, 0)?;
    }
    Ok(solid)
}

fn modify_rhombicosidodecahedron(spec: &Composite, base: &Polyhedron) -> KernelResult<Polyhedron> {
    let search = CapSearch::kind(CapKind::Cupola).with_base(5);
    let caps = Cap::find_all(base, &search)?;
    let sites: Vec<Site> = caps
        .iter()
        .map(|c| Site {
            axis: c.axis(),
            faces: c.faces.iter().copied().collect(),
            verts: c.all_vertices().into_iter().collect(),
        })
        .collect();
    let total = (spec.gyrate + spec.diminished) as usize;
    let chosen = select_sites(&sites, total, spec.align)?;

    let mut solid = base.clone();
    for (k, &site) in chosen.iter().enumerate() {
        let cap = cap_by_axis(&solid, &search, &sites[site].axis)?;
        if k < spec.gyrate as usize {
            let piece = cap_solid(&solid, &cap);
            let removed = remove_cap(&solid, &cap);
            let scar = removed.face_count() - 1;
            let piece_mating = piece.face_count() - 1;
            // One ring step flips the cupola's phase; whichever offset does
            // not reproduce the input is the gyration.
            let turned = attach(&removed, scar, &piece, piece_mating, 1)?;
            solid = if turned.is_same(&solid) {
                attach(&removed, scar, &piece, piece_mating, 0)?
            } else {
                turned
            };
        } else {
            solid = remove_cap(&solid, &cap);
        }
    }
    Ok(solid)
}
