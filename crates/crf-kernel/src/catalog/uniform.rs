//! Platonic and Archimedean reference constructions.
//!
//! Vertex sets come from closed-form coordinates or from geometric
//! derivations of a Platonic base (truncation ratio, edge midpoints, face
//! translation); faces are recovered uniformly by convex face tracing over
//! the shortest-edge graph.

use std::collections::HashSet;

use crf_types::{Classical, ClassicalForm, FacetKind, Family};

use crate::error::{KernelError, KernelResult};
use crate::geometry::point::{Point3d, centroid};
use crate::geometry::transform::Mat3;
use crate::geometry::vector::Vec3;
use crate::mesh::polyhedron::Polyhedron;

const PHI: f64 = 1.618033988749895;

pub fn build_classical(spec: &Classical) -> KernelResult<Polyhedron> {
    let vertices = match spec.form {
        ClassicalForm::Regular => platonic_vertices(spec.family, spec.facet),
        ClassicalForm::Truncated => truncated_vertices(&platonic(spec.family, spec.facet)?),
        ClassicalForm::Rectified => rectified_vertices(&platonic_face_form(spec.family)?),
        ClassicalForm::Cantellated => cantellated_vertices(&platonic_face_form(spec.family)?)?,
        ClassicalForm::Bevelled => match spec.family {
            Family::Octahedral => bevelled_octahedral_vertices(),
            _ => bevelled_icosahedral_vertices(),
        },
        ClassicalForm::Snub => match spec.family {
            Family::Octahedral => snub_cube_vertices(),
            _ => snub_dodecahedron_vertices(),
        },
    };
    trace_convex(&vertices)
}

fn platonic(family: Family, facet: Option<FacetKind>) -> KernelResult<Polyhedron> {
    trace_convex(&platonic_vertices(family, facet))
}

fn platonic_face_form(family: Family) -> KernelResult<Polyhedron> {
    let facet = match family {
        Family::Tetrahedral => None,
        _ => Some(FacetKind::Face),
    };
    platonic(family, facet)
}

fn platonic_vertices(family: Family, facet: Option<FacetKind>) -> Vec<Point3d> {
    match (family, facet) {
        (Family::Tetrahedral, _) => vec![
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(1.0, -1.0, -1.0),
            Point3d::new(-1.0, 1.0, -1.0),
            Point3d::new(-1.0, -1.0, 1.0),
        ],
        (Family::Octahedral, Some(FacetKind::Face)) => signed(&[1.0, 1.0, 1.0]),
        (Family::Octahedral, _) => permutations_signed(&[1.0, 0.0, 0.0]),
        (Family::Icosahedral, Some(FacetKind::Face)) => {
            let mut out = signed(&[1.0, 1.0, 1.0]);
            out.extend(cyclic_signed(&[0.0, 1.0 / PHI, PHI]));
            out
        }
        (Family::Icosahedral, _) => cyclic_signed(&[0.0, 1.0, PHI]),
    }
}

/// Closed-form truncation: each directed edge contributes the point at the
/// cut ratio from its start, chosen from the interior half-angle of the
/// base's faces so the new faces are exactly regular.
fn truncated_vertices(base: &Polyhedron) -> Vec<Point3d> {
    let sides = base.face(0).sides() as f64;
    let half_angle = std::f64::consts::PI * (sides - 2.0) / (2.0 * sides);
    let ratio = 1.0 / (2.0 + 2.0 * half_angle.sin());

    let mut out = Vec::new();
    for e in base.edges() {
        let (a, b) = e.endpoints();
        out.push(a.lerp(&b, ratio));
        out.push(b.lerp(&a, ratio));
    }
    out
}

/// Full rectification: vertices move to edge midpoints.
fn rectified_vertices(base: &Polyhedron) -> Vec<Point3d> {
    base.edges().map(|e| e.midpoint()).collect()
}

/// Cantellation: translate every face outward along its own normal far
/// enough that the gap between adjacent face copies is one edge length. The
/// distance comes from the dihedral geometry, not an empirical constant.
fn cantellated_vertices(base: &Polyhedron) -> KernelResult<Vec<Point3d>> {
    let edge = base.edge_length();
    let e = base
        .edges()
        .next()
        .ok_or_else(|| KernelError::degenerate("cantellating an empty mesh"))?;
    let n1 = e.face()?.normal();
    let n2 = e.twin()?.face()?.normal();
    let alpha = n1.angle_to(&n2);
    let t = edge / (2.0 * (alpha / 2.0).sin());

    let mut out = Vec::new();
    for face in base.faces() {
        let offset = face.normal() * t;
        for p in face.vertex_positions() {
            out.push(p + offset);
        }
    }
    Ok(out)
}

// ── Embedded coordinate generators ──────────────────────────────────────────

fn bevelled_octahedral_vertices() -> Vec<Point3d> {
    let root2 = 2.0f64.sqrt();
    permutations_signed(&[1.0, 1.0 + root2, 1.0 + 2.0 * root2])
}

fn bevelled_icosahedral_vertices() -> Vec<Point3d> {
    let mut out = Vec::new();
    for triple in [
        [1.0 / PHI, 1.0 / PHI, 3.0 + PHI],
        [2.0 / PHI, PHI, 1.0 + 2.0 * PHI],
        [1.0 / PHI, PHI * PHI, 3.0 * PHI - 1.0],
        [2.0 * PHI - 1.0, 2.0, 2.0 + PHI],
        [PHI, 3.0, 2.0 * PHI],
    ] {
        out.extend(even_permutations_signed(&triple));
    }
    out
}

/// Laevo snub cube from the tribonacci constant: permutations of
/// (1, 1/t, t) whose permutation parity matches the sign parity.
fn snub_cube_vertices() -> Vec<Point3d> {
    let t = newton(1.8, |x| x * x * x - x * x - x - 1.0, |x| {
        3.0 * x * x - 2.0 * x - 1.0
    });
    let base = [1.0, 1.0 / t, t];
    let mut out = Vec::new();
    for (perm, even_perm) in PERMUTATIONS {
        for signs in SIGN_TRIPLES {
            let minus = signs.iter().filter(|&&s| s < 0.0).count();
            if even_perm == (minus % 2 == 0) {
                out.push(Point3d::new(
                    signs[0] * base[perm[0]],
                    signs[1] * base[perm[1]],
                    signs[2] * base[perm[2]],
                ));
            }
        }
    }
    out
}

/// Laevo snub dodecahedron: the orbit of one closed-form seed vertex under
/// the icosahedral rotation group.
fn snub_dodecahedron_vertices() -> Vec<Point3d> {
    let xi = newton(1.8, |x| x * x * x - 2.0 * x - PHI, |x| 3.0 * x * x - 2.0);
    let alpha = xi - 1.0 / xi;
    let beta = xi * PHI + PHI * PHI + PHI / xi;
    let seed = Point3d::new(2.0 * alpha, 2.0, 2.0 * beta);

    // Generators: a five-fold turn about a vertex axis of the icosahedron
    // and a three-fold turn about an adjacent face axis.
    let v5 = Vec3::new(0.0, 1.0, PHI).normalized_or_z();
    let face = Vec3::new(0.0, 1.0, PHI) + Vec3::new(0.0, -1.0, PHI) + Vec3::new(PHI, 0.0, 1.0);
    let v3 = face.normalized_or_z();
    let group = rotation_group(&[
        Mat3::rotation(&v5, 2.0 * std::f64::consts::PI / 5.0),
        Mat3::rotation(&v3, 2.0 * std::f64::consts::PI / 3.0),
    ]);
    let orbit: Vec<Point3d> = group
        .iter()
        .map(|m| Point3d::ORIGIN + m.mul_vec(&seed.to_vec3()))
        .collect();
    dedup_points(orbit)
}

/// Close a set of rotation generators into the full finite group.
fn rotation_group(generators: &[Mat3]) -> Vec<Mat3> {
    let close = |a: &Mat3, b: &Mat3| -> bool {
        (0..3).all(|i| (a.cols[i] - b.cols[i]).length() < 1e-9)
    };
    let mut group = vec![Mat3::IDENTITY];
    let mut frontier = vec![Mat3::IDENTITY];
    while let Some(m) = frontier.pop() {
        for g in generators {
            let next = g.mul_mat(&m);
            if !group.iter().any(|known| close(known, &next)) {
                group.push(next);
                frontier.push(next);
            }
        }
    }
    group
}

fn newton(mut x: f64, f: impl Fn(f64) -> f64, df: impl Fn(f64) -> f64) -> f64 {
    for _ in 0..64 {
        let step = f(x) / df(x);
        x -= step;
        if step.abs() < 1e-14 {
            break;
        }
    }
    x
}

// ── Coordinate helpers ──────────────────────────────────────────────────────

const PERMUTATIONS: [([usize; 3], bool); 6] = [
    ([0, 1, 2], true),
    ([1, 2, 0], true),
    ([2, 0, 1], true),
    ([0, 2, 1], false),
    ([2, 1, 0], false),
    ([1, 0, 2], false),
];

const SIGN_TRIPLES: [[f64; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

/// All sign combinations of one triple (duplicates removed for zero
/// entries).
fn signed(triple: &[f64; 3]) -> Vec<Point3d> {
    let mut out = Vec::new();
    for signs in SIGN_TRIPLES {
        out.push(Point3d::new(
            signs[0] * triple[0],
            signs[1] * triple[1],
            signs[2] * triple[2],
        ));
    }
    dedup_points(out)
}

/// All permutations with all signs.
fn permutations_signed(triple: &[f64; 3]) -> Vec<Point3d> {
    let mut out = Vec::new();
    for (perm, _) in PERMUTATIONS {
        for signs in SIGN_TRIPLES {
            out.push(Point3d::new(
                signs[0] * triple[perm[0]],
                signs[1] * triple[perm[1]],
                signs[2] * triple[perm[2]],
            ));
        }
    }
    dedup_points(out)
}

/// Even permutations with all signs.
fn even_permutations_signed(triple: &[f64; 3]) -> Vec<Point3d> {
    let mut out = Vec::new();
    for (perm, even) in PERMUTATIONS {
        if !even {
            continue;
        }
        for signs in SIGN_TRIPLES {
            out.push(Point3d::new(
                signs[0] * triple[perm[0]],
                signs[1] * triple[perm[1]],
                signs[2] * triple[perm[2]],
            ));
        }
    }
    dedup_points(out)
}

/// Cyclic (even) permutations with all signs.
fn cyclic_signed(triple: &[f64; 3]) -> Vec<Point3d> {
    even_permutations_signed(triple)
}

fn dedup_points(points: Vec<Point3d>) -> Vec<Point3d> {
    let mut out: Vec<Point3d> = Vec::new();
    for p in points {
        if !out.iter().any(|q| p.distance_to(q) < 1e-9) {
            out.push(p);
        }
    }
    out
}

// ── Convex face tracing ─────────────────────────────────────────────────────

/// Recover the face cycles of a convex solid whose edges are exactly the
/// shortest vertex-to-vertex distances (true of every uniform solid built
/// here). Faces are wound outward.
pub fn trace_convex(points: &[Point3d]) -> KernelResult<Polyhedron> {
    let n = points.len();
    if n < 4 {
        return Err(KernelError::degenerate("too few vertices to trace"));
    }
    let mut min_d = f64::MAX;
    for i in 0..n {
        for j in (i + 1)..n {
            min_d = min_d.min(points[i].distance_to(&points[j]));
        }
    }
    let limit = min_d * (1.0 + 1e-6);
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && points[i].distance_to(&points[j]) <= limit {
                neighbors[i].push(j);
            }
        }
    }

    let center = centroid(points);
    let next_around = |prev: usize, at: usize| -> KernelResult<usize> {
        let axis = (points[at] - center)
            .normalized()
            .ok_or_else(|| KernelError::degenerate("vertex at center"))?;
        let back = (points[prev] - points[at]).rejected_from(&axis);
        let mut best: Option<(f64, usize)> = None;
        for &c in &neighbors[at] {
            if c == prev {
                continue;
            }
            let dir = (points[c] - points[at]).rejected_from(&axis);
            let mut angle = back.signed_angle_to(&dir, &axis);
            if angle <= 1e-9 {
                angle += 2.0 * std::f64::consts::PI;
            }
            if best.map(|(a, _)| angle < a).unwrap_or(true) {
                best = Some((angle, c));
            }
        }
        best.map(|(_, c)| c)
            .ok_or_else(|| KernelError::invariant("isolated vertex during face trace"))
    };

    let mut used: HashSet<(usize, usize)> = HashSet::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    for start_a in 0..n {
        for start_idx in 0..neighbors[start_a].len() {
            let start_b = neighbors[start_a][start_idx];
            if used.contains(&(start_a, start_b)) {
                continue;
            }
            let mut cycle = vec![start_a, start_b];
            loop {
                let len = cycle.len();
                if len > 12 {
                    return Err(KernelError::invariant("face trace cycle never closed"));
                }
                let next = next_around(cycle[len - 2], cycle[len - 1])?;
                if next == cycle[0] && next_around(cycle[len - 1], next)? == cycle[1] {
                    break;
                }
                cycle.push(next);
            }
            for i in 0..cycle.len() {
                used.insert((cycle[i], cycle[(i + 1) % cycle.len()]));
            }
            faces.push(cycle);
        }
    }

    let mut poly = Polyhedron::new(points.to_vec(), faces);
    if signed_volume(&poly) < 0.0 {
        let flipped = poly
            .face_lists()
            .iter()
            .map(|f| f.iter().rev().copied().collect())
            .collect();
        poly = poly.with_faces(flipped);
    }
    Ok(poly)
}

fn signed_volume(poly: &Polyhedron) -> f64 {
    let mut volume = 0.0;
    for face in poly.faces() {
        let pts = face.vertex_positions();
        let a = pts[0].to_vec3();
        for i in 1..(pts.len() - 1) {
            volume += a.dot(&pts[i].to_vec3().cross(&pts[i + 1].to_vec3())) / 6.0;
        }
    }
    volume
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classical(family: Family, form: ClassicalForm, facet: Option<FacetKind>) -> Polyhedron {
        build_classical(&Classical {
            family,
            form,
            facet,
            twist: None,
        })
        .unwrap()
    }

    fn counts(p: &Polyhedron) -> (usize, usize, usize) {
        (p.vertex_count(), p.edge_count(), p.face_count())
    }

    #[test]
    fn test_platonic_counts() {
        let cube = classical(Family::Octahedral, ClassicalForm::Regular, Some(FacetKind::Face));
        assert_eq!(counts(&cube), (8, 12, 6));
        let icosa = classical(
            Family::Icosahedral,
            ClassicalForm::Regular,
            Some(FacetKind::Vertex),
        );
        assert_eq!(counts(&icosa), (12, 30, 20));
        let dodeca = classical(
            Family::Icosahedral,
            ClassicalForm::Regular,
            Some(FacetKind::Face),
        );
        assert_eq!(counts(&dodeca), (20, 30, 12));
    }

    #[test]
    fn test_truncated_tetrahedron_counts_and_faces() {
        let tt = classical(Family::Tetrahedral, ClassicalForm::Truncated, None);
        assert_eq!(counts(&tt), (12, 18, 8));
        let mut sides: Vec<usize> = tt.faces().map(|f| f.sides()).collect();
        sides.sort_unstable();
        assert_eq!(sides, vec![3, 3, 3, 3, 6, 6, 6, 6]);
    }

    #[test]
    fn test_rectified_and_cantellated_octahedral() {
        let co = classical(Family::Octahedral, ClassicalForm::Rectified, None);
        assert_eq!(counts(&co), (12, 24, 14));
        let rco = classical(Family::Octahedral, ClassicalForm::Cantellated, None);
        assert_eq!(counts(&rco), (24, 48, 26));
    }

    #[test]
    fn test_bevelled_counts() {
        let tco = classical(Family::Octahedral, ClassicalForm::Bevelled, None);
        assert_eq!(counts(&tco), (48, 72, 26));
        let tid = classical(Family::Icosahedral, ClassicalForm::Bevelled, None);
        assert_eq!(counts(&tid), (120, 180, 62));
    }

    #[test]
    fn test_snub_counts() {
        let sc = build_classical(&Classical {
            family: Family::Octahedral,
            form: ClassicalForm::Snub,
            facet: None,
            twist: Some(crf_types::Twist::Left),
        })
        .unwrap();
        assert_eq!(counts(&sc), (24, 60, 38));
        let sd = build_classical(&Classical {
            family: Family::Icosahedral,
            form: ClassicalForm::Snub,
            facet: None,
            twist: Some(crf_types::Twist::Left),
        })
        .unwrap();
        assert_eq!(counts(&sd), (60, 150, 92));
    }

    #[test]
    fn test_faces_are_regular_and_planar() {
        for (family, form, facet) in [
            (Family::Tetrahedral, ClassicalForm::Regular, None),
            (Family::Tetrahedral, ClassicalForm::Truncated, None),
            (Family::Octahedral, ClassicalForm::Regular, Some(FacetKind::Vertex)),
            (Family::Octahedral, ClassicalForm::Rectified, None),
            (Family::Octahedral, ClassicalForm::Cantellated, None),
            (Family::Octahedral, ClassicalForm::Bevelled, None),
            (Family::Icosahedral, ClassicalForm::Regular, Some(FacetKind::Face)),
            (Family::Icosahedral, ClassicalForm::Cantellated, None),
        ] {
            let poly = classical(family, form, facet);
            let edge = poly.edge_length();
            for face in poly.faces() {
                let plane = face.plane().unwrap();
                assert!(plane.contains_all(&face.vertex_positions(), edge * 1e-6));
                for e in face.edges() {
                    assert!(
                        (e.length() - edge).abs() < edge * 1e-6,
                        "uneven edge on {family:?} {form:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_icosahedral_rotation_group_order() {
        let v5 = Vec3::new(0.0, 1.0, PHI).normalized_or_z();
        let face =
            Vec3::new(0.0, 1.0, PHI) + Vec3::new(0.0, -1.0, PHI) + Vec3::new(PHI, 0.0, 1.0);
        let group = rotation_group(&[
            Mat3::rotation(&v5, 2.0 * std::f64::consts::PI / 5.0),
            Mat3::rotation(&face.normalized_or_z(), 2.0 * std::f64::consts::PI / 3.0),
        ]);
        assert_eq!(group.len(), 60);
    }
}
