use std::collections::{HashMap, HashSet};

use crate::error::{KernelError, KernelResult};
use crate::geometry::plane::Plane;
use crate::geometry::point::{Point3d, centroid};
use crate::geometry::vector::Vec3;

use super::facet::Facet;
use super::polyhedron::Polyhedron;

/// Shape of a removable/attachable patch of faces around one peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapKind {
    Pyramid,
    Cupola,
    Rotunda,
    /// Digonal cupola: a roof of two squares and two gable triangles.
    Fastigium,
}

/// The peak a cap is organized around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peak {
    Vertex(usize),
    Edge(usize, usize),
    Face(usize),
}

/// Which caps to look for. The default searches only the primary kinds
/// (vertex and edge peaks); cupola and rotunda scans are opt-in, since many
/// solids contain cupola-shaped regions that are not removable patches.
#[derive(Debug, Clone)]
pub struct CapSearch {
    pub kinds: Vec<CapKind>,
    pub base: Option<usize>,
}

impl Default for CapSearch {
    fn default() -> Self {
        Self {
            kinds: vec![CapKind::Pyramid, CapKind::Fastigium],
            base: None,
        }
    }
}

impl CapSearch {
    pub fn primary() -> Self {
        Self::default()
    }

    pub fn kind(kind: CapKind) -> Self {
        Self {
            kinds: vec![kind],
            base: None,
        }
    }

    pub fn with_base(mut self, base: usize) -> Self {
        self.base = Some(base);
        self
    }

    fn wants(&self, kind: CapKind) -> bool {
        self.kinds.contains(&kind)
    }

    fn base_matches(&self, base: usize) -> bool {
        self.base.map(|b| b == base).unwrap_or(true)
    }
}

/// A detected cap: peak, member faces, inner vertices, and the ordered
/// boundary ring separating it from the rest of the solid.
#[derive(Debug, Clone)]
pub struct Cap<'a> {
    poly: &'a Polyhedron,
    pub kind: CapKind,
    pub peak: Peak,
    /// Cap base polygon (pyramid: boundary sides; cupola/rotunda: top
    /// polygon sides; fastigium: 2).
    pub base: usize,
    pub faces: Vec<usize>,
    /// Boundary ring, wound counterclockwise seen from the cap side.
    pub boundary: Vec<usize>,
    pub inner: Vec<usize>,
}

impl<'a> Cap<'a> {
    /// Every valid cap on the mesh matching the search. A solid with no
    /// caps yields an empty vec, never an error.
    pub fn find_all(poly: &'a Polyhedron, search: &CapSearch) -> KernelResult<Vec<Cap<'a>>> {
        let mut out = Vec::new();
        if search.wants(CapKind::Pyramid) {
            find_pyramids(poly, search, &mut out)?;
        }
        if search.wants(CapKind::Fastigium) {
            find_fastigia(poly, search, &mut out)?;
        }
        if search.wants(CapKind::Cupola) {
            find_cupolas(poly, search, &mut out)?;
        }
        if search.wants(CapKind::Rotunda) {
            find_rotundas(poly, search, &mut out)?;
        }
        Ok(out)
    }

    fn assemble(
        poly: &'a Polyhedron,
        kind: CapKind,
        peak: Peak,
        base: usize,
        faces: Vec<usize>,
        inner: Vec<usize>,
    ) -> KernelResult<Option<Cap<'a>>> {
        let Some(mut boundary) = boundary_ring(poly, &faces) else {
            return Ok(None);
        };
        let expected = match kind {
            CapKind::Pyramid => base,
            CapKind::Fastigium => 4,
            CapKind::Cupola | CapKind::Rotunda => 2 * base,
        };
        if boundary.len() != expected {
            return Ok(None);
        }
        let positions: Vec<Point3d> = boundary
            .iter()
            .map(|&v| poly.vertex_position(v))
            .collect();
        let plane = match Plane::best_fit(&positions) {
            Ok(p) => p,
            Err(_) => return Ok(None),
        };
        let tol = poly.edge_length() * 1e-4;
        if !plane.contains_all(&positions, tol) {
            return Ok(None);
        }
        // Orient the ring counterclockwise seen from the cap side.
        let inner_centroid = centroid(
            &inner
                .iter()
                .map(|&v| poly.vertex_position(v))
                .collect::<Vec<_>>(),
        );
        if plane.signed_distance(&inner_centroid) < 0.0 {
            boundary.reverse();
        }
        Ok(Some(Cap {
            poly,
            kind,
            peak,
            base,
            faces,
            boundary,
            inner,
        }))
    }

    pub fn mesh(&self) -> &'a Polyhedron {
        self.poly
    }

    pub fn boundary_plane(&self) -> KernelResult<Plane> {
        let positions: Vec<Point3d> = self
            .boundary
            .iter()
            .map(|&v| self.poly.vertex_position(v))
            .collect();
        let plane = Plane::best_fit(&positions)?;
        // Normal toward the cap side.
        let inner_centroid = centroid(
            &self
                .inner
                .iter()
                .map(|&v| self.poly.vertex_position(v))
                .collect::<Vec<_>>(),
        );
        if plane.signed_distance(&inner_centroid) < 0.0 {
            Ok(Plane::new(plane.point, -plane.normal))
        } else {
            Ok(plane)
        }
    }

    /// Cap axis: boundary plane normal pointing out through the peak.
    pub fn axis(&self) -> Vec3 {
        match self.boundary_plane() {
            Ok(plane) => plane.normal,
            Err(_) => (Facet::centroid(self) - self.poly.centroid()).normalized_or_z(),
        }
    }

    pub fn contains_vertex(&self, v: usize) -> bool {
        self.inner.contains(&v) || self.boundary.contains(&v)
    }

    pub fn contains_face(&self, f: usize) -> bool {
        self.faces.contains(&f)
    }

    /// Inner and boundary vertices together.
    pub fn all_vertices(&self) -> Vec<usize> {
        let mut out = self.inner.clone();
        out.extend_from_slice(&self.boundary);
        out
    }

    /// Boundary ring rotated to a deterministic, symmetry-consistent start:
    /// the smallest-index vertex whose outgoing boundary edge borders the
    /// widest lateral face class. Two realizations of the same cap shape
    /// agree on this choice up to the cap's own symmetry.
    pub fn canonical_boundary(&self) -> Vec<usize> {
        let map = self.poly.edge_face_map();
        let face_set: HashSet<usize> = self.faces.iter().copied().collect();
        let n = self.boundary.len();
        let width = |i: usize| -> usize {
            let a = self.boundary[i];
            let b = self.boundary[(i + 1) % n];
            for key in [(a, b), (b, a)] {
                if let Some(&fi) = map.get(&key) {
                    if face_set.contains(&fi) {
                        return self.poly.face_vertices(fi).len();
                    }
                }
            }
            0
        };
        let max_width = (0..n).map(width).max().unwrap_or(0);
        let start = (0..n)
            .filter(|&i| width(i) == max_width)
            .min_by_key(|&i| self.boundary[i])
            .unwrap_or(0);
        let mut ring = self.boundary.clone();
        ring.rotate_left(start);
        ring
    }

    /// Frame of the cap's boundary ring: origin at the ring centroid, axis
    /// through the peak, cross toward the canonical start vertex.
    pub fn cap_pose(&self) -> crate::geometry::pose::Pose {
        let origin = Facet::centroid(self);
        let start = self.poly.vertex_position(self.canonical_boundary()[0]);
        let edge = {
            let n = self.boundary.len();
            let total: f64 = (0..n)
                .map(|i| {
                    self.poly
                        .vertex_position(self.boundary[i])
                        .distance_to(&self.poly.vertex_position(self.boundary[(i + 1) % n]))
                })
                .sum();
            total / n as f64
        };
        crate::geometry::pose::Pose::new(origin, edge, self.axis(), start - origin)
    }
}

impl Facet for Cap<'_> {
    fn mesh(&self) -> &Polyhedron {
        self.poly
    }

    fn centroid(&self) -> Point3d {
        centroid(
            &self
                .boundary
                .iter()
                .map(|&v| self.poly.vertex_position(v))
                .collect::<Vec<_>>(),
        )
    }

    fn normal(&self) -> Vec3 {
        self.axis()
    }
}

// ── Detection ────────────────────────────────────────────────────────────────

fn find_pyramids<'a>(
    poly: &'a Polyhedron,
    search: &CapSearch,
    out: &mut Vec<Cap<'a>>,
) -> KernelResult<()> {
    for v in poly.vertices() {
        let degree = v.degree();
        if !(3..=5).contains(&degree) || !search.base_matches(degree) {
            continue;
        }
        let faces = v.face_indices().to_vec();
        if !faces.iter().all(|&f| poly.face(f).sides() == 3) {
            continue;
        }
        if let Some(cap) = Cap::assemble(
            poly,
            CapKind::Pyramid,
            Peak::Vertex(v.index),
            degree,
            faces,
            vec![v.index],
        )? {
            out.push(cap);
        }
    }
    Ok(())
}

fn find_fastigia<'a>(
    poly: &'a Polyhedron,
    search: &CapSearch,
    out: &mut Vec<Cap<'a>>,
) -> KernelResult<()> {
    if !search.base_matches(2) {
        return Ok(());
    }
    let map = poly.edge_face_map();
    for ridge in poly.edges() {
        let (a, b) = (ridge.a, ridge.b);
        let Some(&f1) = map.get(&(a, b)) else { continue };
        let Some(&f2) = map.get(&(b, a)) else { continue };
        if poly.face(f1).sides() != 4 || poly.face(f2).sides() != 4 {
            continue;
        }
        if poly.vertex(a).degree() != 3 || poly.vertex(b).degree() != 3 {
            continue;
        }
        let gable = |v: usize| -> Option<usize> {
            poly.vertex(v)
                .face_indices()
                .iter()
                .copied()
                .find(|&f| f != f1 && f != f2)
                .filter(|&f| poly.face(f).sides() == 3)
        };
        let (Some(ta), Some(tb)) = (gable(a), gable(b)) else {
            continue;
        };
        if let Some(cap) = Cap::assemble(
            poly,
            CapKind::Fastigium,
            Peak::Edge(a, b),
            2,
            vec![f1, f2, ta, tb],
            vec![a, b],
        )? {
            out.push(cap);
        }
    }
    Ok(())
}

fn find_cupolas<'a>(
    poly: &'a Polyhedron,
    search: &CapSearch,
    out: &mut Vec<Cap<'a>>,
) -> KernelResult<()> {
    'faces: for top in poly.faces() {
        let base = top.sides();
        if !(3..=5).contains(&base) || !search.base_matches(base) {
            continue;
        }
        let mut faces: Vec<usize> = vec![top.index];
        for &v in top.vertex_indices() {
            let ring = poly.vertex(v).adjacent_faces()?;
            if ring.len() != 4 {
                continue 'faces;
            }
            let Some(at) = ring.iter().position(|f| f.index == top.index) else {
                continue 'faces;
            };
            // Around a cupola's top vertex: top face between two squares,
            // with a triangle opposite.
            let left = &ring[(at + 1) % 4];
            let right = &ring[(at + 3) % 4];
            let opposite = &ring[(at + 2) % 4];
            if left.sides() != 4 || right.sides() != 4 || opposite.sides() != 3 {
                continue 'faces;
            }
            for f in [left, right, opposite] {
                if !faces.contains(&f.index) {
                    faces.push(f.index);
                }
            }
        }
        if faces.len() != 2 * base + 1 {
            continue;
        }
        let inner = top.vertex_indices().to_vec();
        if let Some(cap) = Cap::assemble(
            poly,
            CapKind::Cupola,
            Peak::Face(top.index),
            base,
            faces,
            inner,
        )? {
            out.push(cap);
        }
    }
    Ok(())
}

fn find_rotundas<'a>(
    poly: &'a Polyhedron,
    search: &CapSearch,
    out: &mut Vec<Cap<'a>>,
) -> KernelResult<()> {
    if !search.base_matches(5) {
        return Ok(());
    }
    'faces: for top in poly.faces() {
        if top.sides() != 5 {
            continue;
        }
        let mut side_pentagons: Vec<usize> = Vec::new();
        let mut up_triangles: Vec<usize> = Vec::new();
        // Top ring: every vertex sits between two triangles with a pentagon
        // opposite the top face.
        for &v in top.vertex_indices() {
            let ring = poly.vertex(v).adjacent_faces()?;
            if ring.len() != 4 {
                continue 'faces;
            }
            let Some(at) = ring.iter().position(|f| f.index == top.index) else {
                continue 'faces;
            };
            let left = &ring[(at + 1) % 4];
            let right = &ring[(at + 3) % 4];
            let opposite = &ring[(at + 2) % 4];
            if left.sides() != 3 || right.sides() != 3 || opposite.sides() != 5 {
                continue 'faces;
            }
            if !side_pentagons.contains(&opposite.index) {
                side_pentagons.push(opposite.index);
            }
            for t in [left, right] {
                if !up_triangles.contains(&t.index) {
                    up_triangles.push(t.index);
                }
            }
        }
        if side_pentagons.len() != 5 || up_triangles.len() != 5 {
            continue;
        }
        // Middle ring: in each side pentagon, the two vertices flanking its
        // shared vertex with the top face.
        let mut middle: Vec<usize> = Vec::new();
        for (&v, &p) in top.vertex_indices().iter().zip(side_pentagons.iter()) {
            let cycle = poly.face_vertices(p);
            let Some(at) = cycle.iter().position(|&u| u == v) else {
                continue 'faces;
            };
            let n = cycle.len();
            for u in [cycle[(at + 1) % n], cycle[(at + n - 1) % n]] {
                if !middle.contains(&u) {
                    middle.push(u);
                }
            }
        }
        if middle.len() != 5 {
            continue;
        }
        let mut down_triangles: Vec<usize> = Vec::new();
        for &v in &middle {
            let pattern: Vec<usize> = poly.vertex(v)
                .face_indices()
                .iter()
                .map(|&f| poly.face(f).sides())
                .collect();
            let mut sorted = pattern.clone();
            sorted.sort_unstable();
            if sorted != vec![3, 3, 5, 5] {
                continue 'faces;
            }
            for &f in poly.vertex(v).face_indices() {
                if poly.face(f).sides() == 3
                    && !up_triangles.contains(&f)
                    && !down_triangles.contains(&f)
                {
                    down_triangles.push(f);
                }
            }
        }
        if down_triangles.len() != 5 {
            continue;
        }
        let mut faces = vec![top.index];
        faces.extend_from_slice(&up_triangles);
        faces.extend_from_slice(&side_pentagons);
        faces.extend_from_slice(&down_triangles);
        let mut inner = top.vertex_indices().to_vec();
        inner.extend_from_slice(&middle);
        if let Some(cap) = Cap::assemble(
            poly,
            CapKind::Rotunda,
            Peak::Face(top.index),
            5,
            faces,
            inner,
        )? {
            out.push(cap);
        }
    }
    Ok(())
}

/// Ordered boundary ring of a face patch: directed edges of member faces
/// whose twin lies outside the patch, chained into a single cycle.
fn boundary_ring(poly: &Polyhedron, faces: &[usize]) -> Option<Vec<usize>> {
    let set: HashSet<usize> = faces.iter().copied().collect();
    let map = poly.edge_face_map();
    let mut succ: HashMap<usize, usize> = HashMap::new();
    for &fi in faces {
        for e in poly.face(fi).edges() {
            let outside = match map.get(&(e.b, e.a)) {
                Some(twin_face) => !set.contains(twin_face),
                None => true,
            };
            if outside && succ.insert(e.a, e.b).is_some() {
                // Two boundary edges leave one vertex: not a disk patch.
                return None;
            }
        }
    }
    let &start = succ.keys().min()?;
    let mut ring = vec![start];
    let mut current = *succ.get(&start)?;
    while current != start {
        if ring.len() > succ.len() {
            return None;
        }
        ring.push(current);
        current = *succ.get(&current)?;
    }
    if ring.len() == succ.len() { Some(ring) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_pyramid() -> Polyhedron {
        Polyhedron::new(
            vec![
                Point3d::new(-0.5, -0.5, 0.0),
                Point3d::new(0.5, -0.5, 0.0),
                Point3d::new(0.5, 0.5, 0.0),
                Point3d::new(-0.5, 0.5, 0.0),
                Point3d::new(0.0, 0.0, 0.70710678),
            ],
            vec![
                vec![3, 2, 1, 0],
                vec![0, 1, 4],
                vec![1, 2, 4],
                vec![2, 3, 4],
                vec![3, 0, 4],
            ],
        )
    }

    fn triangular_prism() -> Polyhedron {
        let h = 3f64.sqrt() / 2.0;
        Polyhedron::new(
            vec![
                Point3d::new(-0.5, -h / 3.0, -0.5),
                Point3d::new(0.5, -h / 3.0, -0.5),
                Point3d::new(0.0, 2.0 * h / 3.0, -0.5),
                Point3d::new(-0.5, -h / 3.0, 0.5),
                Point3d::new(0.5, -h / 3.0, 0.5),
                Point3d::new(0.0, 2.0 * h / 3.0, 0.5),
            ],
            vec![
                vec![2, 1, 0],
                vec![3, 4, 5],
                vec![0, 1, 4, 3],
                vec![1, 2, 5, 4],
                vec![2, 0, 3, 5],
            ],
        )
    }

    #[test]
    fn test_square_pyramid_has_one_pyramid_cap() {
        let p = square_pyramid();
        let caps = Cap::find_all(&p, &CapSearch::primary()).unwrap();
        assert_eq!(caps.len(), 1);
        let cap = &caps[0];
        assert_eq!(cap.kind, CapKind::Pyramid);
        assert_eq!(cap.peak, Peak::Vertex(4));
        assert_eq!(cap.base, 4);
        assert_eq!(cap.boundary.len(), 4);
        assert!(cap.axis().z > 0.9);
    }

    #[test]
    fn test_prism_fastigium_caps() {
        let p = triangular_prism();
        let caps = Cap::find_all(&p, &CapSearch::kind(CapKind::Fastigium)).unwrap();
        // Every lateral edge of the prism is a ridge.
        assert_eq!(caps.len(), 3);
        for cap in &caps {
            assert_eq!(cap.boundary.len(), 4);
        }
    }

    #[test]
    fn test_cube_has_no_caps() {
        let cube = Polyhedron::new(
            vec![
                Point3d::new(-1.0, -1.0, -1.0),
                Point3d::new(1.0, -1.0, -1.0),
                Point3d::new(1.0, 1.0, -1.0),
                Point3d::new(-1.0, 1.0, -1.0),
                Point3d::new(-1.0, -1.0, 1.0),
                Point3d::new(1.0, -1.0, 1.0),
                Point3d::new(1.0, 1.0, 1.0),
                Point3d::new(-1.0, 1.0, 1.0),
            ],
            vec![
                vec![3, 2, 1, 0],
                vec![4, 5, 6, 7],
                vec![0, 1, 5, 4],
                vec![1, 2, 6, 5],
                vec![2, 3, 7, 6],
                vec![3, 0, 4, 7],
            ],
        );
        let search = CapSearch {
            kinds: vec![
                CapKind::Pyramid,
                CapKind::Fastigium,
                CapKind::Cupola,
                CapKind::Rotunda,
            ],
            base: None,
        };
        assert!(Cap::find_all(&cube, &search).unwrap().is_empty());
    }

    #[test]
    fn test_canonical_boundary_starts_on_ring() {
        let p = square_pyramid();
        let caps = Cap::find_all(&p, &CapSearch::primary()).unwrap();
        let ring = caps[0].canonical_boundary();
        assert_eq!(ring.len(), 4);
        assert!(ring.iter().all(|v| *v < 4));
    }
}
