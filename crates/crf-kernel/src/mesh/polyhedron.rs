use std::collections::HashMap;
use std::sync::OnceLock;

use itertools::Itertools;

use crate::error::KernelResult;
use crate::geometry::point::{Point3d, centroid};
use crate::geometry::transform::Transform;

use super::handles::{Edge, Face, Vertex};
use super::solid_data::SolidData;

/// An immutable polygonal mesh with memoized derived adjacency.
///
/// Never mutated in place: every transformation returns a new mesh. The
/// adjacency tables are computed once, lazily, and live as long as the mesh
/// instance — safe because nothing can invalidate them.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    vertices: Vec<Point3d>,
    faces: Vec<Vec<usize>>,
    edge_faces: OnceLock<HashMap<(usize, usize), usize>>,
    vertex_faces: OnceLock<Vec<Vec<usize>>>,
}

impl PartialEq for Polyhedron {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.faces == other.faces
    }
}

impl Polyhedron {
    pub fn new(vertices: Vec<Point3d>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            vertices,
            faces,
            edge_faces: OnceLock::new(),
            vertex_faces: OnceLock::new(),
        }
    }

    pub fn from_data(data: &SolidData) -> Self {
        Self::new(data.positions(), data.faces.clone())
    }

    pub fn to_data(&self) -> SolidData {
        SolidData {
            vertices: self.vertices.iter().map(Point3d::to_array).collect(),
            faces: self.faces.clone(),
        }
    }

    // ── Access ──────────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_positions(&self) -> &[Point3d] {
        &self.vertices
    }

    pub fn vertex_position(&self, index: usize) -> Point3d {
        self.vertices[index]
    }

    pub fn face_vertices(&self, index: usize) -> &[usize] {
        &self.faces[index]
    }

    pub fn face_lists(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> Vertex<'_> {
        Vertex { poly: self, index }
    }

    pub fn face(&self, index: usize) -> Face<'_> {
        Face { poly: self, index }
    }

    pub fn edge(&self, a: usize, b: usize) -> Edge<'_> {
        Edge { poly: self, a, b }
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex<'_>> {
        (0..self.vertex_count()).map(|index| Vertex { poly: self, index })
    }

    pub fn faces(&self) -> impl Iterator<Item = Face<'_>> {
        (0..self.face_count()).map(|index| Face { poly: self, index })
    }

    /// Each undirected edge once, oriented so the second vertex index is the
    /// larger one.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.edge_face_map()
            .keys()
            .filter(|(a, b)| a < b)
            .map(|&(a, b)| Edge { poly: self, a, b })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Whether the mesh has an edge between the two vertices, in either
    /// direction.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let map = self.edge_face_map();
        map.contains_key(&(a, b)) || map.contains_key(&(b, a))
    }

    pub fn centroid(&self) -> Point3d {
        centroid(&self.vertices)
    }

    /// Mean edge length (exactly the edge length on a regular-faced solid).
    pub fn edge_length(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for e in self.edges() {
            total += e.length();
            count += 1;
        }
        if count == 0 { 0.0 } else { total / count as f64 }
    }

    // ── Memoized adjacency ──────────────────────────────────────────────────

    /// Directed edge (a→b) to the face whose cycle contains it, built once.
    pub(crate) fn edge_face_map(&self) -> &HashMap<(usize, usize), usize> {
        self.edge_faces.get_or_init(|| {
            let mut map = HashMap::new();
            for (fi, face) in self.faces.iter().enumerate() {
                for i in 0..face.len() {
                    let a = face[i];
                    let b = face[(i + 1) % face.len()];
                    map.insert((a, b), fi);
                }
            }
            map
        })
    }

    /// Vertex to incident face lists (unordered), built once.
    pub(crate) fn vertex_face_lists(&self) -> &Vec<Vec<usize>> {
        self.vertex_faces.get_or_init(|| {
            let mut lists = vec![Vec::new(); self.vertices.len()];
            for (fi, face) in self.faces.iter().enumerate() {
                for &v in face {
                    lists[v].push(fi);
                }
            }
            lists
        })
    }

    // ── Derivations (always return a new mesh) ──────────────────────────────

    /// Same topology over new positions. The position array must match the
    /// vertex count index-for-index.
    pub fn with_vertices(&self, vertices: Vec<Point3d>) -> Polyhedron {
        assert_eq!(
            vertices.len(),
            self.vertices.len(),
            "with_vertices must preserve the vertex count"
        );
        Polyhedron::new(vertices, self.faces.clone())
    }

    pub fn with_faces(&self, faces: Vec<Vec<usize>>) -> Polyhedron {
        Polyhedron::new(self.vertices.clone(), faces)
    }

    /// Drop the listed faces, keeping every vertex (index stability).
    pub fn without_faces(&self, drop: &[usize]) -> Polyhedron {
        let drop: std::collections::HashSet<usize> = drop.iter().copied().collect();
        let faces = self
            .faces
            .iter()
            .enumerate()
            .filter(|(i, _)| !drop.contains(i))
            .map(|(_, f)| f.clone())
            .collect();
        self.with_faces(faces)
    }

    /// Concatenate another mesh's vertices and faces after this one's.
    pub fn add_polyhedron(&self, other: &Polyhedron) -> Polyhedron {
        let offset = self.vertices.len();
        let mut vertices = self.vertices.clone();
        vertices.extend_from_slice(&other.vertices);
        let mut faces = self.faces.clone();
        faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.iter().map(|v| v + offset).collect::<Vec<_>>()),
        );
        Polyhedron::new(vertices, faces)
    }

    pub fn transformed(&self, t: &Transform) -> Polyhedron {
        let vertices = self.vertices.iter().map(|p| t.apply(p)).collect();
        let mut out = self.with_vertices(vertices);
        // An improper transform flips orientation; rewind faces to keep
        // outward normals.
        if t.linear.determinant() < 0.0 {
            let faces = out
                .faces
                .iter()
                .map(|f| f.iter().rev().copied().collect())
                .collect();
            out = out.with_faces(faces);
        }
        out
    }

    pub fn translated(&self, offset: crate::geometry::vector::Vec3) -> Polyhedron {
        self.transformed(&Transform::translation(offset))
    }

    pub fn recentered(&self) -> Polyhedron {
        self.translated(Point3d::ORIGIN - self.centroid())
    }

    /// Mirror along the x axis, reversing winding. Produces the
    /// opposite-chirality copy of a snub solid without a second data set.
    pub fn reflect(&self) -> Polyhedron {
        let vertices = self
            .vertices
            .iter()
            .map(|p| Point3d::new(-p.x, p.y, p.z))
            .collect();
        let faces = self
            .faces
            .iter()
            .map(|f| f.iter().rev().copied().collect())
            .collect();
        Polyhedron::new(vertices, faces)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Operational sameness of two named solids: a canonicalized, sorted
    /// face-adjacency signature, robust to vertex relabeling.
    pub fn is_same(&self, other: &Polyhedron) -> bool {
        self.adjacency_signature() == other.adjacency_signature()
    }

    fn adjacency_signature(&self) -> Vec<(usize, Vec<usize>)> {
        let map = self.edge_face_map();
        self.faces
            .iter()
            .map(|face| {
                let neighbors: Vec<usize> = face
                    .iter()
                    .circular_tuple_windows()
                    .filter_map(|(&a, &b)| map.get(&(b, a)).map(|&fi| self.faces[fi].len()))
                    .sorted_unstable()
                    .collect();
                (face.len(), neighbors)
            })
            .sorted()
            .collect()
    }

    /// Face whose plane and centroid are nearest a probe point.
    pub fn hit_face(&self, point: &Point3d) -> KernelResult<Face<'_>> {
        let mut best: Option<(f64, usize)> = None;
        for face in self.faces() {
            let plane = face.plane()?;
            let score =
                plane.signed_distance(point).abs() + face.centroid().distance_to(point);
            if best.map(|(s, _)| score < s).unwrap_or(true) {
                best = Some((score, face.index));
            }
        }
        let (_, index) = best.ok_or_else(|| crate::error::KernelError::degenerate("empty mesh"))?;
        Ok(self.face(index))
    }

    /// Merge vertices that coincide within `tol`, drop faces that degenerate
    /// below three unique vertices, and drop unused vertices. First-seen
    /// vertex order is preserved, making the pass idempotent.
    pub fn deduplicate(&self, tol: f64) -> Polyhedron {
        let n = self.vertices.len();
        let mut canon: Vec<usize> = (0..n).collect();
        for i in 0..n {
            for j in 0..i {
                if canon[j] == j && self.vertices[i].distance_to(&self.vertices[j]) < tol {
                    canon[i] = j;
                    break;
                }
            }
        }

        let mut faces: Vec<Vec<usize>> = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let mut mapped: Vec<usize> = Vec::with_capacity(face.len());
            for &v in face {
                let c = canon[v];
                if mapped.last() != Some(&c) {
                    mapped.push(c);
                }
            }
            while mapped.len() > 1 && mapped.first() == mapped.last() {
                mapped.pop();
            }
            let mut unique = mapped.clone();
            unique.sort_unstable();
            unique.dedup();
            if unique.len() >= 3 && unique.len() == mapped.len() {
                faces.push(mapped);
            }
        }

        // Compact to used vertices, keeping original order.
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut vertices = Vec::new();
        for face in &faces {
            for &v in face {
                if !remap.contains_key(&v) {
                    remap.insert(v, vertices.len());
                    vertices.push(self.vertices[v]);
                }
            }
        }
        let faces = faces
            .into_iter()
            .map(|f| f.into_iter().map(|v| remap[&v]).collect())
            .collect();
        Polyhedron::new(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector::Vec3;

    fn unit_tetrahedron() -> Polyhedron {
        let s = 1.0 / (2.0f64).sqrt();
        Polyhedron::new(
            vec![
                Point3d::new(1.0, 0.0, -s),
                Point3d::new(-1.0, 0.0, -s),
                Point3d::new(0.0, 1.0, s),
                Point3d::new(0.0, -1.0, s),
            ],
            vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 3], vec![1, 3, 2]],
        )
    }

    #[test]
    fn test_edge_count_tetrahedron() {
        let t = unit_tetrahedron();
        assert_eq!(t.edge_count(), 6);
        assert_eq!(t.vertex_count() + t.face_count(), t.edge_count() + 2);
    }

    #[test]
    fn test_is_same_survives_relabeling() {
        let t = unit_tetrahedron();
        // Swap vertices 0 and 3 everywhere.
        let swap = |v: usize| match v {
            0 => 3,
            3 => 0,
            other => other,
        };
        let mut vertices = t.vertex_positions().to_vec();
        vertices.swap(0, 3);
        let faces = t
            .face_lists()
            .iter()
            .map(|f| f.iter().map(|&v| swap(v)).collect())
            .collect();
        let relabeled = Polyhedron::new(vertices, faces);
        assert!(t.is_same(&relabeled));
    }

    #[test]
    fn test_with_vertices_preserves_topology() {
        let t = unit_tetrahedron();
        let moved = t.with_vertices(
            t.vertex_positions()
                .iter()
                .map(|p| *p + Vec3::new(5.0, 0.0, 0.0))
                .collect(),
        );
        assert_eq!(moved.face_lists(), t.face_lists());
        assert!(moved.is_same(&t));
    }

    #[test]
    fn test_reflect_keeps_closure() {
        let t = unit_tetrahedron().reflect();
        // Every directed edge still has a twin.
        for e in t.edges() {
            assert!(e.twin().is_ok());
        }
        assert!(t.is_same(&unit_tetrahedron()));
    }

    #[test]
    fn test_deduplicate_merges_seam() {
        let t = unit_tetrahedron();
        // Duplicate the mesh on top of itself: same positions twice.
        let doubled = t.add_polyhedron(&t);
        let merged = doubled.deduplicate(1e-9);
        assert_eq!(merged.vertex_count(), 4);
    }

    #[test]
    fn test_deduplicate_idempotent() {
        let t = unit_tetrahedron().add_polyhedron(&unit_tetrahedron());
        let once = t.deduplicate(1e-9);
        let twice = once.deduplicate(1e-9);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_hit_face_picks_nearest() {
        let t = unit_tetrahedron();
        let face = t.face(0);
        let probe = face.centroid() + face.normal() * 0.1;
        let hit = t.hit_face(&probe).unwrap();
        assert_eq!(hit.index, 0);
    }
}
