use itertools::Itertools;

use crate::error::{KernelError, KernelResult};
use crate::geometry::plane::Plane;
use crate::geometry::point::{Point3d, centroid};
use crate::geometry::vector::Vec3;

use super::MAX_VERTEX_DEGREE;
use super::polyhedron::Polyhedron;

/// Borrowing handle onto one vertex of a mesh.
#[derive(Debug, Clone, Copy)]
pub struct Vertex<'a> {
    pub(crate) poly: &'a Polyhedron,
    pub index: usize,
}

impl<'a> Vertex<'a> {
    pub fn mesh(&self) -> &'a Polyhedron {
        self.poly
    }

    pub fn pos(&self) -> Point3d {
        self.poly.vertex_position(self.index)
    }

    pub fn degree(&self) -> usize {
        self.poly.vertex_face_lists()[self.index].len()
    }

    /// Incident face indices, unordered.
    pub fn face_indices(&self) -> &'a [usize] {
        &self.poly.vertex_face_lists()[self.index]
    }

    /// Outgoing edges in rotational order, found by walking `prev().twin()`
    /// until the cycle closes. Exceeding the defensive bound means the mesh
    /// is corrupt.
    pub fn adjacent_edges(&self) -> KernelResult<Vec<Edge<'a>>> {
        let faces = self.face_indices();
        let first = faces.first().ok_or_else(|| {
            KernelError::invariant(format!("vertex {} belongs to no face", self.index))
        })?;
        let face = self.poly.face(*first);
        let start = face.edge_from(self.index)?;

        let mut out = vec![start];
        let mut current = start.prev()?.twin()?;
        while current.b != start.b {
            if out.len() > MAX_VERTEX_DEGREE {
                return Err(KernelError::invariant(format!(
                    "edge walk around vertex {} never closed",
                    self.index
                )));
            }
            out.push(current);
            current = current.prev()?.twin()?;
        }
        Ok(out)
    }

    /// Adjacent faces in the same rotational order as [`Self::adjacent_edges`].
    pub fn adjacent_faces(&self) -> KernelResult<Vec<Face<'a>>> {
        self.adjacent_edges()?
            .into_iter()
            .map(|e| e.face())
            .collect()
    }

    /// Neighboring vertex indices in rotational order.
    pub fn adjacent_vertices(&self) -> KernelResult<Vec<usize>> {
        Ok(self.adjacent_edges()?.into_iter().map(|e| e.b).collect())
    }
}

/// Directed edge a→b of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge<'a> {
    pub(crate) poly: &'a Polyhedron,
    pub a: usize,
    pub b: usize,
}

impl<'a> Edge<'a> {
    pub fn mesh(&self) -> &'a Polyhedron {
        self.poly
    }

    /// The oppositely-directed edge; missing on a non-closed mesh.
    pub fn twin(&self) -> KernelResult<Edge<'a>> {
        if self.poly.edge_face_map().contains_key(&(self.b, self.a)) {
            Ok(Edge {
                poly: self.poly,
                a: self.b,
                b: self.a,
            })
        } else {
            Err(KernelError::invariant(format!(
                "edge ({}, {}) has no twin",
                self.a, self.b
            )))
        }
    }

    /// Face whose cycle contains this directed edge.
    pub fn face(&self) -> KernelResult<Face<'a>> {
        let fi = self
            .poly
            .edge_face_map()
            .get(&(self.a, self.b))
            .copied()
            .ok_or_else(|| {
                KernelError::invariant(format!(
                    "directed edge ({}, {}) belongs to no face",
                    self.a, self.b
                ))
            })?;
        Ok(self.poly.face(fi))
    }

    /// Next edge in the face cycle.
    pub fn next(&self) -> KernelResult<Edge<'a>> {
        let face = self.face()?;
        let verts = face.vertex_indices();
        let i = verts
            .iter()
            .position(|&v| v == self.b)
            .ok_or_else(|| KernelError::invariant("edge endpoint missing from its face"))?;
        Ok(Edge {
            poly: self.poly,
            a: self.b,
            b: verts[(i + 1) % verts.len()],
        })
    }

    /// Previous edge in the face cycle.
    pub fn prev(&self) -> KernelResult<Edge<'a>> {
        let face = self.face()?;
        let verts = face.vertex_indices();
        let i = verts
            .iter()
            .position(|&v| v == self.a)
            .ok_or_else(|| KernelError::invariant("edge endpoint missing from its face"))?;
        Ok(Edge {
            poly: self.poly,
            a: verts[(i + verts.len() - 1) % verts.len()],
            b: self.a,
        })
    }

    /// Canonical undirected identity: the direction whose second vertex
    /// index is larger.
    pub fn undirected(&self) -> (usize, usize) {
        if self.a < self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    pub fn endpoints(&self) -> (Point3d, Point3d) {
        (
            self.poly.vertex_position(self.a),
            self.poly.vertex_position(self.b),
        )
    }

    pub fn length(&self) -> f64 {
        let (pa, pb) = self.endpoints();
        pa.distance_to(&pb)
    }

    pub fn midpoint(&self) -> Point3d {
        let (pa, pb) = self.endpoints();
        pa.midpoint(&pb)
    }

    pub fn direction(&self) -> Vec3 {
        let (pa, pb) = self.endpoints();
        pb - pa
    }
}

/// Borrowing handle onto one face of a mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<'a> {
    pub(crate) poly: &'a Polyhedron,
    pub index: usize,
}

impl<'a> Face<'a> {
    pub fn mesh(&self) -> &'a Polyhedron {
        self.poly
    }

    pub fn sides(&self) -> usize {
        self.poly.face_vertices(self.index).len()
    }

    pub fn vertex_indices(&self) -> &'a [usize] {
        self.poly.face_vertices(self.index)
    }

    pub fn vertex_positions(&self) -> Vec<Point3d> {
        self.vertex_indices()
            .iter()
            .map(|&v| self.poly.vertex_position(v))
            .collect()
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.vertex_indices().contains(&vertex)
    }

    /// Directed edge cycle of the face.
    pub fn edges(&self) -> Vec<Edge<'a>> {
        self.vertex_indices()
            .iter()
            .circular_tuple_windows()
            .map(|(&a, &b)| Edge {
                poly: self.poly,
                a,
                b,
            })
            .collect()
    }

    /// The outgoing edge of this face starting at `vertex`.
    pub fn edge_from(&self, vertex: usize) -> KernelResult<Edge<'a>> {
        let verts = self.vertex_indices();
        let i = verts.iter().position(|&v| v == vertex).ok_or_else(|| {
            KernelError::invariant(format!("vertex {vertex} not on face {}", self.index))
        })?;
        Ok(Edge {
            poly: self.poly,
            a: vertex,
            b: verts[(i + 1) % verts.len()],
        })
    }

    pub fn centroid(&self) -> Point3d {
        centroid(&self.vertex_positions())
    }

    /// Best-fit plane; its normal follows the winding.
    pub fn plane(&self) -> KernelResult<Plane> {
        Plane::best_fit(&self.vertex_positions())
    }

    /// Outward normal, falling back to the radial direction on a degenerate
    /// face.
    pub fn normal(&self) -> Vec3 {
        match self.plane() {
            Ok(plane) => plane.normal,
            Err(_) => (self.centroid() - self.poly.centroid()).normalized_or_z(),
        }
    }

    pub fn edge_length(&self) -> f64 {
        let edges = self.edges();
        let total: f64 = edges.iter().map(Edge::length).sum();
        total / edges.len() as f64
    }

    /// Area by the regular-polygon formula over the mean edge length.
    pub fn area(&self) -> f64 {
        let n = self.sides() as f64;
        let s = self.edge_length();
        n * s * s / (4.0 * (std::f64::consts::PI / n).tan())
    }

    /// A face is valid when no edge collapses to zero length.
    pub fn is_valid(&self) -> bool {
        self.edges().iter().all(|e| e.length() > 1e-9)
    }

    /// Indices of faces sharing an edge with this one.
    pub fn adjacent_face_indices(&self) -> Vec<usize> {
        let map = self.poly.edge_face_map();
        self.edges()
            .iter()
            .filter_map(|e| map.get(&(e.b, e.a)).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Polyhedron {
        Polyhedron::new(
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
        )
    }

    #[test]
    fn test_vertex_walk_closes_with_degree() {
        let cube = cube();
        for v in cube.vertices() {
            let edges = v.adjacent_edges().unwrap();
            assert_eq!(edges.len(), 3);
            assert_eq!(edges.len(), v.degree());
        }
    }

    #[test]
    fn test_twin_reverses_direction() {
        let cube = cube();
        let e = cube.edge(0, 1);
        let t = e.twin().unwrap();
        assert_eq!((t.a, t.b), (1, 0));
        assert_ne!(e.face().unwrap().index, t.face().unwrap().index);
    }

    #[test]
    fn test_missing_twin_is_invariant_violation() {
        let open = Polyhedron::new(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        );
        assert!(open.edge(0, 1).twin().is_err());
    }

    #[test]
    fn test_face_normal_points_outward() {
        let cube = cube();
        for face in cube.faces() {
            let outward = face.centroid() - cube.centroid();
            assert!(face.normal().dot(&outward) > 0.0, "face {} inverted", face.index);
        }
    }

    #[test]
    fn test_square_area() {
        let cube = cube();
        let area = cube.face(0).area();
        assert!((area - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_next_prev_are_inverse() {
        let cube = cube();
        let e = cube.face(2).edges()[0];
        let back = e.next().unwrap().prev().unwrap();
        assert_eq!((back.a, back.b), (e.a, e.b));
    }
}
