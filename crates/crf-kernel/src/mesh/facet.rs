use crate::geometry::point::Point3d;
use crate::geometry::pose::Pose;
use crate::geometry::vector::Vec3;
use crate::geometry::Ray;

use super::handles::{Edge, Face, Vertex};
use super::polyhedron::Polyhedron;

/// Shared capability of anything on a mesh with a position and a direction:
/// vertices, edges, faces, and caps. Pose-alignment code is written once
/// against this trait.
pub trait Facet {
    fn mesh(&self) -> &Polyhedron;

    fn centroid(&self) -> Point3d;

    /// Outward direction of the facet.
    fn normal(&self) -> Vec3;

    fn distance_to_center(&self) -> f64 {
        self.centroid().distance_to(&self.mesh().centroid())
    }

    fn normal_ray(&self) -> Ray {
        Ray::new(self.centroid(), self.normal())
    }

    /// Canonical frame anchored at this facet: origin at the centroid, axis
    /// along the normal.
    fn pose(&self, scale: f64, cross: Vec3) -> Pose {
        Pose::new(self.centroid(), scale, self.normal(), cross)
    }
}

impl Facet for Vertex<'_> {
    fn mesh(&self) -> &Polyhedron {
        self.poly
    }

    fn centroid(&self) -> Point3d {
        self.pos()
    }

    fn normal(&self) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for &fi in self.face_indices() {
            sum = sum + self.poly.face(fi).normal();
        }
        sum.normalized()
            .unwrap_or_else(|| (self.pos() - self.poly.centroid()).normalized_or_z())
    }
}

impl Facet for Edge<'_> {
    fn mesh(&self) -> &Polyhedron {
        self.poly
    }

    fn centroid(&self) -> Point3d {
        self.midpoint()
    }

    fn normal(&self) -> Vec3 {
        let map = self.poly.edge_face_map();
        let mut sum = Vec3::ZERO;
        for key in [(self.a, self.b), (self.b, self.a)] {
            if let Some(&fi) = map.get(&key) {
                sum = sum + self.poly.face(fi).normal();
            }
        }
        sum.normalized()
            .unwrap_or_else(|| (self.midpoint() - self.poly.centroid()).normalized_or_z())
    }
}

impl Facet for Face<'_> {
    fn mesh(&self) -> &Polyhedron {
        self.poly
    }

    fn centroid(&self) -> Point3d {
        Face::centroid(self)
    }

    fn normal(&self) -> Vec3 {
        Face::normal(self)
    }
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
                Point3d::new(0.0, 0.0, 0.7071),
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

    #[test]
    fn test_vertex_normal_at_apex_points_up() {
        let p = square_pyramid();
        let apex = p.vertex(4);
        let n = Facet::normal(&apex);
        assert!(n.z > 0.9);
    }

    #[test]
    fn test_edge_normal_averages_faces() {
        let p = square_pyramid();
        let e = p.edge(0, 1);
        let n = Facet::normal(&e);
        // Between the base (down) and a lateral face (up-and-out).
        assert!(n.y < 0.0);
    }

    #[test]
    fn test_facet_ray_leaves_the_solid() {
        let p = square_pyramid();
        for face in p.faces() {
            let ray = face.normal_ray();
            let outside = ray.at(1.0);
            assert!(
                outside.distance_to(&p.centroid()) > face.centroid().distance_to(&p.centroid())
            );
        }
    }
}
