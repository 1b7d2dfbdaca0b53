use super::point::{Point3d, centroid};
use super::vector::Vec3;
use crate::error::{KernelError, KernelResult};

/// An oriented plane through a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3d,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Point3d, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Best-fit plane through an ordered vertex cycle. The normal follows
    /// the winding (Newell's method), so faces wound counterclockwise seen
    /// from outside get outward normals.
    pub fn best_fit(points: &[Point3d]) -> KernelResult<Plane> {
        if points.len() < 3 {
            return Err(KernelError::degenerate(format!(
                "plane fit needs 3 points, got {}",
                points.len()
            )));
        }
        let mut normal = Vec3::ZERO;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        let normal = normal
            .normalized()
            .ok_or_else(|| KernelError::degenerate("plane fit over collinear points"))?;
        Ok(Plane::new(centroid(points), normal))
    }

    /// Signed distance, positive on the normal side.
    pub fn signed_distance(&self, p: &Point3d) -> f64 {
        (*p - self.point).dot(&self.normal)
    }

    /// Orthogonal projection onto the plane.
    pub fn project(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.signed_distance(p)
    }

    /// Whether every point lies within `tol` of the plane.
    pub fn contains_all(&self, points: &[Point3d], tol: f64) -> bool {
        points.iter().all(|p| self.signed_distance(p).abs() < tol)
    }
}

/// Point minimizing squared distance to a set of planes (exact intersection
/// when three independent planes meet). Used to recover the apex a set of
/// face planes converges to.
pub fn planes_intersection(planes: &[Plane]) -> KernelResult<Point3d> {
    use super::transform::Mat3;

    if planes.len() < 3 {
        return Err(KernelError::degenerate(
            "apex recovery needs at least 3 planes",
        ));
    }
    // Normal equations: (Σ n nᵀ) x = Σ n (n·p)
    let mut a = Mat3::ZERO;
    let mut b = Vec3::ZERO;
    for plane in planes {
        let n = plane.normal;
        let d = n.dot(&plane.point.to_vec3());
        a = a.add(&Mat3::outer(&n, &n));
        b = b + n * d;
    }
    let x = a
        .solve(&b)
        .ok_or_else(|| KernelError::degenerate("apex planes are near-parallel"))?;
    Ok(Point3d::ORIGIN + x)
}
