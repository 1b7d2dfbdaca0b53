use super::point::Point3d;
use super::transform::{Mat3, Transform};
use super::vector::Vec3;
use crate::error::{KernelError, KernelResult};

/// A canonical frame extracted from a concrete realization: an origin, a
/// uniform scale, and two independent axis directions.
///
/// Mapping one pose onto another is how two reference geometries are brought
/// into a single coordinate system before interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub origin: Point3d,
    pub scale: f64,
    /// Primary direction (e.g. a facet normal).
    pub axis: Vec3,
    /// Secondary direction, independent of `axis` (e.g. toward a boundary
    /// vertex); only its component perpendicular to `axis` matters.
    pub cross: Vec3,
}

impl Pose {
    pub fn new(origin: Point3d, scale: f64, axis: Vec3, cross: Vec3) -> Self {
        Self {
            origin,
            scale,
            axis,
            cross,
        }
    }

    /// Right-handed orthonormal frame with `axis` as the first column.
    pub fn frame(&self) -> KernelResult<Mat3> {
        let e1 = self
            .axis
            .normalized()
            .ok_or_else(|| KernelError::degenerate("pose axis is zero"))?;
        let e2 = self
            .cross
            .rejected_from(&e1)
            .normalized()
            .ok_or_else(|| KernelError::degenerate("pose cross axis parallel to axis"))?;
        Ok(Mat3::from_cols(e1, e2, e1.cross(&e2)))
    }

    /// Rigid rotation + translation + uniform scale carrying `from` onto
    /// `to`: origins map to origins, frames to frames, scales to scales.
    pub fn align(from: &Pose, to: &Pose) -> KernelResult<Transform> {
        if from.scale.abs() < 1e-12 {
            return Err(KernelError::degenerate("pose scale is zero"));
        }
        let rotation = to.frame()?.mul_mat(&from.frame()?.transpose());
        let linear = rotation.scaled(to.scale / from.scale);
        let translation = to.origin.to_vec3() - linear.mul_vec(&from.origin.to_vec3());
        Ok(Transform {
            linear,
            translation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_maps_origin_and_axis() {
        let from = Pose::new(Point3d::ORIGIN, 1.0, Vec3::Z, Vec3::X);
        let to = Pose::new(Point3d::new(5.0, 0.0, 0.0), 2.0, Vec3::X, Vec3::Y);
        let t = Pose::align(&from, &to).unwrap();

        let origin = t.apply(&from.origin);
        assert!(origin.distance_to(&to.origin) < 1e-12);

        // A unit step along the source axis becomes two units along the
        // target axis.
        let p = t.apply(&Point3d::new(0.0, 0.0, 1.0));
        assert!(p.distance_to(&Point3d::new(7.0, 0.0, 0.0)) < 1e-12);
    }

    #[test]
    fn test_align_identity_when_poses_match() {
        let pose = Pose::new(Point3d::new(1.0, 2.0, 3.0), 1.5, Vec3::Y, Vec3::Z);
        let t = Pose::align(&pose, &pose).unwrap();
        let p = Point3d::new(-4.0, 0.5, 2.0);
        assert!(t.apply(&p).distance_to(&p) < 1e-12);
    }

    #[test]
    fn test_degenerate_cross_axis_rejected() {
        let pose = Pose::new(Point3d::ORIGIN, 1.0, Vec3::Z, Vec3::Z);
        assert!(pose.frame().is_err());
    }
}
