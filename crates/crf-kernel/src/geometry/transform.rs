use super::point::Point3d;
use super::vector::Vec3;

/// Column-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub const ZERO: Mat3 = Mat3 {
        cols: [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO],
    };

    pub const IDENTITY: Mat3 = Mat3 {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Outer product a bᵀ.
    pub fn outer(a: &Vec3, b: &Vec3) -> Self {
        Self::from_cols(*a * b.x, *a * b.y, *a * b.z)
    }

    /// Rotation by `angle` around the unit `axis` (Rodrigues form).
    pub fn rotation(axis: &Vec3, angle: f64) -> Self {
        Self::from_cols(
            Vec3::X.rotated_about(axis, angle),
            Vec3::Y.rotated_about(axis, angle),
            Vec3::Z.rotated_about(axis, angle),
        )
    }

    pub fn add(&self, other: &Mat3) -> Mat3 {
        Mat3::from_cols(
            self.cols[0] + other.cols[0],
            self.cols[1] + other.cols[1],
            self.cols[2] + other.cols[2],
        )
    }

    pub fn scaled(&self, s: f64) -> Mat3 {
        Mat3::from_cols(self.cols[0] * s, self.cols[1] * s, self.cols[2] * s)
    }

    pub fn mul_vec(&self, v: &Vec3) -> Vec3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }

    pub fn mul_mat(&self, other: &Mat3) -> Mat3 {
        Mat3::from_cols(
            self.mul_vec(&other.cols[0]),
            self.mul_vec(&other.cols[1]),
            self.mul_vec(&other.cols[2]),
        )
    }

    pub fn transpose(&self) -> Mat3 {
        let [a, b, c] = self.cols;
        Mat3::from_cols(
            Vec3::new(a.x, b.x, c.x),
            Vec3::new(a.y, b.y, c.y),
            Vec3::new(a.z, b.z, c.z),
        )
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c] = self.cols;
        a.dot(&b.cross(&c))
    }

    /// Solve `self · x = b` by Cramer's rule; `None` when near-singular.
    pub fn solve(&self, b: &Vec3) -> Option<Vec3> {
        let det = self.determinant();
        if det.abs() < 1e-12 {
            return None;
        }
        let [c0, c1, c2] = self.cols;
        let x = Mat3::from_cols(*b, c1, c2).determinant() / det;
        let y = Mat3::from_cols(c0, *b, c2).determinant() / det;
        let z = Mat3::from_cols(c0, c1, *b).determinant() / det;
        Some(Vec3::new(x, y, z))
    }
}

/// A similarity transform: uniform scale + rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub linear: Mat3,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        linear: Mat3::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn translation(offset: Vec3) -> Self {
        Self {
            linear: Mat3::IDENTITY,
            translation: offset,
        }
    }

    pub fn scaling(factor: f64) -> Self {
        Self {
            linear: Mat3::IDENTITY.scaled(factor),
            translation: Vec3::ZERO,
        }
    }

    /// Rotation by `angle` around an axis through `center`.
    pub fn rotation_about(center: Point3d, axis: &Vec3, angle: f64) -> Self {
        let linear = Mat3::rotation(axis, angle);
        let c = center.to_vec3();
        Self {
            translation: c - linear.mul_vec(&c),
            linear,
        }
    }

    /// Apply `self`, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            linear: next.linear.mul_mat(&self.linear),
            translation: next.linear.mul_vec(&self.translation) + next.translation,
        }
    }

    pub fn apply(&self, p: &Point3d) -> Point3d {
        Point3d::ORIGIN + self.linear.mul_vec(&p.to_vec3()) + self.translation
    }

    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.linear.mul_vec(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_matrix_quarter_turn() {
        let rot = Mat3::rotation(&Vec3::Z, FRAC_PI_2);
        let v = rot.mul_vec(&Vec3::X);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_simple_system() {
        let m = Mat3::from_cols(Vec3::X * 2.0, Vec3::Y * 3.0, Vec3::Z * 4.0);
        let x = m.solve(&Vec3::new(2.0, 6.0, 12.0)).unwrap();
        assert!((x.x - 1.0).abs() < 1e-12);
        assert!((x.y - 2.0).abs() < 1e-12);
        assert!((x.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_about_center_fixes_center() {
        let center = Point3d::new(1.0, 2.0, 3.0);
        let t = Transform::rotation_about(center, &Vec3::Z, 1.234);
        let moved = t.apply(&center);
        assert!(moved.distance_to(&center) < 1e-12);
    }

    #[test]
    fn test_then_composes_in_order(){
        let a = Transform::scaling(2.0);
        let b = Transform::translation(Vec3::X);
        let t = a.then(&b);
        let p = t.apply(&Point3d::new(1.0, 0.0, 0.0));
        assert!((p.x - 3.0).abs() < 1e-12);
    }
}
