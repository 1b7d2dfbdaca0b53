use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A vector in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Unit vector, or `None` for a near-zero input.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-12 { None } else { Some(*self / len) }
    }

    /// Unit vector; falls back to `Z` for a near-zero input rather than
    /// producing NaNs.
    pub fn normalized_or_z(&self) -> Self {
        self.normalized().unwrap_or(Self::Z)
    }

    pub fn angle_to(&self, other: &Self) -> f64 {
        let len_product = self.length() * other.length();
        if len_product < 1e-12 {
            return 0.0;
        }
        (self.dot(other) / len_product).clamp(-1.0, 1.0).acos()
    }

    /// Signed angle from `self` to `other` around `axis` (right-hand rule).
    pub fn signed_angle_to(&self, other: &Self, axis: &Self) -> f64 {
        let cross = self.cross(other);
        cross.dot(axis).atan2(self.dot(other))
    }

    /// Component of `self` perpendicular to the (unit) direction `dir`.
    pub fn rejected_from(&self, dir: &Self) -> Self {
        *self - *dir * self.dot(dir)
    }

    /// Rodrigues rotation of `self` by `angle` around the unit `axis`.
    pub fn rotated_about(&self, axis: &Self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        *self * cos + axis.cross(self) * sin + *axis * (axis.dot(self) * (1.0 - cos))
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let result = Vec3::X.cross(&Vec3::Y);
        assert!((result.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_rejects_zero() {
        assert!(Vec3::ZERO.normalized().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_about_quarter_turn() {
        let rotated = Vec3::X.rotated_about(&Vec3::Z, FRAC_PI_2);
        assert!((rotated.x).abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_signed_angle_orientation() {
        let angle = Vec3::X.signed_angle_to(&Vec3::Y, &Vec3::Z);
        assert!((angle - FRAC_PI_2).abs() < 1e-12);
        let angle = Vec3::Y.signed_angle_to(&Vec3::X, &Vec3::Z);
        assert!((angle + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_rejected_from_is_perpendicular() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let r = v.rejected_from(&Vec3::Z);
        assert!(r.dot(&Vec3::Z).abs() < 1e-12);
        assert!((r.x - 1.0).abs() < 1e-12);
    }
}
