pub mod catalog;
pub mod error;
pub mod forme;
pub mod geometry;
pub mod mesh;

pub use error::{KernelError, KernelResult};
pub use forme::Forme;

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this (relative to unit edge length) coincide.
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-6,
            angular: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(
        &self,
        a: &geometry::point::Point3d,
        b: &geometry::point::Point3d,
    ) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
