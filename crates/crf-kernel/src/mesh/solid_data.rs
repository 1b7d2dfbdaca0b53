use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;

/// Raw exchange form of a mesh: positions plus vertex-index cycles.
///
/// Vertex order and face winding are stable across a derivation chain, so
/// exporters can rely on index correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidData {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<usize>>,
}

impl SolidData {
    pub fn positions(&self) -> Vec<Point3d> {
        self.vertices.iter().map(|v| Point3d::from_array(*v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let data = SolidData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            faces: vec![vec![0, 1, 2]],
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: SolidData = serde_json::from_str(&json).unwrap();
        assert_eq!(data, back);
    }
}
