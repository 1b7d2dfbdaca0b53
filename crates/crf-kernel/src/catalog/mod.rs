//! Process-wide reference-geometry provider.
//!
//! Geometry is keyed by canonical name, built on first request, and cached
//! for the life of the process: write-once per name, read-many thereafter.
//! Every entry is normalized to unit edge length and centered on the
//! origin. The sporadic elementary Johnson solids have no closed-form
//! construction and stay with the external provider ([`KernelError::NotFound`]).

pub mod johnson;
pub mod uniform;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crf_types::{PolyhedronSpecs, Twist};
use tracing::debug;

use crate::error::{KernelError, KernelResult};
use crate::geometry::transform::Transform;
use crate::mesh::polyhedron::Polyhedron;

static CACHE: OnceLock<Mutex<HashMap<String, Arc<Polyhedron>>>> = OnceLock::new();

/// Cached, read-only reference mesh for a canonical name.
pub fn get(name: &str) -> KernelResult<Arc<Polyhedron>> {
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    if let Some(found) = cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
    {
        return Ok(found.clone());
    }

    // The lock is not held while building: a racing duplicate build of the
    // same immutable value is benign, and builds may recurse into `get`.
    let spec = PolyhedronSpecs::from_name(name).ok_or_else(|| KernelError::NotFound {
        name: name.to_string(),
    })?;
    let built = normalize(build(&spec)?);
    debug!(
        name,
        vertices = built.vertex_count(),
        faces = built.face_count(),
        "reference geometry built"
    );
    let arc = Arc::new(built);
    Ok(cache
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .entry(name.to_string())
        .or_insert(arc)
        .clone())
}

/// Reference geometry for a spec, with chirality applied: the catalog
/// stores the laevo form, and the right-handed copy is its reflection.
pub fn geometry_for(spec: &PolyhedronSpecs) -> KernelResult<Polyhedron> {
    let base = get(&spec.canonical_name())?;
    let poly = (*base).clone();
    let right_handed = match spec {
        PolyhedronSpecs::Classical(c) => c.twist == Some(Twist::Right),
        PolyhedronSpecs::Capstone(c) => c.twist == Some(Twist::Right),
        _ => false,
    };
    Ok(if right_handed { poly.reflect() } else { poly })
}

fn build(spec: &PolyhedronSpecs) -> KernelResult<Polyhedron> {
    match spec {
        PolyhedronSpecs::Classical(c) => uniform::build_classical(c),
        PolyhedronSpecs::Prismatic(p) => johnson::build_prismatic(p),
        PolyhedronSpecs::Capstone(c) => johnson::build_capstone(c),
        PolyhedronSpecs::Composite(c) => johnson::build_composite(c),
        PolyhedronSpecs::Elementary(e) => Err(KernelError::NotFound {
            name: e.canonical_name(),
        }),
    }
}

fn normalize(poly: Polyhedron) -> Polyhedron {
    let centered = poly.recentered();
    let edge = centered.edge_length();
    if edge < 1e-12 {
        return centered;
    }
    centered.transformed(&Transform::scaling(1.0 / edge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::audit::euler_characteristic;

    #[test]
    fn test_get_caches_by_name() {
        let a = get("tetrahedron").unwrap();
        let b = get("tetrahedron").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        assert!(matches!(
            get("hypercube"),
            Err(KernelError::NotFound { .. })
        ));
    }

    #[test]
    fn test_elementary_solids_stay_external() {
        assert!(matches!(
            get("snub disphenoid"),
            Err(KernelError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reference_geometry_is_normalized() {
        for name in ["cube", "icosahedron", "square cupola", "pentagonal antiprism"] {
            let poly = get(name).unwrap();
            assert!((poly.edge_length() - 1.0).abs() < 1e-9, "{name} not unit");
            assert!(
                poly.centroid().distance_to(&crate::geometry::point::Point3d::ORIGIN) < 1e-9,
                "{name} not centered"
            );
        }
    }

    #[test]
    fn test_catalog_euler_sweep() {
        for name in [
            "tetrahedron",
            "cube",
            "octahedron",
            "dodecahedron",
            "icosahedron",
            "truncated tetrahedron",
            "cuboctahedron",
            "rhombicuboctahedron",
            "truncated cuboctahedron",
            "snub cube",
            "icosidodecahedron",
            "rhombicosidodecahedron",
            "snub dodecahedron",
            "pentagonal prism",
            "hexagonal antiprism",
            "square pyramid",
            "pentagonal rotunda",
            "elongated square pyramid",
            "gyroelongated pentagonal pyramid",
            "gyrobifastigium",
            "augmented triangular prism",
            "metabidiminished icosahedron",
            "tridiminished icosahedron",
            "augmented truncated tetrahedron",
            "gyrate rhombicosidodecahedron",
        ] {
            let poly = get(name).unwrap();
            assert_eq!(euler_characteristic(&poly), 2, "Euler failed for {name}");
        }
    }

    #[test]
    fn test_johnson_counts() {
        let j11 = get("gyroelongated pentagonal pyramid").unwrap();
        assert_eq!(j11.vertex_count(), 11);
        assert_eq!(j11.face_count(), 16);

        let j8 = get("elongated square pyramid").unwrap();
        assert_eq!(j8.vertex_count(), 9);
        assert_eq!(j8.face_count(), 9);

        let j34 = get("pentagonal orthobirotunda").unwrap();
        assert_eq!(j34.vertex_count(), 30);
        assert_eq!(j34.face_count(), 32);
    }

    #[test]
    fn test_pseudo_rhombicuboctahedron_differs_from_true() {
        let rco = get("rhombicuboctahedron").unwrap();
        let pseudo = get("elongated square gyrobicupola").unwrap();
        assert_eq!(pseudo.vertex_count(), rco.vertex_count());
        assert!(!pseudo.is_same(&rco));
    }

    #[test]
    fn test_chiral_reference_reflects() {
        let spec = PolyhedronSpecs::from_name("snub cube").unwrap();
        let left = geometry_for(&spec).unwrap();
        if let PolyhedronSpecs::Classical(c) = spec {
            let right =
                geometry_for(&PolyhedronSpecs::Classical(c.with_twist(Twist::Right))).unwrap();
            assert!(left.is_same(&right));
            assert_ne!(left.vertex_positions()[0], right.vertex_positions()[0]);
        } else {
            panic!("snub cube should be classical");
        }
    }
}
