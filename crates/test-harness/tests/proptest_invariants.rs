//! Property-based tests for mesh and geometry invariants using the
//! `proptest` crate.

use proptest::prelude::*;

use crf_kernel::catalog::johnson::{antiprism, cupola, prism, pyramid};
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::geometry::vector::Vec3;
use crf_kernel::mesh::audit::euler_characteristic;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary 3D coordinate tuple in a reasonable floating-point range.
fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
}

fn arb_axis() -> impl Strategy<Value = (f64, f64, f64)> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("axis must not vanish", |(x, y, z)| {
            x * x + y * y + z * z > 1e-2
        })
}

// ---------------------------------------------------------------------------
// 1. Euler formula for every parametric builder
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn parametric_solids_satisfy_euler(n in 3usize..=10) {
        prop_assert_eq!(euler_characteristic(&prism(n)), 2);
        prop_assert_eq!(euler_characteristic(&antiprism(n)), 2);
        if n <= 5 {
            prop_assert_eq!(euler_characteristic(&pyramid(n)), 2);
            prop_assert_eq!(euler_characteristic(&cupola(n)), 2);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Deduplication is idempotent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn deduplicate_is_idempotent(n in 3usize..=10, jitter in 0.0f64..1e-8) {
        let base = prism(n);
        // Stack the mesh on itself with sub-tolerance jitter: a worst case
        // for seam merging.
        let doubled = base.add_polyhedron(
            &base.with_vertices(
                base.vertex_positions()
                    .iter()
                    .map(|p| Point3d::new(p.x + jitter, p.y, p.z))
                    .collect(),
            ),
        );
        let once = doubled.deduplicate(1e-6);
        let twice = once.deduplicate(1e-6);
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// 3. Pose alignment maps origin, axis, and scale exactly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn pose_alignment_carries_frames(
        (ox, oy, oz) in arb_point(),
        (ax, ay, az) in arb_axis(),
        scale in 0.1f64..10.0,
    ) {
        let from = Pose::new(Point3d::ORIGIN, 1.0, Vec3::Z, Vec3::X);
        let axis = Vec3::new(ax, ay, az);
        let cross = if axis.cross(&Vec3::X).length() > 1e-3 { Vec3::X } else { Vec3::Y };
        let to = Pose::new(Point3d::new(ox, oy, oz), scale, axis, cross);

        let t = Pose::align(&from, &to).unwrap();
        let origin = t.apply(&from.origin);
        prop_assert!(origin.distance_to(&to.origin) < 1e-6);

        // One source-scale step along the source axis lands one
        // target-scale step along the target axis.
        let step = t.apply(&(from.origin + from.axis));
        let expected = to.origin + axis.normalized().unwrap() * scale;
        prop_assert!(step.distance_to(&expected) < 1e-6);
    }
}

// ---------------------------------------------------------------------------
// 4. Rigid alignment preserves shape identity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transformed_meshes_stay_the_same_solid(
        (ax, ay, az) in arb_axis(),
        angle in -3.1f64..3.1,
        n in 3usize..=8,
    ) {
        let solid = antiprism(n);
        let axis = Vec3::new(ax, ay, az).normalized().unwrap();
        let rotation = crf_kernel::geometry::transform::Transform::rotation_about(
            Point3d::ORIGIN,
            &axis,
            angle,
        );
        let moved = solid.transformed(&rotation);
        prop_assert!(moved.is_same(&solid));
        prop_assert_eq!(euler_characteristic(&moved), 2);
    }
}
