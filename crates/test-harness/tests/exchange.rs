//! Exchange-format stability: serialized meshes keep vertex order and face
//! winding across a derivation chain.

use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_kernel::mesh::solid_data::SolidData;
use test_harness::{apply_named, load};

#[test]
fn solid_data_round_trips_through_json() {
    let cube = load("cube");
    let data = cube.geom.to_data();
    let json = serde_json::to_string(&data).unwrap();
    let back: SolidData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, data);
    let rebuilt = Polyhedron::from_data(&back);
    assert!(rebuilt.is_same(&cube.geom));
    assert_eq!(rebuilt.vertex_positions(), cube.geom.vertex_positions());
}

#[test]
fn derivation_chains_keep_index_stability() {
    let cube = load("cube");
    let moved = cube.geom.with_vertices(
        cube.geom
            .vertex_positions()
            .iter()
            .map(|p| crf_kernel::geometry::point::Point3d::new(p.x + 2.0, p.y, p.z))
            .collect(),
    );
    // Same faces, same winding, same vertex order.
    assert_eq!(moved.face_lists(), cube.geom.face_lists());

    let trimmed = moved.without_faces(&[0]);
    assert_eq!(trimmed.vertex_count(), moved.vertex_count());
    assert_eq!(trimmed.face_count(), moved.face_count() - 1);
}

#[test]
fn animation_endpoints_serialize_consistently() {
    let tetra = load("tetrahedron");
    let result = apply_named("truncate", &tetra).unwrap();
    let start = result.animation.start.to_data();
    assert_eq!(start.vertices.len(), result.animation.end_vertices.len());
    let json = serde_json::to_string(&start).unwrap();
    let back: SolidData = serde_json::from_str(&json).unwrap();
    assert_eq!(back.faces, start.faces);
}
