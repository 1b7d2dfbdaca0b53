use crf_kernel::mesh::audit::{audit, euler_characteristic};
use crf_kernel::mesh::polyhedron::Polyhedron;
use transform_ops::OpResult;

/// The mesh is closed and satisfies the Euler formula.
pub fn assert_closed_solid(poly: &Polyhedron, context: &str) {
    let report = audit(poly);
    assert!(
        report.all_valid(),
        "{context}: mesh audit failed: {:?}",
        report.errors
    );
    assert_eq!(
        euler_characteristic(poly),
        2,
        "{context}: V - E + F != 2 (V={}, E={}, F={})",
        report.vertices,
        report.edges,
        report.faces
    );
}

/// The mesh is the named catalog solid, up to relabeling and congruence.
pub fn assert_same_solid(poly: &Polyhedron, name: &str, context: &str) {
    let reference = crf_kernel::catalog::get(name)
        .unwrap_or_else(|err| panic!("{context}: reference {name:?} unavailable: {err}"));
    assert!(
        poly.is_same(&reference),
        "{context}: result is not the {name}"
    );
}

/// Index-for-index correspondence between the animation's endpoints.
pub fn assert_animation_consistent(result: &OpResult, context: &str) {
    let animation = &result.animation;
    assert_eq!(
        animation.start.vertex_count(),
        animation.end_vertices.len(),
        "{context}: interpolation arrays differ in length"
    );
    // The midpoint frame must still index cleanly.
    let mid = animation.at(0.5);
    assert_eq!(mid.len(), animation.start.vertex_count());
}
