//! End-to-end scenarios over the operation registry.

use crf_kernel::mesh::cap::{Cap, CapSearch};
use test_harness::{
    apply_named, apply_named_with, assert_animation_consistent, assert_closed_solid,
    assert_same_solid, load,
};
use transform_ops::OpOptions;
use crf_types::{FacetKind, Twist};

#[test]
fn truncating_the_tetrahedron_yields_the_truncated_tetrahedron() {
    let tetra = load("tetrahedron");
    let result = apply_named("truncate", &tetra).unwrap();
    assert_eq!(result.result.canonical_name(), "truncated tetrahedron");
    assert_closed_solid(&result.result.geom, "truncate tetrahedron");
    assert_same_solid(&result.result.geom, "truncated tetrahedron", "truncate");
    assert_animation_consistent(&result, "truncate tetrahedron");

    // The animation runs on the truncated topology, starting collapsed at
    // the original corners.
    assert_eq!(result.animation.start.vertex_count(), 12);
    let finished = result.animation.completed();
    assert!(finished.is_same(&result.result.geom));
}

#[test]
fn the_dual_of_the_cube_is_the_octahedron() {
    let cube = load("cube");
    let result = apply_named("dual", &cube).unwrap();
    assert_eq!(result.result.canonical_name(), "octahedron");
    assert_same_solid(&result.result.geom, "octahedron", "dual of cube");
    assert_animation_consistent(&result, "dual of cube");

    // Applying dual twice returns a congruent cube: same identity, same
    // edge length, same center.
    let back = apply_named("dual", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "cube");
    assert!(back.result.geom.is_same(&cube.geom));
    assert!((back.result.geom.edge_length() - cube.geom.edge_length()).abs() < 1e-6);
    assert!(
        back.result
            .geom
            .centroid()
            .distance_to(&cube.geom.centroid())
            < 1e-6
    );
}

#[test]
fn elongating_the_square_pyramid_yields_j8() {
    let pyramid = load("square pyramid");
    let result = apply_named("elongate", &pyramid).unwrap();
    assert_eq!(result.result.canonical_name(), "elongated square pyramid");
    assert_closed_solid(&result.result.geom, "elongate square pyramid");
    assert_animation_consistent(&result, "elongate square pyramid");

    // Shortening undoes it.
    let back = apply_named("shorten", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "square pyramid");
    assert!(back.result.geom.is_same(&pyramid.geom));
}

#[test]
fn diminishing_the_icosahedron_yields_j11() {
    let icosa = load("icosahedron");
    let result = apply_named("diminish", &icosa).unwrap();
    assert_eq!(
        result.result.canonical_name(),
        "gyroelongated pentagonal pyramid"
    );
    assert_closed_solid(&result.result.geom, "diminish icosahedron");
    assert_animation_consistent(&result, "diminish icosahedron");
    // One cap came off: eleven vertices remain.
    assert_eq!(result.result.geom.vertex_count(), 11);
}

#[test]
fn the_cuboctahedron_has_no_primary_caps() {
    let co = load("cuboctahedron");
    let caps = Cap::find_all(&co.geom, &CapSearch::default()).unwrap();
    assert!(caps.is_empty());
}

#[test]
fn contracting_needs_an_explicit_facet() {
    let rco = load("rhombicuboctahedron");
    assert!(apply_named("contract", &rco).is_err());

    let to_cube = apply_named_with(
        "contract",
        &rco,
        &OpOptions::default().with_facet(FacetKind::Face),
    )
    .unwrap();
    assert_eq!(to_cube.result.canonical_name(), "cube");

    let to_octa = apply_named_with(
        "contract",
        &rco,
        &OpOptions::default().with_facet(FacetKind::Vertex),
    )
    .unwrap();
    assert_eq!(to_octa.result.canonical_name(), "octahedron");
}

#[test]
fn snub_carries_chirality() {
    let cube = load("cube");
    let left = apply_named_with("snub", &cube, &OpOptions::default().with_twist(Twist::Left))
        .unwrap();
    let right = apply_named_with(
        "snub",
        &cube,
        &OpOptions::default().with_twist(Twist::Right),
    )
    .unwrap();
    assert_eq!(left.result.canonical_name(), "snub cube");
    assert_eq!(right.result.canonical_name(), "snub cube");
    // Mirror forms share a name but not an embedding.
    assert!(left.result.geom.is_same(&right.result.geom));
    assert!(
        transform_ops::pair::misfit(
            left.result.geom.vertex_positions(),
            right.result.geom.vertex_positions()
        ) > 1e-3
    );
}

#[test]
fn gyrating_the_cuboctahedron_crosses_to_the_orthobicupola() {
    let co = load("cuboctahedron");
    let result = apply_named("gyrate", &co).unwrap();
    assert_eq!(result.result.canonical_name(), "triangular orthobicupola");
    assert_animation_consistent(&result, "gyrate cuboctahedron");

    let back = apply_named("gyrate", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "cuboctahedron");
}

#[test]
fn turning_a_prism_makes_the_antiprism() {
    let prism = load("pentagonal prism");
    let result = apply_named("turn", &prism).unwrap();
    assert_eq!(result.result.canonical_name(), "pentagonal antiprism");
    assert_animation_consistent(&result, "turn pentagonal prism");

    let back = apply_named("turn", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "pentagonal prism");
}

#[test]
fn augmenting_the_cube_builds_j8() {
    let cube = load("cube");
    let result = apply_named("augment", &cube).unwrap();
    assert_eq!(result.result.canonical_name(), "elongated square pyramid");
    assert_animation_consistent(&result, "augment cube");

    let back = apply_named("diminish", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "cube");
    assert!(back.result.geom.is_same(&cube.geom));
}

#[test]
fn bidiminishing_follows_the_meta_para_choice() {
    use crf_types::Align;
    let j11 = load("gyroelongated pentagonal pyramid");

    // Ambiguous without the placement.
    assert!(apply_named("diminish", &j11).is_err());

    let meta = apply_named_with(
        "diminish",
        &j11,
        &OpOptions::default().with_align(Align::Meta),
    )
    .unwrap();
    assert_eq!(meta.result.canonical_name(), "metabidiminished icosahedron");

    let para = apply_named_with(
        "diminish",
        &j11,
        &OpOptions::default().with_align(Align::Para),
    )
    .unwrap();
    assert_eq!(para.result.canonical_name(), "pentagonal antiprism");
}

#[test]
fn cumulating_the_cuboctahedron_recovers_either_parent() {
    let co = load("cuboctahedron");
    let to_cube = apply_named_with(
        "cumulate",
        &co,
        &OpOptions::default().with_facet(FacetKind::Face),
    )
    .unwrap();
    assert_eq!(to_cube.result.canonical_name(), "cube");

    let to_octa = apply_named_with(
        "cumulate",
        &co,
        &OpOptions::default().with_facet(FacetKind::Vertex),
    )
    .unwrap();
    assert_eq!(to_octa.result.canonical_name(), "octahedron");
}

#[test]
fn twist_connects_the_cantellated_and_snub_forms() {
    let rco = load("rhombicuboctahedron");
    let result = apply_named_with(
        "twist",
        &rco,
        &OpOptions::default().with_twist(Twist::Left),
    )
    .unwrap();
    assert_eq!(result.result.canonical_name(), "snub cube");
    assert_animation_consistent(&result, "twist rhombicuboctahedron");

    let back = apply_named("twist", &result.result).unwrap();
    assert_eq!(back.result.canonical_name(), "rhombicuboctahedron");
}
