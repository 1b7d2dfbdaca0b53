//! Cross-cutting properties of the operation graph.

use std::collections::BTreeSet;

use crf_kernel::mesh::audit::euler_characteristic;
use test_harness::helpers::{apply_named_with, load, sweep_names};
use test_harness::{apply_named, assert_animation_consistent};
use transform_ops::{OpOptions, Side, registry};
use crf_types::{Align, FacetKind, Twist};

// ---------------------------------------------------------------------------
// Euler and animation-length invariants across every unambiguous
// (operation, solid) application
// ---------------------------------------------------------------------------

#[test]
fn every_application_preserves_euler_and_index_correspondence() {
    let mut applied = 0usize;
    for (name, op) in registry() {
        for solid in sweep_names() {
            let forme = load(solid);
            if !op.can_apply_to(&forme) {
                continue;
            }
            let options = OpOptions::default();
            if !op.options_resolve(&forme, &options) {
                continue;
            }
            let result = op
                .apply(&forme, &options)
                .unwrap_or_else(|e| panic!("{name} on {solid} failed: {e}"));
            applied += 1;
            assert_animation_consistent(&result, &format!("{name} on {solid}"));
            assert_eq!(
                euler_characteristic(&result.result.geom),
                2,
                "{name} on {solid} broke the Euler formula"
            );
            // The result realizes its own claimed identity.
            let reference = crf_kernel::catalog::get(&result.result.canonical_name()).unwrap();
            assert!(
                result.result.geom.is_same(&reference),
                "{name} on {solid} mislabeled its result"
            );
        }
    }
    // The sweep must actually exercise a substantial slice of the graph.
    assert!(applied > 25, "only {applied} applications ran");
}

// ---------------------------------------------------------------------------
// Round trips: every pair's two directions are exact inverses
// ---------------------------------------------------------------------------

fn round_trip(forward: &str, backward: &str, solid: &str, fwd: OpOptions, back: OpOptions) {
    let original = load(solid);
    let there = apply_named_with(forward, &original, &fwd)
        .unwrap_or_else(|e| panic!("{forward} on {solid}: {e}"));
    let back_again = apply_named_with(backward, &there.result, &back).unwrap_or_else(|e| {
        panic!(
            "{backward} on {} (from {forward} {solid}): {e}",
            there.result.canonical_name()
        )
    });
    assert!(
        back_again.result.geom.is_same(&original.geom),
        "{forward}/{backward} did not round-trip the {solid}"
    );
}

#[test]
fn truncate_sharpen_round_trips() {
    for solid in ["tetrahedron", "cube", "dodecahedron", "cuboctahedron"] {
        round_trip(
            "truncate",
            "sharpen",
            solid,
            OpOptions::default(),
            OpOptions::default(),
        );
    }
}

#[test]
fn rectify_cumulate_round_trips() {
    round_trip(
        "rectify",
        "cumulate",
        "cube",
        OpOptions::default(),
        OpOptions::default().with_facet(FacetKind::Face),
    );
    round_trip(
        "rectify",
        "cumulate",
        "icosahedron",
        OpOptions::default(),
        OpOptions::default().with_facet(FacetKind::Vertex),
    );
}

#[test]
fn expand_contract_round_trips() {
    round_trip(
        "expand",
        "contract",
        "cube",
        OpOptions::default(),
        OpOptions::default().with_facet(FacetKind::Face),
    );
    round_trip(
        "expand",
        "contract",
        "octahedron",
        OpOptions::default(),
        OpOptions::default().with_facet(FacetKind::Vertex),
    );
    round_trip(
        "expand",
        "contract",
        "dodecahedron",
        OpOptions::default(),
        OpOptions::default().with_facet(FacetKind::Face),
    );
}

#[test]
fn snub_contract_round_trips() {
    round_trip(
        "snub",
        "contract",
        "cube",
        OpOptions::default().with_twist(Twist::Left),
        OpOptions::default().with_facet(FacetKind::Face),
    );
}

#[test]
fn elongation_round_trips() {
    round_trip(
        "elongate",
        "shorten",
        "square pyramid",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "elongate",
        "shorten",
        "square cupola",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "gyroelongate",
        "shorten",
        "pentagonal pyramid",
        OpOptions::default(),
        OpOptions::default(),
    );
}

#[test]
fn augment_diminish_round_trips() {
    round_trip(
        "augment",
        "diminish",
        "cube",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "augment",
        "diminish",
        "pentagonal antiprism",
        OpOptions::default().with_align(Align::Para),
        OpOptions::default().with_align(Align::Para),
    );
}

#[test]
fn self_inverse_operations_round_trip() {
    round_trip("dual", "dual", "cube", OpOptions::default(), OpOptions::default());
    round_trip(
        "dual",
        "dual",
        "tetrahedron",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "turn",
        "turn",
        "pentagonal prism",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "gyrate",
        "gyrate",
        "triangular orthobicupola",
        OpOptions::default(),
        OpOptions::default(),
    );
    round_trip(
        "twist",
        "twist",
        "rhombicuboctahedron",
        OpOptions::default().with_twist(Twist::Left),
        OpOptions::default(),
    );
}

// ---------------------------------------------------------------------------
// Collapsing directions finish cleanly: interpolation completion plus
// deduplication reproduces the result identity
// ---------------------------------------------------------------------------

#[test]
fn collapse_completions_match_their_results() {
    let cases: Vec<(&str, &str, OpOptions)> = vec![
        ("sharpen", "truncated tetrahedron", OpOptions::default()),
        ("sharpen", "truncated cube", OpOptions::default()),
        (
            "cumulate",
            "cuboctahedron",
            OpOptions::default().with_facet(FacetKind::Face),
        ),
        (
            "contract",
            "rhombicuboctahedron",
            OpOptions::default().with_facet(FacetKind::Vertex),
        ),
        ("shorten", "elongated square pyramid", OpOptions::default()),
        ("gyrate", "cuboctahedron", OpOptions::default()),
    ];
    for (op, solid, options) in cases {
        let forme = load(solid);
        let result = apply_named_with(op, &forme, &options)
            .unwrap_or_else(|e| panic!("{op} on {solid}: {e}"));
        let finished = result.animation.completed();
        assert!(
            finished.is_same(&result.result.geom),
            "{op} on {solid}: completed interpolation is not the result"
        );
    }
}

// ---------------------------------------------------------------------------
// Disjointness: sub-operations combined under one name never share a
// domain across distinct pairs
// ---------------------------------------------------------------------------

#[test]
fn combined_sub_operations_have_disjoint_domains() {
    for (name, op) in registry() {
        let subs = op.subs();
        for i in 0..subs.len() {
            for j in (i + 1)..subs.len() {
                let (pair_a, side_a) = subs[i];
                let (pair_b, side_b) = subs[j];
                if std::ptr::eq(
                    pair_a as *const _ as *const u8,
                    pair_b as *const _ as *const u8,
                ) {
                    // Two sides of one pair share a definition, not a domain
                    // claim; self-dual entries may legitimately meet there.
                    continue;
                }
                let domain = |pair: &dyn transform_ops::OpPair, side: Side| -> BTreeSet<String> {
                    pair.graph()
                        .iter()
                        .map(|e| e.specs(side).canonical_name())
                        .collect()
                };
                let overlap: Vec<String> = domain(pair_a, side_a)
                    .intersection(&domain(pair_b, side_b))
                    .cloned()
                    .collect();
                assert!(
                    overlap.is_empty(),
                    "{name}: sub-operations {i} and {j} overlap on {overlap:?}"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unknown and inapplicable requests fail loudly
// ---------------------------------------------------------------------------

#[test]
fn inapplicable_operations_are_rejected() {
    let cube = load("cube");
    assert!(apply_named("shorten", &cube).is_err());
    assert!(apply_named("gyrate", &cube).is_err());

    let j11 = load("gyroelongated pentagonal pyramid");
    assert!(apply_named("truncate", &j11).is_err());
}
