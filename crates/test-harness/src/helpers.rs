use crf_kernel::forme::Forme;
use transform_ops::{OpOptions, OpResult, OpsResult, operation};

/// Reference forme for a canonical name; panics on unknown names because a
/// missing fixture is a bug in the test, not a condition under test.
pub fn load(name: &str) -> Forme {
    match Forme::load_name(name) {
        Ok(forme) => forme,
        Err(err) => panic!("fixture {name:?} unavailable: {err}"),
    }
}

/// Apply a registry operation with default options.
pub fn apply_named(op: &str, forme: &Forme) -> OpsResult<OpResult> {
    apply_named_with(op, forme, &OpOptions::default())
}

/// Apply a registry operation with explicit options.
pub fn apply_named_with(op: &str, forme: &Forme, options: &OpOptions) -> OpsResult<OpResult> {
    let operation = operation(op).unwrap_or_else(|| panic!("no operation named {op:?}"));
    operation.apply(forme, options)
}

/// Canonical solids that exercise every operation family.
pub fn sweep_names() -> Vec<&'static str> {
    vec![
        "tetrahedron",
        "cube",
        "octahedron",
        "dodecahedron",
        "icosahedron",
        "cuboctahedron",
        "truncated tetrahedron",
        "truncated cube",
        "rhombicuboctahedron",
        "snub cube",
        "icosidodecahedron",
        "square pyramid",
        "pentagonal pyramid",
        "square cupola",
        "pentagonal rotunda",
        "elongated square pyramid",
        "gyroelongated pentagonal pyramid",
        "pentagonal prism",
        "square antiprism",
        "triangular orthobicupola",
        "gyrobifastigium",
    ]
}
