//! Named operations and the global registry.
//!
//! A public operation name can stand for several structurally distinct
//! sub-operations (one per pair side); dispatch tries each sub's domain in
//! order and the first match wins. Sub-domains from distinct pairs must be
//! mutually disjoint — a tested property, not an assumption.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crf_kernel::forme::Forme;

use crate::ops::cut_paste::{augment_pair, gyrate_pair};
use crate::ops::prismation::{elongate_pair, gyroelongate_pair, turn_pair};
use crate::ops::resize::{dual_pair, expand_pair, snub_pair, twist_pair};
use crate::ops::truncate::{rectify_pair, truncate_pair};
use crate::pair::{OpPair, apply_pair, matching_entries};
use crate::types::{EntryOpts, OpError, OpOptions, OpResult, OpsResult, Side};

/// One dispatchable sub-operation: a pair applied from one side.
pub type SubOp = (&'static dyn OpPair, Side);

/// A named operation over an ordered set of sub-operations.
pub struct Operation {
    pub name: &'static str,
    subs: Vec<SubOp>,
}

/// Compose several structurally distinct sub-operations under one public
/// name.
pub fn combine_ops(name: &'static str, subs: Vec<SubOp>) -> Operation {
    Operation { name, subs }
}

impl Operation {
    pub fn subs(&self) -> &[SubOp] {
        &self.subs
    }

    fn sub_matches(sub: &SubOp, forme: &Forme) -> bool {
        let (pair, side) = sub;
        let specs = forme.specs.canonicalize();
        pair.graph().iter().any(|e| *e.specs(*side) == specs)
    }

    /// True iff some graph entry's start matches the forme's specs.
    pub fn can_apply_to(&self, forme: &Forme) -> bool {
        self.subs.iter().any(|sub| Self::sub_matches(sub, forme))
    }

    /// True iff more than one entry matches, i.e. the caller must
    /// disambiguate before applying.
    pub fn has_options(&self, forme: &Forme) -> bool {
        self.matching_opts(forme).len() > 1
    }

    /// The intrinsic option sets of every matching entry.
    pub fn matching_opts(&self, forme: &Forme) -> Vec<EntryOpts> {
        let specs = forme.specs.canonicalize();
        let mut out = Vec::new();
        for (pair, side) in &self.subs {
            for entry in pair.graph() {
                if *entry.specs(*side) == specs {
                    out.push(entry.opts);
                }
            }
        }
        out
    }

    /// Apply to the first sub-operation whose domain contains the forme.
    pub fn apply(&self, forme: &Forme, options: &OpOptions) -> OpsResult<OpResult> {
        for sub @ (pair, side) in &self.subs {
            if Self::sub_matches(sub, forme) {
                return apply_pair(*pair, *side, forme, options);
            }
        }
        Err(OpError::NotApplicable {
            op: self.name,
            name: forme.canonical_name(),
        })
    }

    /// Whether the given options select exactly one entry.
    pub fn options_resolve(&self, forme: &Forme, options: &OpOptions) -> bool {
        self.subs
            .iter()
            .map(|(pair, side)| matching_entries(pair.graph(), *side, forme, options).len())
            .sum::<usize>()
            == 1
    }
}

/// The process-wide named-operation registry: populated once, read-only
/// thereafter.
pub fn registry() -> &'static BTreeMap<&'static str, Operation> {
    static REGISTRY: OnceLock<BTreeMap<&'static str, Operation>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = BTreeMap::new();
        let mut insert = |op: Operation| {
            map.insert(op.name, op);
        };
        insert(combine_ops("truncate", vec![(truncate_pair(), Side::Left)]));
        insert(combine_ops("sharpen", vec![(truncate_pair(), Side::Right)]));
        insert(combine_ops("rectify", vec![(rectify_pair(), Side::Left)]));
        insert(combine_ops("cumulate", vec![(rectify_pair(), Side::Right)]));
        insert(combine_ops("expand", vec![(expand_pair(), Side::Left)]));
        insert(combine_ops("snub", vec![(snub_pair(), Side::Left)]));
        insert(combine_ops(
            "contract",
            vec![(expand_pair(), Side::Right), (snub_pair(), Side::Right)],
        ));
        insert(combine_ops(
            "twist",
            vec![(twist_pair(), Side::Left), (twist_pair(), Side::Right)],
        ));
        insert(combine_ops(
            "dual",
            vec![(dual_pair(), Side::Left), (dual_pair(), Side::Right)],
        ));
        insert(combine_ops("elongate", vec![(elongate_pair(), Side::Left)]));
        insert(combine_ops(
            "gyroelongate",
            vec![(gyroelongate_pair(), Side::Left)],
        ));
        insert(combine_ops(
            "shorten",
            vec![
                (elongate_pair(), Side::Right),
                (gyroelongate_pair(), Side::Right),
            ],
        ));
        insert(combine_ops(
            "turn",
            vec![(turn_pair(), Side::Left), (turn_pair(), Side::Right)],
        ));
        insert(combine_ops("augment", vec![(augment_pair(), Side::Left)]));
        insert(combine_ops("diminish", vec![(augment_pair(), Side::Right)]));
        insert(combine_ops(
            "gyrate",
            vec![(gyrate_pair(), Side::Left), (gyrate_pair(), Side::Right)],
        ));
        map
    })
}

/// Look up a named operation.
pub fn operation(name: &str) -> Option<&'static Operation> {
    registry().get(name)
}

/// Apply a named operation to a forme.
pub fn apply(name: &str, forme: &Forme, options: &OpOptions) -> OpsResult<OpResult> {
    let op = operation(name).ok_or(OpError::NotApplicable {
        op: "unknown",
        name: name.to_string(),
    })?;
    op.apply(forme, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_sixteen_operations() {
        let names: Vec<&str> = registry().keys().copied().collect();
        for expected in [
            "augment",
            "contract",
            "cumulate",
            "diminish",
            "dual",
            "elongate",
            "expand",
            "gyrate",
            "gyroelongate",
            "rectify",
            "sharpen",
            "shorten",
            "snub",
            "truncate",
            "turn",
            "twist",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn test_can_apply_checks_domain() {
        let cube = Forme::load_name("cube").unwrap();
        assert!(operation("truncate").unwrap().can_apply_to(&cube));
        assert!(operation("dual").unwrap().can_apply_to(&cube));
        assert!(!operation("shorten").unwrap().can_apply_to(&cube));
        assert!(operation("turn").unwrap().can_apply_to(&cube));
    }

    #[test]
    fn test_contract_needs_a_facet_option() {
        let rco = Forme::load_name("rhombicuboctahedron").unwrap();
        let contract = operation("contract").unwrap();
        assert!(contract.can_apply_to(&rco));
        assert!(contract.has_options(&rco));
        assert!(matches!(
            contract.apply(&rco, &OpOptions::default()),
            Err(OpError::AmbiguousOptions { .. })
        ));
    }
}
