//! Operation-graph engine for CRF-solid transformations.
//!
//! Maps (solid, named operation, options) triples to result solids and the
//! aligned vertex data needed to animate the change smoothly.
//!
//! # Key Components
//!
//! - [`pair::OpPair`] — one definition per inverse pair of operations
//! - [`pair::apply_pair`] — alignment + interpolation-array engine
//! - [`operation::Operation`] — named, dispatchable operation groups
//! - [`operation::registry`] — the process-wide read-only name map
//! - [`ops`] — the concrete geometric algorithms
//!
//! The core is synchronous, pure computation over immutable values; the
//! contract ends at producing `{start, end_vertices}` for the caller's
//! animation layer.

pub mod classify;
pub mod operation;
pub mod ops;
pub mod pair;
pub mod types;

pub use operation::{Operation, apply, combine_ops, operation, registry};
pub use pair::{GraphEntry, MiddleData, OpPair, PairCtx, apply_pair};
pub use types::{Animation, EntryOpts, OpError, OpOptions, OpResult, OpsResult, Side};
