//! Combinatorial taxonomy of the convex regular-faced (CRF) solids.
//!
//! Every solid in the 120-entry catalog is identified by a small structural
//! record rather than by geometry. Two specs are equal iff their structural
//! data matches, regardless of any embedding.
//!
//! # Key Components
//!
//! - [`PolyhedronSpecs`] — tagged union over the five spec variants
//! - [`Classical`] — Platonic and Archimedean solids by family and form
//! - [`Prismatic`] — prisms and antiprisms
//! - [`Capstone`] — pyramid/cupola/rotunda solids and their elongations
//! - [`Composite`] — augmented / diminished / gyrate modifications
//! - [`Elementary`] — the sporadic Johnson solids
//!
//! Canonical names derive deterministically from the structural data and are
//! the lookup keys for reference geometry. Degenerate entries fold onto their
//! canonical identity (e.g. the square bipyramid folds to the octahedron).

pub mod capstone;
pub mod classical;
pub mod common;
pub mod composite;
pub mod elementary;
pub mod names;
pub mod prismatic;
pub mod specs;

pub use capstone::{Capstone, CapstoneKind, Elongation};
pub use classical::{Classical, ClassicalForm};
pub use common::{Align, Family, FacetKind, Gyration, Twist};
pub use composite::{Composite, CompositeBase};
pub use elementary::Elementary;
pub use prismatic::{Prismatic, PrismaticKind};
pub use specs::PolyhedronSpecs;
