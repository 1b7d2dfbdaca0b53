//! Shared helpers for the end-to-end transformation suites.
//!
//! # Key Components
//!
//! - [`helpers`] — forme loading and one-call operation application
//! - [`assertions`] — mesh and animation assertions with diagnostics

pub mod assertions;
pub mod helpers;

pub use assertions::{assert_animation_consistent, assert_closed_solid, assert_same_solid};
pub use helpers::{apply_named, apply_named_with, load};
