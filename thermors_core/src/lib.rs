//! Core rust implementation of thermors, a crate for building the categorized constraints of
//! thermodynamics and expression based metabolic models.
//!
//! Constraints are labelled with a [`ConstraintKind`](optimize::kind::ConstraintKind), which
//! fixes the prefix of their name, and attached to the reaction, gene, enzyme or model they are
//! about.

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod optimize;
