//! Module providing the Model struct for representing a metabolic model, and the entities
//! constraints can be attached to.

pub mod enzyme;
pub mod gene;
pub mod model;
pub mod reaction;
