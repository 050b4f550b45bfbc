//! Module for reading and writing the constraints of a Model
pub mod json;
