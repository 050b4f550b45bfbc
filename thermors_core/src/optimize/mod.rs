//! Module for building the categorized constraints of a model's optimization problem

pub mod constraint;
pub mod expression;
pub mod kind;
pub mod variable;
