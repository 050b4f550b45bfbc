//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::optimize::kind::VariableKind;

/// A variable of the model's optimization problem
///
/// # Examples
/// ```rust
/// use thermors_core::optimize::variable::{VariableBuilder, VariableType};
/// let x = VariableBuilder::default()
///     .id("x")
///     .variable_type(VariableType::Binary)
///     .lower_bound(0.0)
///     .upper_bound(1.0)
///     .build()
///     .unwrap();
/// assert!(x.is_integer());
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Variable {
    /// Used to identify the variable
    #[builder(setter(into))]
    pub id: String,
    /// Human readable name of the variable
    #[builder(default = "None", setter(into, strip_option))]
    pub name: Option<String>,
    /// Type of the variable, see [`VariableType`]
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// The lowest value the variable can take
    #[builder(default = "CONFIGURATION.read().lower_bound")]
    pub lower_bound: f64,
    /// The highest value the variable can take
    #[builder(default = "CONFIGURATION.read().upper_bound")]
    pub upper_bound: f64,
    /// Kind of the variable, None for variables not built on an entity of the model
    #[builder(default = "None", setter(strip_option))]
    pub kind: Option<VariableKind>,
    /// Id of the entity the variable is built on, see
    /// [`Model::rebuild_variable`](crate::metabolic_model::model::Model::rebuild_variable)
    #[builder(default = "None", setter(into, strip_option))]
    pub hook_id: Option<String>,
}

impl Variable {
    /// Whether the variable only takes integer values
    pub fn is_integer(&self) -> bool {
        matches!(
            self.variable_type,
            VariableType::Integer | VariableType::Binary
        )
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", name, self.variable_type),
            None => write!(f, "{}:{}", self.id, self.variable_type),
        }
    }
}

/// Represents the type of variable in an optimization problem
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, Serialize, Deserialize)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
    /// Binary Variable
    Binary,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
            VariableType::Binary => write!(f, "BINARY"),
        }
    }
}

/// Errors associated with variables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VariableError {
    /// Error when looking up a variable kind by a name that doesn't exist
    #[error("Unknown variable kind {0}")]
    UnknownKind(String),
}
