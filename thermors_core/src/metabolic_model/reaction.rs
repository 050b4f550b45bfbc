//! This module provides a struct for representing reactions
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    #[builder(setter(into))]
    pub(crate) id: String,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "-1000.")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "1000.")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Ids of the enzymes able to catalyze the reaction
    #[builder(default = "Vec::new()")]
    pub enzymes: Vec<String>,
    /// Id of the model holding this reaction, set when the reaction is added to a model
    #[builder(setter(skip), default = "None")]
    pub(crate) model: Option<String>,
}

impl Reaction {
    /// Id of the reaction, fixed once the reaction is built
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the model holding the reaction
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Whether the reaction is catalyzed by at least one enzyme
    pub fn is_catalyzed(&self) -> bool {
        !self.enzymes.is_empty()
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
