//! This module provides the Enzyme struct, representing a catalytic protein complex
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents an enzyme, built from one or more peptides (see `composition`)
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Enzyme {
    /// Used to identify the enzyme
    #[builder(setter(into))]
    pub(crate) id: String,
    /// Human Readable Enzyme Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Turnover number in the forward direction (1/s)
    #[builder(default = "0.")]
    pub kcat_fwd: f64,
    /// Turnover number in the backward direction (1/s)
    #[builder(default = "0.")]
    pub kcat_bwd: f64,
    /// Degradation rate constant (1/h)
    #[builder(default = "0.")]
    pub kdeg: f64,
    /// Peptide composition of the enzyme, map of gene ids to number of copies
    #[builder(default = "IndexMap::new()")]
    pub composition: IndexMap<String, f64>,
    /// Id of the model holding this enzyme, set when the enzyme is added to a model
    #[builder(setter(skip), default = "None")]
    pub(crate) model: Option<String>,
}

impl Enzyme {
    /// Id of the enzyme, fixed once the enzyme is built
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the model holding the enzyme
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl Display for Enzyme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let mut composition = IndexMap::new();
        composition.insert("b0001".to_string(), 2.);
        let enzyme = EnzymeBuilder::default()
            .id("PFK_enzyme")
            .kcat_fwd(60.)
            .composition(composition)
            .build()
            .unwrap();
        assert_eq!(enzyme.id(), "PFK_enzyme");
        assert!((enzyme.kcat_fwd - 60.).abs() < 1e-12);
        assert!(enzyme.kcat_bwd.abs() < 1e-12);
        assert_eq!(enzyme.composition.get("b0001"), Some(&2.));
        assert!(enzyme.model().is_none());
    }
}
