//! This module provides the Gene struct, representing a gene whose expression can be
//! coupled to the rest of the model
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use derive_builder::Builder;

/// Structure Representing a Gene
///
/// The id of a gene can't change once it is built, so it can be used as a key by the model
/// and by the constraints attached to the gene.
///
/// ```compile_fail
/// use thermors_core::metabolic_model::gene::Gene;
/// let mut gene = Gene::new("b0001");
/// gene.id = "b0002".to_string();
/// ```
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Gene {
    /// Used to identify the gene
    #[builder(setter(into))]
    pub(crate) id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Notes about the gene
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Gene Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
    /// Id of the model holding this gene
    ///
    /// ### Note
    /// This is set by [`Model::add_gene`](crate::metabolic_model::model::Model::add_gene),
    /// a gene which was never added to a model can't have constraints built on it.
    #[builder(setter(skip), default = "None")]
    pub(crate) model: Option<String>,
}

impl Gene {
    /// Create a new gene which is not yet part of any model
    pub fn new(id: &str) -> Gene {
        Gene {
            id: id.to_string(),
            name: None,
            notes: None,
            annotation: None,
            model: None,
        }
    }

    /// Id of the gene
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the model holding the gene, None if it was never added to a model
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Hash for Gene {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.model.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let gene = GeneBuilder::default().id("b0001").build().unwrap();
        assert_eq!(gene.id(), "b0001");
        assert!(gene.name.is_none());
        assert!(gene.model().is_none());
        assert_eq!(gene, Gene::new("b0001"));
    }

    #[test]
    fn display() {
        let gene = Gene::new("thrL");
        assert_eq!(format!("{}", gene), "thrL");
    }
}
