//! Categories of constraints and variables, and the prefixes used to name them
//!
//! Every constraint belongs to a [`ConstraintKind`], which fixes the prefix of its name and
//! the [`HookFamily`] it belongs to. The family decides what the constraint is attached
//! to (a reaction, a gene, an enzyme, or the whole model), and so where its id and model come
//! from. Variables built on the entities of a model are categorized the same way by
//! [`VariableKind`].
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::optimize::constraint::ConstraintError;
use crate::optimize::variable::{VariableError, VariableType};

/// What a constraint is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookFamily {
    /// Attached to a reaction, id and model come from the reaction
    Reaction,
    /// Attached to the whole model, id is chosen when the constraint is created
    Model,
    /// Attached to a gene, id and model come from the gene
    Gene,
    /// Attached to an enzyme, id and model come from the enzyme
    Enzyme,
}

impl HookFamily {
    /// Name of the constraint family
    pub fn name(&self) -> &'static str {
        match self {
            HookFamily::Reaction => "ReactionConstraint",
            HookFamily::Model => "ModelConstraint",
            HookFamily::Gene => "GeneConstraint",
            HookFamily::Enzyme => "EnzymeConstraint",
        }
    }

    /// Name of the variable family
    pub fn variable_name(&self) -> &'static str {
        match self {
            HookFamily::Reaction => "ReactionVariable",
            HookFamily::Model => "ModelVariable",
            HookFamily::Gene => "GeneVariable",
            HookFamily::Enzyme => "EnzymeVariable",
        }
    }
}

impl Display for HookFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Category of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Bounds the flux of a reaction by the catalytic capacity of its enzyme
    Catalytic,
    /// Couples the synthesis of a peptide to its translation reaction
    Translation,
    /// Couples a reaction to the growth rate
    GrowthCoupling,
    /// Total capacity of a species shared by many reactions, e.g. ribosomes or RNA polymerase
    TotalCapacity,
    /// Balance of an enzyme, production equals consumption
    MassBalance,
    /// Couples the expression of a gene to the rest of the model
    ExpressionCoupling,
    /// Availability of free (non bound) ribosomes, R_free = 0.2*R_total
    RibosomeRatio,
    /// Choice of the active growth rate bin
    GrowthChoice,
    /// Linearization of a product of a binary and a continuous variable
    Linearization,
}

impl ConstraintKind {
    /// Every constraint kind
    pub const ALL: [ConstraintKind; 9] = [
        ConstraintKind::Catalytic,
        ConstraintKind::Translation,
        ConstraintKind::GrowthCoupling,
        ConstraintKind::TotalCapacity,
        ConstraintKind::MassBalance,
        ConstraintKind::ExpressionCoupling,
        ConstraintKind::RibosomeRatio,
        ConstraintKind::GrowthChoice,
        ConstraintKind::Linearization,
    ];

    /// Prefix prepended to the id of a constraint of this kind to form its name
    pub fn prefix(&self) -> &'static str {
        match self {
            ConstraintKind::Catalytic => "EC_",
            ConstraintKind::Translation => "TR_",
            ConstraintKind::GrowthCoupling => "GC_",
            ConstraintKind::TotalCapacity => "TC_",
            ConstraintKind::MassBalance => "MB_",
            ConstraintKind::ExpressionCoupling => "EX",
            ConstraintKind::RibosomeRatio => "RR_",
            ConstraintKind::GrowthChoice => "GR_",
            ConstraintKind::Linearization => "LC_",
        }
    }

    /// Name of the kind, used when serializing constraints
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Catalytic => "CatalyticConstraint",
            ConstraintKind::Translation => "TranslationConstraint",
            ConstraintKind::GrowthCoupling => "GrowthCoupling",
            ConstraintKind::TotalCapacity => "TotalCapacity",
            ConstraintKind::MassBalance => "MassBalance",
            ConstraintKind::ExpressionCoupling => "ExpressionCoupling",
            ConstraintKind::RibosomeRatio => "RibosomeRatio",
            ConstraintKind::GrowthChoice => "GrowthChoice",
            ConstraintKind::Linearization => "LinearizationConstraint",
        }
    }

    /// The kind this kind specializes, None if it directly specializes its family
    pub fn parent(&self) -> Option<ConstraintKind> {
        match self {
            ConstraintKind::TotalCapacity => Some(ConstraintKind::Catalytic),
            _ => None,
        }
    }

    /// Family of the kind
    pub fn family(&self) -> HookFamily {
        match self {
            ConstraintKind::Catalytic
            | ConstraintKind::Translation
            | ConstraintKind::GrowthCoupling
            | ConstraintKind::TotalCapacity => HookFamily::Reaction,
            ConstraintKind::MassBalance => HookFamily::Enzyme,
            ConstraintKind::ExpressionCoupling => HookFamily::Gene,
            ConstraintKind::RibosomeRatio
            | ConstraintKind::GrowthChoice
            | ConstraintKind::Linearization => HookFamily::Model,
        }
    }

    /// Whether this kind is `other`, or a specialization of it
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::optimize::kind::ConstraintKind;
    /// assert!(ConstraintKind::TotalCapacity.is_a(ConstraintKind::Catalytic));
    /// assert!(!ConstraintKind::Catalytic.is_a(ConstraintKind::TotalCapacity));
    /// ```
    pub fn is_a(&self, other: ConstraintKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Every kind which is this kind or a specialization of it
    pub fn subkinds(&self) -> Vec<ConstraintKind> {
        ConstraintKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.is_a(*self))
            .collect()
    }

    /// Name of a constraint of this kind with the given id
    pub fn make_name(&self, id: &str) -> String {
        format!("{}{}", self.prefix(), id)
    }

    /// Recover the kind and id from the name of a constraint
    ///
    /// Returns None if the name doesn't start with any known prefix.
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::optimize::kind::ConstraintKind;
    /// assert_eq!(
    ///     ConstraintKind::split_name("MB_PFK_enzyme"),
    ///     Some((ConstraintKind::MassBalance, "PFK_enzyme"))
    /// );
    /// ```
    pub fn split_name(name: &str) -> Option<(ConstraintKind, &str)> {
        ConstraintKind::ALL
            .iter()
            .filter_map(|kind| name.strip_prefix(kind.prefix()).map(|id| (*kind, id)))
            .max_by_key(|(kind, _)| kind.prefix().len())
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConstraintKind {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstraintKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConstraintError::UnknownKind(s.to_string()))
    }
}

/// Category of a variable built on an entity of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    /// Variable attached to a reaction, e.g. its flux
    Reaction,
    /// Variable attached to an enzyme, e.g. its concentration
    Enzyme,
    /// Variable attached to a gene, e.g. its mRNA concentration
    Gene,
    /// Variable attached to the whole model, with an id chosen when it is created
    Model,
    /// Binary variable activating one growth rate bin
    GrowthActivation,
    /// Binary variable activating one term of a linearized product
    BinaryActivator,
    /// Continuous variable standing for the product of a binary and a continuous variable
    Linearization,
}

impl VariableKind {
    /// Every variable kind
    pub const ALL: [VariableKind; 7] = [
        VariableKind::Reaction,
        VariableKind::Enzyme,
        VariableKind::Gene,
        VariableKind::Model,
        VariableKind::GrowthActivation,
        VariableKind::BinaryActivator,
        VariableKind::Linearization,
    ];

    /// Prefix prepended to the id of a variable of this kind to form its name
    ///
    /// The kinds standing for a whole family have no prefix, so their name is the id.
    pub fn prefix(&self) -> &'static str {
        match self {
            VariableKind::Reaction
            | VariableKind::Enzyme
            | VariableKind::Gene
            | VariableKind::Model => "",
            VariableKind::GrowthActivation => "GA_",
            VariableKind::BinaryActivator => "LA_",
            VariableKind::Linearization => "LZ_",
        }
    }

    /// Name of the kind, used when rebuilding variables by name
    pub fn name(&self) -> &'static str {
        match self {
            VariableKind::Reaction => HookFamily::Reaction.variable_name(),
            VariableKind::Enzyme => HookFamily::Enzyme.variable_name(),
            VariableKind::Gene => HookFamily::Gene.variable_name(),
            VariableKind::Model => HookFamily::Model.variable_name(),
            VariableKind::GrowthActivation => "GrowthActivation",
            VariableKind::BinaryActivator => "BinaryActivator",
            VariableKind::Linearization => "LinearizationVariable",
        }
    }

    /// The kind this kind specializes, None for the kinds standing for a family
    pub fn parent(&self) -> Option<VariableKind> {
        match self {
            VariableKind::GrowthActivation
            | VariableKind::BinaryActivator
            | VariableKind::Linearization => Some(VariableKind::Model),
            _ => None,
        }
    }

    /// Family of the kind, deciding which entity a variable of this kind is attached to
    pub fn family(&self) -> HookFamily {
        match self {
            VariableKind::Reaction => HookFamily::Reaction,
            VariableKind::Enzyme => HookFamily::Enzyme,
            VariableKind::Gene => HookFamily::Gene,
            VariableKind::Model
            | VariableKind::GrowthActivation
            | VariableKind::BinaryActivator
            | VariableKind::Linearization => HookFamily::Model,
        }
    }

    /// Type of the variables of this kind
    pub fn variable_type(&self) -> VariableType {
        match self {
            VariableKind::GrowthActivation | VariableKind::BinaryActivator => VariableType::Binary,
            _ => VariableType::Continuous,
        }
    }

    /// Whether this kind is `other`, or a specialization of it
    pub fn is_a(&self, other: VariableKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Name of a variable of this kind with the given id
    pub fn make_name(&self, id: &str) -> String {
        format!("{}{}", self.prefix(), id)
    }
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for VariableKind {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VariableError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prefixes_are_fixed_and_unique() {
        let prefixes: HashSet<&str> = ConstraintKind::ALL.iter().map(|k| k.prefix()).collect();
        assert_eq!(prefixes.len(), ConstraintKind::ALL.len());
        assert!(prefixes.iter().all(|p| !p.is_empty()));
        assert_eq!(ConstraintKind::Catalytic.prefix(), "EC_");
        assert_eq!(ConstraintKind::MassBalance.prefix(), "MB_");
        assert_eq!(ConstraintKind::ExpressionCoupling.prefix(), "EX");
        assert_eq!(ConstraintKind::Linearization.prefix(), "LC_");
    }

    #[test]
    fn hierarchy() {
        assert_eq!(ConstraintKind::MassBalance.family(), HookFamily::Enzyme);
        assert!(ConstraintKind::TotalCapacity.is_a(ConstraintKind::Catalytic));
        assert_eq!(ConstraintKind::TotalCapacity.family(), HookFamily::Reaction);
        assert_eq!(ConstraintKind::Catalytic.family(), HookFamily::Reaction);
        assert_eq!(ConstraintKind::ExpressionCoupling.family(), HookFamily::Gene);
        for kind in [
            ConstraintKind::RibosomeRatio,
            ConstraintKind::GrowthChoice,
            ConstraintKind::Linearization,
        ] {
            assert_eq!(kind.family(), HookFamily::Model);
        }
        // A kind's family is shared by its parent
        for kind in ConstraintKind::ALL {
            if let Some(parent) = kind.parent() {
                assert_eq!(kind.family(), parent.family());
            }
        }
    }

    #[test]
    fn subkinds() {
        assert_eq!(
            ConstraintKind::Catalytic.subkinds(),
            vec![ConstraintKind::Catalytic, ConstraintKind::TotalCapacity]
        );
        assert_eq!(
            ConstraintKind::GrowthChoice.subkinds(),
            vec![ConstraintKind::GrowthChoice]
        );
    }

    #[test]
    fn names() {
        for kind in ConstraintKind::ALL {
            assert_eq!(kind.name().parse::<ConstraintKind>().unwrap(), kind);
        }
        match "NotAConstraint".parse::<ConstraintKind>() {
            Err(ConstraintError::UnknownKind(name)) => assert_eq!(name, "NotAConstraint"),
            _ => panic!("Unknown kind name not caught"),
        }
        assert_eq!(ConstraintKind::Translation.make_name("b0001"), "TR_b0001");
        assert_eq!(
            ConstraintKind::split_name("EXb0001"),
            Some((ConstraintKind::ExpressionCoupling, "b0001"))
        );
        assert_eq!(ConstraintKind::split_name("b0001"), None);
    }

    #[test]
    fn variable_kinds() {
        for kind in VariableKind::ALL {
            assert_eq!(kind.name().parse::<VariableKind>().unwrap(), kind);
            if let Some(parent) = kind.parent() {
                assert_eq!(kind.family(), parent.family());
            }
        }
        assert!(VariableKind::GrowthActivation.is_a(VariableKind::Model));
        assert!(!VariableKind::Model.is_a(VariableKind::GrowthActivation));
        assert_eq!(VariableKind::Enzyme.family(), HookFamily::Enzyme);
        assert_eq!(VariableKind::Gene.name(), "GeneVariable");
        assert_eq!(VariableKind::GrowthActivation.make_name("0"), "GA_0");
        assert_eq!(VariableKind::Enzyme.make_name("PFK_enzyme"), "PFK_enzyme");
        assert_eq!(
            VariableKind::BinaryActivator.variable_type(),
            VariableType::Binary
        );
        assert_eq!(
            VariableKind::Linearization.variable_type(),
            VariableType::Continuous
        );
        assert_eq!(
            "CatalyticConstraint".parse::<VariableKind>(),
            Err(VariableError::UnknownKind("CatalyticConstraint".to_string()))
        );
    }
}
