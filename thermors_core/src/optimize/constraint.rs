//! Provides struct for representing a categorized constraint of the model
//!
//! A [`Constraint`] is a linear expression with optional bounds, labelled with a
//! [`ConstraintKind`] and attached to the entity it is about through a [`Hook`]. For constraints
//! on reactions, genes and enzymes the id and model of the constraint are read from the entity
//! whenever they are asked for, so they can never disagree with it.
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use derive_builder::Builder;
use parking_lot::RwLock;
use thiserror::Error;

use crate::metabolic_model::enzyme::Enzyme;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::expression::LinearExpression;
use crate::optimize::kind::{ConstraintKind, HookFamily};

/// The entity a constraint is attached to
#[derive(Debug, Clone)]
pub enum Hook {
    /// A reaction of the model
    Reaction(Arc<RwLock<Reaction>>),
    /// A gene of the model
    Gene(Arc<RwLock<Gene>>),
    /// An enzyme of the model
    Enzyme(Arc<RwLock<Enzyme>>),
    /// The model itself
    Model {
        /// Id given to the constraint
        id: String,
        /// Id of the model
        model: String,
    },
}

impl Hook {
    /// Family of constraints that can be attached to this hook
    pub fn family(&self) -> HookFamily {
        match self {
            Hook::Reaction(_) => HookFamily::Reaction,
            Hook::Gene(_) => HookFamily::Gene,
            Hook::Enzyme(_) => HookFamily::Enzyme,
            Hook::Model { .. } => HookFamily::Model,
        }
    }

    /// Id of the hooked entity
    pub fn id(&self) -> String {
        match self {
            Hook::Reaction(reaction) => reaction.read().id().to_string(),
            Hook::Gene(gene) => gene.read().id().to_string(),
            Hook::Enzyme(enzyme) => enzyme.read().id().to_string(),
            Hook::Model { id, .. } => id.clone(),
        }
    }

    /// Id of the model holding the hooked entity
    pub fn model(&self) -> Option<String> {
        match self {
            Hook::Reaction(reaction) => reaction.read().model().map(String::from),
            Hook::Gene(gene) => gene.read().model().map(String::from),
            Hook::Enzyme(enzyme) => enzyme.read().model().map(String::from),
            Hook::Model { model, .. } => Some(model.clone()),
        }
    }
}

/// Optional configuration of a new constraint
///
/// # Examples
/// ```rust
/// use thermors_core::optimize::constraint::ConstraintOptionsBuilder;
/// let options = ConstraintOptionsBuilder::default()
///     .name("capacity")
///     .upper_bound(0.)
///     .build()
///     .unwrap();
/// assert_eq!(options.lower_bound, None);
/// ```
#[derive(Builder, Debug, Clone, Default, PartialEq)]
#[builder(default)]
pub struct ConstraintOptions {
    /// Name of the constraint, when None the name is the kind's prefix followed by the id
    #[builder(setter(into, strip_option))]
    pub name: Option<String>,
    /// The lowest value the expression can take, None if unbounded
    #[builder(setter(strip_option))]
    pub lower_bound: Option<f64>,
    /// The highest value the expression can take, None if unbounded
    #[builder(setter(strip_option))]
    pub upper_bound: Option<f64>,
}

impl ConstraintOptions {
    /// Options for `lower_bound <= expr <= upper_bound`
    pub fn bounds(lower_bound: f64, upper_bound: f64) -> Self {
        ConstraintOptions {
            name: None,
            lower_bound: Some(lower_bound),
            upper_bound: Some(upper_bound),
        }
    }

    /// Options for `expr = value`
    pub fn equal_to(value: f64) -> Self {
        Self::bounds(value, value)
    }

    /// Options for `expr <= upper_bound`
    pub fn at_most(upper_bound: f64) -> Self {
        ConstraintOptions {
            upper_bound: Some(upper_bound),
            ..Default::default()
        }
    }
}

/// A linear constraint belonging to a [`ConstraintKind`]
#[derive(Debug, Clone)]
pub struct Constraint {
    kind: ConstraintKind,
    hook: Hook,
    name: String,
    expr: LinearExpression,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

impl Constraint {
    // region Creation Functions
    /// Create a new constraint attached to a reaction
    ///
    /// # Parameters
    /// - `kind`: Kind of the constraint, must belong to the reaction family
    /// - `reaction`: Shared handle to the reaction, as returned by
    ///     [`Model::add_reaction`]
    /// - `expr`: Left hand side of the constraint
    /// - `options`: Name and bounds of the constraint
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::metabolic_model::model::Model;
    /// use thermors_core::metabolic_model::reaction::ReactionBuilder;
    /// use thermors_core::optimize::constraint::{Constraint, ConstraintOptions};
    /// use thermors_core::optimize::expression::LinearExpression;
    /// use thermors_core::optimize::kind::ConstraintKind;
    /// let mut model = Model::new("ecoli");
    /// let pfk = model
    ///     .add_reaction(ReactionBuilder::default().id("PFK").build().unwrap())
    ///     .unwrap();
    /// // v_PFK - 60*E_PFK <= 0
    /// let expr = LinearExpression::from_terms(&[("v_PFK", 1.), ("E_PFK", -60.)]);
    /// let cons = Constraint::new_reaction_constraint(
    ///     ConstraintKind::Catalytic,
    ///     &pfk,
    ///     expr,
    ///     ConstraintOptions::at_most(0.),
    /// )
    /// .unwrap();
    /// assert_eq!(cons.name(), "EC_PFK");
    /// ```
    pub fn new_reaction_constraint(
        kind: ConstraintKind,
        reaction: &Arc<RwLock<Reaction>>,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Self, ConstraintError> {
        Self::new(kind, Hook::Reaction(reaction.clone()), expr, options)
    }

    /// Create a new constraint attached to a gene, the id and model of the constraint are
    /// those of the gene
    pub fn new_gene_constraint(
        kind: ConstraintKind,
        gene: &Arc<RwLock<Gene>>,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Self, ConstraintError> {
        Self::new(kind, Hook::Gene(gene.clone()), expr, options)
    }

    /// Create a new constraint attached to an enzyme, the id and model of the constraint are
    /// those of the enzyme
    pub fn new_enzyme_constraint(
        kind: ConstraintKind,
        enzyme: &Arc<RwLock<Enzyme>>,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Self, ConstraintError> {
        Self::new(kind, Hook::Enzyme(enzyme.clone()), expr, options)
    }

    /// Create a new constraint attached to the whole model, with the given id
    pub fn new_model_constraint(
        kind: ConstraintKind,
        model: &Model,
        id: &str,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Self, ConstraintError> {
        let hook = Hook::Model {
            id: id.to_string(),
            model: model.id.clone(),
        };
        Self::new(kind, hook, expr, options)
    }

    /// Create a new constraint of any kind, attached to `hook`
    pub fn new(
        kind: ConstraintKind,
        hook: Hook,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Self, ConstraintError> {
        if kind.family() != hook.family() {
            return Err(ConstraintError::FamilyMismatch {
                kind,
                expected: kind.family(),
                found: hook.family(),
            });
        }
        if hook.model().is_none() {
            return Err(ConstraintError::DetachedEntity(hook.id()));
        }
        if let (Some(lb), Some(ub)) = (options.lower_bound, options.upper_bound) {
            if lb > ub {
                return Err(ConstraintError::InvalidBounds);
            }
        }
        let name = options.name.unwrap_or_else(|| kind.make_name(&hook.id()));
        Ok(Constraint {
            kind,
            hook,
            name,
            expr,
            lower_bound: options.lower_bound,
            upper_bound: options.upper_bound,
        })
    }

    /// Create a linearization constraint in `model` with the same name, expression and bounds
    /// as `constraint`
    ///
    /// The id of the new constraint is the id of `constraint`.
    pub fn linearization_from_constraint(constraint: &Constraint, model: &Model) -> Constraint {
        Constraint {
            kind: ConstraintKind::Linearization,
            hook: Hook::Model {
                id: constraint.id(),
                model: model.id.clone(),
            },
            name: constraint.name.clone(),
            expr: constraint.expr.clone(),
            lower_bound: constraint.lower_bound,
            upper_bound: constraint.upper_bound,
        }
    }
    // endregion Creation Functions

    /// Kind of the constraint
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Prefix of the constraint's kind
    pub fn prefix(&self) -> &'static str {
        self.kind.prefix()
    }

    /// Family of the constraint's kind
    pub fn family(&self) -> HookFamily {
        self.kind.family()
    }

    /// Entity the constraint is attached to
    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    /// Id of the constraint, the id of the hooked entity for non model constraints
    pub fn id(&self) -> String {
        self.hook.id()
    }

    /// Id of the model the constraint belongs to
    pub fn model(&self) -> Option<String> {
        self.hook.model()
    }

    /// Name of the constraint, used as its key in the model
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Left hand side of the constraint
    pub fn expr(&self) -> &LinearExpression {
        &self.expr
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper_bound
    }

    /// Whether the constraint is an equality, i.e. both bounds are equal
    pub fn is_equality(&self) -> bool {
        matches!((self.lower_bound, self.upper_bound), (Some(lb), Some(ub)) if lb == ub)
    }

    /// Update the bounds of the constraint
    pub fn set_bounds(
        &mut self,
        lower_bound: Option<f64>,
        upper_bound: Option<f64>,
    ) -> Result<(), ConstraintError> {
        if let (Some(lb), Some(ub)) = (lower_bound, upper_bound) {
            if lb > ub {
                return Err(ConstraintError::InvalidBounds);
            }
        }
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        Ok(())
    }

    /// Copy of this constraint with a different expression
    pub(crate) fn with_expr(&self, expr: LinearExpression) -> Constraint {
        Constraint {
            expr,
            ..self.clone()
        }
    }

    /// Copy of this constraint attached to another hook of the same family
    pub(crate) fn with_hook(&self, hook: Hook) -> Constraint {
        Constraint {
            hook,
            ..self.clone()
        }
    }

    /// Drop the term with the variable from the expression
    pub(crate) fn remove_variable(&mut self, variable_id: &str) {
        self.expr.remove_variable(variable_id);
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.lower_bound, self.upper_bound) {
            (Some(lb), Some(ub)) if lb == ub => write!(f, "{}: {} = {}", self.name, self.expr, lb),
            (Some(lb), Some(ub)) => write!(f, "{}: {} <= {} <= {}", self.name, lb, self.expr, ub),
            (Some(lb), None) => write!(f, "{}: {} <= {}", self.name, lb, self.expr),
            (None, Some(ub)) => write!(f, "{}: {} <= {}", self.name, self.expr, ub),
            (None, None) => write!(f, "{}: {}", self.name, self.expr),
        }
    }
}

/// Errors associated with creating constraints
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// Error when the kind of a constraint doesn't belong to the family of its hook
    #[error("A {kind} constraint must be attached to a {expected}, not a {found}")]
    FamilyMismatch {
        kind: ConstraintKind,
        expected: HookFamily,
        found: HookFamily,
    },
    /// Error when the hooked entity isn't part of a model
    #[error("Tried to create a constraint on {0}, which is not part of any model")]
    DetachedEntity(String),
    /// Error when trying to create a constraint with invalid bounds
    #[error("Tried to create a constraint with lower_bound > upper_bound")]
    InvalidBounds,
    /// Error when looking up a constraint kind by a name that doesn't exist
    #[error("Unknown constraint kind {0}")]
    UnknownKind(String),
}
