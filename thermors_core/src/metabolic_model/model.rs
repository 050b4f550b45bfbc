//! This module provides the Model struct, holding the entities of a metabolic model together
//! with the variables and categorized constraints built on them
use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::enzyme::Enzyme;
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::constraint::{Constraint, ConstraintError, ConstraintOptions, Hook};
use crate::optimize::expression::LinearExpression;
use crate::optimize::kind::{ConstraintKind, HookFamily, VariableKind};
use crate::optimize::variable::{Variable, VariableError};

/// Represents a metabolic model with expression and enzyme constraints
#[derive(Debug)]
pub struct Model {
    /// Id associated with the Model, this is the `model` of every entity added to it
    pub id: String,
    /// Human readable name of the model
    pub name: Option<String>,
    /// Map of reaction ids to Reaction Objects (which are wrapped in Arc<RwLock<>>)
    reactions: IndexMap<String, Arc<RwLock<Reaction>>>,
    /// Map of gene ids to Gene Objects (which are wrapped in Arc<RwLock<>>)
    genes: IndexMap<String, Arc<RwLock<Gene>>>,
    /// Map of enzyme ids to Enzyme Objects (which are wrapped in Arc<RwLock<>>)
    enzymes: IndexMap<String, Arc<RwLock<Enzyme>>>,
    /// Variables of the optimization problem, keyed by id
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem, keyed by name
    constraints: IndexMap<String, Constraint>,
}

impl Model {
    /// Create a new empty model
    pub fn new(id: &str) -> Self {
        Model {
            id: id.to_string(),
            name: None,
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            enzymes: IndexMap::new(),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
        }
    }

    // region Entities
    /// Add a reaction to the model
    ///
    /// # Returns
    /// A shared handle to the reaction, which can be used to build constraints on it
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::metabolic_model::model::Model;
    /// use thermors_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new("ecoli");
    /// let new_reaction = ReactionBuilder::default().id("PGI").build().unwrap();
    /// let pgi = model.add_reaction(new_reaction).unwrap();
    /// assert_eq!(pgi.read().model(), Some("ecoli"));
    /// ```
    pub fn add_reaction(
        &mut self,
        mut reaction: Reaction,
    ) -> Result<Arc<RwLock<Reaction>>, ModelError> {
        if self.reactions.contains_key(&reaction.id) {
            return Err(ModelError::ReactionAlreadyExists(reaction.id));
        }
        reaction.model = Some(self.id.clone());
        let id = reaction.id.clone();
        let handle = Arc::new(RwLock::new(reaction));
        self.reactions.insert(id, handle.clone());
        Ok(handle)
    }

    /// Add a gene to the model
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::metabolic_model::gene::GeneBuilder;
    /// use thermors_core::metabolic_model::model::Model;
    /// let mut model = Model::new("ecoli");
    /// let new_gene = GeneBuilder::default().id("b0001").build().unwrap();
    /// model.add_gene(new_gene).unwrap();
    /// assert!(model.gene("b0001").is_some());
    /// ```
    pub fn add_gene(&mut self, mut gene: Gene) -> Result<Arc<RwLock<Gene>>, ModelError> {
        if self.genes.contains_key(&gene.id) {
            return Err(ModelError::GeneAlreadyExists(gene.id));
        }
        gene.model = Some(self.id.clone());
        let id = gene.id.clone();
        let handle = Arc::new(RwLock::new(gene));
        self.genes.insert(id, handle.clone());
        Ok(handle)
    }

    /// Add an enzyme to the model
    pub fn add_enzyme(
        &mut self,
        mut enzyme: Enzyme,
    ) -> Result<Arc<RwLock<Enzyme>>, ModelError> {
        if self.enzymes.contains_key(&enzyme.id) {
            return Err(ModelError::EnzymeAlreadyExists(enzyme.id));
        }
        enzyme.model = Some(self.id.clone());
        let id = enzyme.id.clone();
        let handle = Arc::new(RwLock::new(enzyme));
        self.enzymes.insert(id, handle.clone());
        Ok(handle)
    }

    /// Get a handle to a reaction by id
    pub fn reaction(&self, id: &str) -> Option<Arc<RwLock<Reaction>>> {
        self.reactions.get(id).cloned()
    }

    /// Get a handle to a gene by id
    pub fn gene(&self, id: &str) -> Option<Arc<RwLock<Gene>>> {
        self.genes.get(id).cloned()
    }

    /// Get a handle to an enzyme by id
    pub fn enzyme(&self, id: &str) -> Option<Arc<RwLock<Enzyme>>> {
        self.enzymes.get(id).cloned()
    }

    pub fn num_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn num_enzymes(&self) -> usize {
        self.enzymes.len()
    }
    // endregion Entities

    // region Variables
    /// Add a variable to the model
    pub fn add_variable(&mut self, variable: Variable) -> Result<(), ModelError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ModelError::VariableAlreadyExists(variable.id));
        }
        if variable.lower_bound > variable.upper_bound {
            return Err(ModelError::InvalidVariableBounds(variable.id));
        }
        log::debug!(target: "thermors:model", "adding variable {}", variable);
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Get a variable by id
    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.variables.get(id)
    }

    /// Iterate over the variables of the model
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Remove a variable from the model, will also remove it as a term from all constraints
    pub fn remove_variable(&mut self, id: &str) -> Result<Variable, ModelError> {
        let variable = self
            .variables
            .shift_remove(id)
            .ok_or_else(|| ModelError::NonExistentVariable(id.to_string()))?;
        self.constraints
            .values_mut()
            .for_each(|cons| cons.remove_variable(id));
        log::debug!(target: "thermors:model", "removed variable {}", id);
        Ok(variable)
    }

    /// Change the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidVariableBounds(id.to_string()));
        }
        let variable = self
            .variables
            .get_mut(id)
            .ok_or_else(|| ModelError::NonExistentVariable(id.to_string()))?;
        variable.lower_bound = lower_bound;
        variable.upper_bound = upper_bound;
        Ok(())
    }

    /// All variables whose kind is `kind` or a specialization of it
    pub fn variables_of_kind(&self, kind: VariableKind) -> Vec<&Variable> {
        self.variables
            .values()
            .filter(|var| var.kind.is_some_and(|k| k.is_a(kind)))
            .collect()
    }

    /// Create a variable from its kind and the id of the entity it is built on, and add it to
    /// the model
    ///
    /// The id of the variable is the kind's prefix followed by `hook_id`, and its type is the
    /// type of the kind. For variables of the model family, `hook_id` is chosen freely.
    ///
    /// # Returns
    /// The id of the new variable
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::metabolic_model::model::Model;
    /// use thermors_core::optimize::kind::VariableKind;
    /// let mut model = Model::new("ecoli");
    /// let id = model
    ///     .rebuild_variable(VariableKind::GrowthActivation, "0", 0., 1.)
    ///     .unwrap();
    /// assert_eq!(id, "GA_0");
    /// assert!(model.variable("GA_0").unwrap().is_integer());
    /// ```
    pub fn rebuild_variable(
        &mut self,
        kind: VariableKind,
        hook_id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<String, ModelError> {
        // Only checks that the entity is in the model, variables keep the id of their hook
        self.resolve_hook(kind.family(), hook_id)?;
        let variable = Variable {
            id: kind.make_name(hook_id),
            name: None,
            variable_type: kind.variable_type(),
            lower_bound,
            upper_bound,
            kind: Some(kind),
            hook_id: Some(hook_id.to_string()),
        };
        let id = variable.id.clone();
        self.add_variable(variable)?;
        Ok(id)
    }
    // endregion Variables

    // region Constraints
    /// Add a constraint to the model
    ///
    /// The constraint must belong to this model, have a name not already used by another
    /// constraint, and only contain variables of the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        self.validate_constraint(&constraint)?;
        log::debug!(target: "thermors:model", "adding constraint {}", constraint);
        self.constraints
            .insert(constraint.name().to_string(), constraint);
        Ok(())
    }

    /// Add several constraints to the model
    ///
    /// Every constraint is validated, and the names checked to be unique within the batch,
    /// before any of them is added, so either all of them are added or none.
    ///
    /// # Returns
    /// The number of constraints added
    pub fn add_constraints(&mut self, constraints: Vec<Constraint>) -> Result<usize, ModelError> {
        let mut names = HashSet::new();
        for constraint in constraints.iter() {
            self.validate_constraint(constraint)?;
            if !names.insert(constraint.name()) {
                return Err(ModelError::ConstraintAlreadyExists(
                    constraint.name().to_string(),
                ));
            }
        }
        let count = constraints.len();
        for constraint in constraints {
            log::debug!(target: "thermors:model", "adding constraint {}", constraint);
            self.constraints
                .insert(constraint.name().to_string(), constraint);
        }
        Ok(count)
    }

    /// Remove a constraint (by name) from the model
    pub fn remove_constraint(&mut self, name: &str) -> Option<Constraint> {
        let removed = self.constraints.shift_remove(name);
        if removed.is_some() {
            log::debug!(target: "thermors:model", "removed constraint {}", name);
        }
        removed
    }

    /// Get a constraint by name
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.get(name)
    }

    /// Iterate over the constraints of the model, in the order they were added
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// All constraints whose kind is `kind` or a specialization of it
    ///
    /// # Examples
    /// ```rust
    /// use thermors_core::metabolic_model::model::Model;
    /// use thermors_core::metabolic_model::reaction::ReactionBuilder;
    /// use thermors_core::optimize::constraint::{Constraint, ConstraintOptions};
    /// use thermors_core::optimize::expression::LinearExpression;
    /// use thermors_core::optimize::kind::ConstraintKind;
    /// let mut model = Model::new("ecoli");
    /// let rib = model
    ///     .add_reaction(ReactionBuilder::default().id("ribosome").build().unwrap())
    ///     .unwrap();
    /// let cons = Constraint::new_reaction_constraint(
    ///     ConstraintKind::TotalCapacity,
    ///     &rib,
    ///     LinearExpression::new(),
    ///     ConstraintOptions::default(),
    /// )
    /// .unwrap();
    /// model.add_constraint(cons).unwrap();
    /// // Total capacity constraints are catalytic constraints
    /// assert_eq!(model.constraints_of_kind(ConstraintKind::Catalytic).len(), 1);
    /// ```
    pub fn constraints_of_kind(&self, kind: ConstraintKind) -> Vec<&Constraint> {
        self.constraints
            .values()
            .filter(|cons| cons.kind().is_a(kind))
            .collect()
    }

    /// All constraints belonging to the family
    pub fn constraints_of_family(&self, family: HookFamily) -> Vec<&Constraint> {
        self.constraints
            .values()
            .filter(|cons| cons.family() == family)
            .collect()
    }

    /// Create a constraint from its kind and the id of the entity it is attached to, and add
    /// it to the model
    ///
    /// For constraints of the model family, `hook_id` is used as the id of the constraint.
    ///
    /// # Returns
    /// The name of the new constraint
    pub fn rebuild_constraint(
        &mut self,
        kind: ConstraintKind,
        hook_id: &str,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<String, ModelError> {
        let constraint = self.build_constraint(kind, hook_id, expr, options)?;
        let name = constraint.name().to_string();
        self.add_constraint(constraint)?;
        Ok(name)
    }

    /// Create a constraint from its kind and the id of the entity it is attached to, without
    /// adding it to the model
    pub fn build_constraint(
        &self,
        kind: ConstraintKind,
        hook_id: &str,
        expr: LinearExpression,
        options: ConstraintOptions,
    ) -> Result<Constraint, ModelError> {
        let hook = self.resolve_hook(kind.family(), hook_id)?;
        Ok(Constraint::new(kind, hook, expr, options)?)
    }

    /// Find the entity of the family with the given id
    fn resolve_hook(&self, family: HookFamily, hook_id: &str) -> Result<Hook, ModelError> {
        let not_found = || ModelError::NonExistentHook {
            family,
            id: hook_id.to_string(),
        };
        Ok(match family {
            HookFamily::Reaction => {
                Hook::Reaction(self.reaction(hook_id).ok_or_else(not_found)?)
            }
            HookFamily::Gene => Hook::Gene(self.gene(hook_id).ok_or_else(not_found)?),
            HookFamily::Enzyme => {
                Hook::Enzyme(self.enzyme(hook_id).ok_or_else(not_found)?)
            }
            HookFamily::Model => Hook::Model {
                id: hook_id.to_string(),
                model: self.id.clone(),
            },
        })
    }

    /// Find the entity of this model with the same id as the entity of `hook`
    ///
    /// Hooks on entities this model doesn't have are returned unchanged.
    fn rehook(&self, hook: &Hook) -> Hook {
        match hook {
            Hook::Reaction(reaction) => {
                let id = reaction.read().id().to_string();
                Hook::Reaction(self.reaction(&id).unwrap_or_else(|| reaction.clone()))
            }
            Hook::Gene(gene) => {
                let id = gene.read().id().to_string();
                Hook::Gene(self.gene(&id).unwrap_or_else(|| gene.clone()))
            }
            Hook::Enzyme(enzyme) => {
                let id = enzyme.read().id().to_string();
                Hook::Enzyme(self.enzyme(&id).unwrap_or_else(|| enzyme.clone()))
            }
            Hook::Model { .. } => hook.clone(),
        }
    }
    // endregion Constraints

    // region Fixing Variables
    /// Fix variables to the given values
    ///
    /// Every constraint using one of the variables is rebuilt with the variable replaced by its
    /// value, and the variables are removed from the model.
    ///
    /// # Returns
    /// The number of constraints which were rebuilt
    pub fn fix_variables(
        &mut self,
        values: &IndexMap<String, f64>,
    ) -> Result<usize, ModelError> {
        if let Some(missing) = values.keys().find(|id| !self.variables.contains_key(*id)) {
            return Err(ModelError::NonExistentVariable(missing.clone()));
        }
        let mut rebuilt = 0;
        for cons in self.constraints.values_mut() {
            if values.keys().any(|id| cons.expr().contains(id)) {
                *cons = cons.with_expr(cons.expr().substitute(values));
                rebuilt += 1;
            }
        }
        for id in values.keys() {
            self.variables.shift_remove(id);
        }
        log::debug!(
            target: "thermors:model",
            "fixed {} variables, rebuilt {} constraints",
            values.len(),
            rebuilt
        );
        Ok(rebuilt)
    }

    /// Fix all the integer and binary variables of the model to their value in `solution`,
    /// leaving a model with only continuous variables
    ///
    /// Solution values are rounded to the nearest integer.
    ///
    /// # Returns
    /// The number of constraints which were rebuilt
    pub fn fix_integer_variables(
        &mut self,
        solution: &IndexMap<String, f64>,
    ) -> Result<usize, ModelError> {
        let tolerance = CONFIGURATION.read().tolerance;
        let mut values = IndexMap::new();
        for var in self.variables.values().filter(|v| v.is_integer()) {
            let value = match solution.get(&var.id) {
                Some(value) => *value,
                None => return Err(ModelError::MissingSolutionValue(var.id.clone())),
            };
            let rounded = value.round();
            if (value - rounded).abs() > tolerance {
                log::warn!(
                    target: "thermors:model",
                    "integer variable {} has non integral value {}, rounding to {}",
                    var.id,
                    value,
                    rounded
                );
            }
            values.insert(var.id.clone(), rounded);
        }
        let rebuilt = self.fix_variables(&values)?;
        log::info!(
            target: "thermors:model",
            "model {} is now continuous, {} integer variables fixed",
            self.id,
            values.len()
        );
        Ok(rebuilt)
    }

    /// Copy of the model with all integer and binary variables fixed to their value in
    /// `solution`, see [`Model::fix_integer_variables`]
    ///
    /// The copy is named `"<name> - continuous"`, using the id when the model has no name.
    /// This model is left untouched.
    pub fn to_continuous(&self, solution: &IndexMap<String, f64>) -> Result<Model, ModelError> {
        let mut continuous = self.clone();
        continuous.name = Some(format!(
            "{} - continuous",
            self.name.as_deref().unwrap_or(&self.id)
        ));
        continuous.fix_integer_variables(solution)?;
        Ok(continuous)
    }

    /// Fix the growth activation and binary activator variables to their value in `solution`,
    /// by setting both of their bounds to it
    ///
    /// The variables stay in the model, see [`Model::release_growth`] to undo this.
    ///
    /// # Returns
    /// The number of variables fixed
    pub fn fix_growth(&mut self, solution: &IndexMap<String, f64>) -> Result<usize, ModelError> {
        let mut values = IndexMap::new();
        for var in self.variables.values().filter(|v| is_growth_variable(v)) {
            let value = solution
                .get(&var.id)
                .ok_or_else(|| ModelError::MissingSolutionValue(var.id.clone()))?;
            values.insert(var.id.clone(), value.round());
        }
        for (id, value) in values.iter() {
            self.update_variable_bounds(id, *value, *value)?;
        }
        log::info!(
            target: "thermors:model",
            "fixed {} growth variables of model {}",
            values.len(),
            self.id
        );
        Ok(values.len())
    }

    /// Release the growth variables fixed by [`Model::fix_growth`], resetting their bounds
    /// to `[0, 1]`
    ///
    /// # Returns
    /// The number of variables released
    pub fn release_growth(&mut self) -> usize {
        let mut released = 0;
        for var in self.variables.values_mut().filter(|v| is_growth_variable(v)) {
            var.lower_bound = 0.;
            var.upper_bound = 1.;
            released += 1;
        }
        log::info!(
            target: "thermors:model",
            "released {} growth variables of model {}",
            released,
            self.id
        );
        released
    }
    // endregion Fixing Variables

    // region Validation Functions
    /// Check that a constraint to be added is valid to add to this model
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ModelError> {
        if constraint.model().as_deref() != Some(self.id.as_str()) {
            return Err(ModelError::ForeignConstraint {
                name: constraint.name().to_string(),
                model: constraint.model(),
            });
        }
        if self.constraints.contains_key(constraint.name()) {
            return Err(ModelError::ConstraintAlreadyExists(
                constraint.name().to_string(),
            ));
        }
        if let Some(missing) = constraint
            .expr()
            .variables()
            .find(|id| !self.variables.contains_key(*id))
        {
            return Err(ModelError::NonExistentVariablesInConstraint {
                name: constraint.name().to_string(),
                variable: missing.to_string(),
            });
        }
        Ok(())
    }
    // endregion Validation Functions
}

impl Clone for Model {
    /// Deep copy of the model
    ///
    /// The entities are copied into new handles, and the constraints of the copy are attached
    /// to them, so editing the copy never changes this model.
    fn clone(&self) -> Self {
        let mut copy = Model {
            id: self.id.clone(),
            name: self.name.clone(),
            reactions: copy_handles(&self.reactions),
            genes: copy_handles(&self.genes),
            enzymes: copy_handles(&self.enzymes),
            variables: self.variables.clone(),
            constraints: IndexMap::new(),
        };
        copy.constraints = self
            .constraints
            .iter()
            .map(|(name, cons)| (name.clone(), cons.with_hook(copy.rehook(cons.hook()))))
            .collect();
        copy
    }
}

fn copy_handles<T: Clone>(
    handles: &IndexMap<String, Arc<RwLock<T>>>,
) -> IndexMap<String, Arc<RwLock<T>>> {
    handles
        .iter()
        .map(|(id, handle)| (id.clone(), Arc::new(RwLock::new(handle.read().clone()))))
        .collect()
}

fn is_growth_variable(variable: &Variable) -> bool {
    matches!(
        variable.kind,
        Some(VariableKind::GrowthActivation | VariableKind::BinaryActivator)
    )
}

/// Errors associated with the Model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Error when trying to add a reaction with the same id as an existing reaction
    #[error("Tried to add reaction {0}, but a reaction with the same id already exists")]
    ReactionAlreadyExists(String),
    /// Error when trying to add a gene with the same id as an existing gene
    #[error("Tried to add gene {0}, but a gene with the same id already exists")]
    GeneAlreadyExists(String),
    /// Error when trying to add an enzyme with the same id as an existing enzyme
    #[error("Tried to add enzyme {0}, but an enzyme with the same id already exists")]
    EnzymeAlreadyExists(String),
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add variable {0}, but a variable with the same id already exists")]
    VariableAlreadyExists(String),
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add variable {0} with lower_bound > upper_bound")]
    InvalidVariableBounds(String),
    /// Error when trying to access a variable that doesn't exist
    #[error("Tried to access variable {0}, which doesn't exist")]
    NonExistentVariable(String),
    /// Error when trying to add a constraint with the same name as an existing constraint
    #[error("Tried to add constraint {0}, but a constraint with the same name already exists")]
    ConstraintAlreadyExists(String),
    /// Error when trying to add a constraint belonging to another model
    #[error("Constraint {name} belongs to model {model:?}")]
    ForeignConstraint { name: String, model: Option<String> },
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Constraint {name} uses variable {variable}, which is not in the model")]
    NonExistentVariablesInConstraint { name: String, variable: String },
    /// Error when rebuilding a constraint on an entity which is not in the model
    #[error("No {family} hook with id {id} in the model")]
    NonExistentHook { family: HookFamily, id: String },
    /// Error when a solution has no value for an integer variable being fixed
    #[error("Solution has no value for variable {0}")]
    MissingSolutionValue(String),
    /// Error when creating a constraint
    #[error("Unable to create constraint")]
    ConstraintError(#[from] ConstraintError),
    /// Error when creating a variable
    #[error("Unable to create variable")]
    VariableError(#[from] VariableError),
}
