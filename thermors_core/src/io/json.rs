//! Module providing JSON IO for the constraints of a Model
//!
//! Constraints are written as the kind, the id of the entity they are attached to, and their
//! name, expression and bounds. Reading rebuilds each of them on the entities of the model
//! being read into, so the entities and variables have to be present already.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::constraint::{Constraint, ConstraintOptions};
use crate::optimize::expression::LinearExpression;
use crate::optimize::kind::ConstraintKind;

// region JSON Constraint
/// Represents a JSON serialized constraint
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct JsonConstraint {
    kind: String,
    id: String,
    name: String,
    expr: LinearExpression,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
}

impl From<&Constraint> for JsonConstraint {
    fn from(c: &Constraint) -> Self {
        Self {
            kind: c.kind().name().to_string(),
            id: c.id(),
            name: c.name().to_string(),
            expr: c.expr().clone(),
            lower_bound: c.lower_bound(),
            upper_bound: c.upper_bound(),
        }
    }
}
// endregion JSON Constraint

impl Model {
    /// Serialize the constraints of the model into a JSON string
    pub fn constraints_to_json(&self) -> Result<String, JsonError> {
        let json_constraints: Vec<JsonConstraint> =
            self.constraints().map(JsonConstraint::from).collect();
        Ok(serde_json::to_string(&json_constraints)?)
    }

    /// Write the constraints of the model to a JSON file
    pub fn write_constraints_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let json_string = self.constraints_to_json()?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Rebuild the constraints serialized in `json` and add them to this model
    ///
    /// Every constraint is rebuilt and validated before any is added, so when one of them
    /// can't be rebuilt the model is left unchanged.
    ///
    /// # Returns
    /// The number of constraints added
    pub fn load_constraints_json(&mut self, json: &str) -> Result<usize, JsonError> {
        let json_constraints = match serde_json::from_str::<Vec<JsonConstraint>>(json) {
            Ok(constraints) => constraints,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        let mut constraints = Vec::with_capacity(json_constraints.len());
        for cons in json_constraints {
            let kind: ConstraintKind = cons.kind.parse().map_err(ModelError::from)?;
            let options = ConstraintOptions {
                name: Some(cons.name),
                lower_bound: cons.lower_bound,
                upper_bound: cons.upper_bound,
            };
            constraints.push(self.build_constraint(kind, &cons.id, cons.expr, options)?);
        }
        let count = self.add_constraints(constraints)?;
        log::debug!(target: "thermors:io", "loaded {} constraints into {}", count, self.id);
        Ok(count)
    }

    /// Read constraints from a JSON file and add them to this model
    pub fn read_constraints_json<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, JsonError> {
        let json_string = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        self.load_constraints_json(&json_string)
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Unable to rebuild constraint")]
    UnableToRebuild(#[from] ModelError),
    #[error("Serde json error")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

#[cfg(test)]
mod json_tests {
    use super::*;
    use crate::metabolic_model::enzyme::EnzymeBuilder;
    use crate::metabolic_model::gene::Gene;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use crate::optimize::constraint::ConstraintOptionsBuilder;
    use crate::optimize::variable::VariableBuilder;

    fn setup_model(id: &str) -> Model {
        let mut model = Model::new(id);
        model
            .add_reaction(ReactionBuilder::default().id("PFK").build().unwrap())
            .unwrap();
        model.add_gene(Gene::new("b3916")).unwrap();
        model
            .add_enzyme(EnzymeBuilder::default().id("PFK_enzyme").build().unwrap())
            .unwrap();
        for id in ["v_PFK", "E_PFK", "m_b3916"] {
            model
                .add_variable(VariableBuilder::default().id(id).build().unwrap())
                .unwrap();
        }
        model
    }

    fn add_constraints(model: &mut Model) {
        model
            .rebuild_constraint(
                ConstraintKind::Catalytic,
                "PFK",
                LinearExpression::from_terms(&[("v_PFK", 1.), ("E_PFK", -60.)]),
                ConstraintOptions::at_most(0.),
            )
            .unwrap();
        model
            .rebuild_constraint(
                ConstraintKind::ExpressionCoupling,
                "b3916",
                LinearExpression::from_terms(&[("m_b3916", 1.)]).with_constant(-2.),
                ConstraintOptions::equal_to(0.),
            )
            .unwrap();
        model
            .rebuild_constraint(
                ConstraintKind::RibosomeRatio,
                "ribosome",
                LinearExpression::new(),
                ConstraintOptionsBuilder::default()
                    .name("free_ribosomes")
                    .lower_bound(0.)
                    .build()
                    .unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn json_constraint() {
        let data = r#"{
"kind":"MassBalance",
"id":"PFK_enzyme",
"name":"MB_PFK_enzyme",
"expr":{"terms":{"E_PFK":1.0,"v_PFK":-1.0}},
"lower_bound":0.0,
"upper_bound":0.0
}"#;
        let cons: JsonConstraint = serde_json::from_str(data).unwrap();
        assert_eq!(cons.kind, "MassBalance");
        assert_eq!(cons.expr.coefficient("v_PFK"), Some(-1.));
        assert_eq!(cons.expr.constant(), 0.);
        assert_eq!(cons.upper_bound, Some(0.));
    }

    #[test]
    fn reload_constraints() {
        let mut model = setup_model("ecoli");
        add_constraints(&mut model);
        let json = model.constraints_to_json().unwrap();

        let mut reloaded = setup_model("ecoli_copy");
        assert_eq!(reloaded.load_constraints_json(&json).unwrap(), 3);
        assert_eq!(reloaded.num_constraints(), 3);
        for (original, copy) in model.constraints().zip(reloaded.constraints()) {
            assert_eq!(original.kind(), copy.kind());
            assert_eq!(original.name(), copy.name());
            assert_eq!(original.id(), copy.id());
            assert_eq!(original.expr(), copy.expr());
            assert_eq!(original.lower_bound(), copy.lower_bound());
            assert_eq!(original.upper_bound(), copy.upper_bound());
            assert_eq!(copy.model(), Some("ecoli_copy".to_string()));
        }
        assert_eq!(reloaded.constraint("free_ribosomes").unwrap().id(), "ribosome");
    }

    #[test]
    fn reload_from_file() {
        let mut model = setup_model("ecoli");
        add_constraints(&mut model);
        let path = std::env::temp_dir().join(format!(
            "thermors_reload_from_file_{}.json",
            std::process::id()
        ));
        model.write_constraints_json(&path).unwrap();
        let mut reloaded = setup_model("ecoli");
        assert_eq!(reloaded.read_constraints_json(&path).unwrap(), 3);
        let _ = fs::remove_file(&path);
        assert!(reloaded.constraint("EC_PFK").is_some());
    }

    #[test]
    fn bad_json() {
        let mut model = setup_model("ecoli");
        match model.load_constraints_json("not json") {
            Err(JsonError::UnableToParse(_)) => {}
            _ => panic!("Invalid json not caught"),
        }
        let unknown_kind = r#"[{"kind":"Thermodynamic","id":"PFK","name":"TD_PFK",
"expr":{"terms":{}},"lower_bound":null,"upper_bound":null}]"#;
        match model.load_constraints_json(unknown_kind) {
            Err(JsonError::UnableToRebuild(ModelError::ConstraintError(_))) => {}
            _ => panic!("Unknown kind not caught"),
        }
        match model.read_constraints_json("/this/path/does/not/exist.json") {
            Err(JsonError::UnableToRead(_)) => {}
            _ => panic!("Missing file not caught"),
        }
    }

    #[test]
    fn failed_load_adds_nothing() {
        let mut model = setup_model("ecoli");
        // The first constraint is valid, the second is on a gene the model doesn't have
        let partly_bad = r#"[
{"kind":"CatalyticConstraint","id":"PFK","name":"EC_PFK",
"expr":{"terms":{"v_PFK":1.0,"E_PFK":-60.0}},"lower_bound":null,"upper_bound":0.0},
{"kind":"ExpressionCoupling","id":"not_a_gene","name":"EXnot_a_gene",
"expr":{"terms":{}},"lower_bound":0.0,"upper_bound":0.0}
]"#;
        match model.load_constraints_json(partly_bad) {
            Err(JsonError::UnableToRebuild(ModelError::NonExistentHook { id, .. })) => {
                assert_eq!(id, "not_a_gene")
            }
            _ => panic!("Unknown gene not caught"),
        }
        assert_eq!(model.num_constraints(), 0);

        // Two entries with the same name
        let duplicated = r#"[
{"kind":"CatalyticConstraint","id":"PFK","name":"EC_PFK",
"expr":{"terms":{"v_PFK":1.0}},"lower_bound":null,"upper_bound":0.0},
{"kind":"TranslationConstraint","id":"PFK","name":"EC_PFK",
"expr":{"terms":{"v_PFK":1.0}},"lower_bound":null,"upper_bound":0.0}
]"#;
        match model.load_constraints_json(duplicated) {
            Err(JsonError::UnableToRebuild(ModelError::ConstraintAlreadyExists(name))) => {
                assert_eq!(name, "EC_PFK")
            }
            _ => panic!("Duplicated name not caught"),
        }
        assert_eq!(model.num_constraints(), 0);
        assert!(model.constraint("EC_PFK").is_none());
    }
}
