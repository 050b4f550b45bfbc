//! Provides a linear expression over model variables, the left hand side of a constraint
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A linear expression, a sum of `coefficient*variable` terms plus a constant
///
/// Terms are keyed by variable id and kept in insertion order.
///
/// # Examples
/// ```rust
/// use thermors_core::optimize::expression::LinearExpression;
/// let expr = LinearExpression::from_terms(&[("x", 2.), ("y", 3.)]).with_constant(1.);
/// assert_eq!(expr.to_string(), "2*x + 3*y + 1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpression {
    /// Map of variable ids to coefficients
    terms: IndexMap<String, f64>,
    /// Constant offset of the expression
    #[serde(default)]
    constant: f64,
}

impl LinearExpression {
    /// Create a new empty expression
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an expression from `(variable id, coefficient)` pairs
    ///
    /// Repeated variables have their coefficients summed.
    pub fn from_terms(terms: &[(&str, f64)]) -> Self {
        let mut expr = Self::new();
        for (id, coef) in terms {
            expr.add_term(id, *coef);
        }
        expr
    }

    /// Set the constant of the expression
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Add `coefficient*variable` to the expression
    pub fn add_term(&mut self, variable_id: &str, coefficient: f64) {
        *self.terms.entry(variable_id.to_string()).or_insert(0.) += coefficient;
    }

    /// Builder style version of [`LinearExpression::add_term`]
    pub fn with_term(mut self, variable_id: &str, coefficient: f64) -> Self {
        self.add_term(variable_id, coefficient);
        self
    }

    /// Coefficient of a variable, None if the variable is not in the expression
    pub fn coefficient(&self, variable_id: &str) -> Option<f64> {
        self.terms.get(variable_id).copied()
    }

    /// Constant of the expression
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Iterate over the `(variable id, coefficient)` terms
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.terms.iter().map(|(id, coef)| (id.as_str(), *coef))
    }

    /// Iterate over the ids of the variables in the expression
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(|id| id.as_str())
    }

    /// Whether the expression contains a term with the variable
    pub fn contains(&self, variable_id: &str) -> bool {
        self.terms.contains_key(variable_id)
    }

    /// Whether the expression has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Remove the term with the given variable, returning its coefficient
    pub fn remove_variable(&mut self, variable_id: &str) -> Option<f64> {
        self.terms.shift_remove(variable_id)
    }

    /// Create a new expression where the variables in `values` are replaced by their
    /// value, folding their contribution into the constant
    pub fn substitute(&self, values: &IndexMap<String, f64>) -> LinearExpression {
        let mut substituted = LinearExpression::new().with_constant(self.constant);
        for (id, coef) in &self.terms {
            match values.get(id) {
                Some(value) => substituted.constant += coef * value,
                None => substituted.add_term(id, *coef),
            }
        }
        substituted
    }
}

impl Display for LinearExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .terms
            .iter()
            .map(|(id, coef)| format!("{}*{}", coef, id))
            .collect();
        if self.constant != 0. || parts.is_empty() {
            parts.push(format!("{}", self.constant));
        }
        write!(f, "{}", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_terms_are_summed() {
        let expr = LinearExpression::from_terms(&[("x", 2.), ("y", 1.), ("x", 0.5)]);
        assert_eq!(expr.coefficient("x"), Some(2.5));
        assert_eq!(expr.variables().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn substitute() {
        let expr = LinearExpression::from_terms(&[("x", 2.), ("y", 3.), ("z", -1.)])
            .with_constant(1.);
        let mut values = IndexMap::new();
        values.insert("y".to_string(), 2.);
        values.insert("z".to_string(), 1.);
        let substituted = expr.substitute(&values);
        assert_eq!(substituted.variables().collect::<Vec<_>>(), vec!["x"]);
        assert!((substituted.constant() - 6.).abs() < 1e-12);
        // The original is untouched
        assert!(expr.contains("y"));
    }

    #[test]
    fn display() {
        assert_eq!(LinearExpression::new().to_string(), "0");
        let expr = LinearExpression::new().with_term("v_PFK", 1.).with_term("E_PFK", -60.);
        assert_eq!(expr.to_string(), "1*v_PFK + -60*E_PFK");
    }
}
