use thermors_core::optimize::kind::{ConstraintKind, VariableKind};

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

#[pyclass(name = "ConstraintKind", frozen)]
struct PyConstraintKind {
    inner: ConstraintKind,
}

#[pymethods]
impl PyConstraintKind {
    #[new]
    fn new(name: &str) -> PyResult<Self> {
        let inner = name
            .parse::<ConstraintKind>()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(PyConstraintKind { inner })
    }

    #[getter]
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[getter]
    fn prefix(&self) -> &'static str {
        self.inner.prefix()
    }

    #[getter]
    fn family(&self) -> &'static str {
        self.inner.family().name()
    }

    fn is_a(&self, other: &PyConstraintKind) -> bool {
        self.inner.is_a(other.inner)
    }

    fn make_name(&self, id: &str) -> String {
        self.inner.make_name(id)
    }

    fn __repr__(&self) -> String {
        format!("ConstraintKind('{}')", self.inner.name())
    }
}

/// Names of every constraint kind
#[pyfunction]
fn constraint_kinds() -> Vec<&'static str> {
    ConstraintKind::ALL.iter().map(|kind| kind.name()).collect()
}

/// Names of every variable kind
#[pyfunction]
fn variable_kinds() -> Vec<&'static str> {
    VariableKind::ALL.iter().map(|kind| kind.name()).collect()
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(constraint_kinds, m)?)?;
    m.add_function(wrap_pyfunction!(variable_kinds, m)?)?;
    m.add_class::<PyConstraintKind>()?;
    Ok(())
}
