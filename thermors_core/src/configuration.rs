//! Process wide defaults used when building variables and fixing solutions
use std::sync::LazyLock;

use parking_lot::RwLock;

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Default lower bound of new variables
    pub lower_bound: f64,
    /// Default upper bound of new variables
    pub upper_bound: f64,
    /// Largest distance from an integer a solution value may have before
    /// rounding it is reported
    pub tolerance: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
        }
    }
}
