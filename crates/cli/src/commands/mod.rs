//! CLI commands for experiment group comparisons.

pub mod anova;
pub mod compare;

pub use anova::{run_anova, AnovaArgs};
pub use compare::{run_compare, CompareArgs};
pub use f_test::{run_f_test, FTestArgs};
