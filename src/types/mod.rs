//! Type definitions for the salary predictor

pub mod estimate;
pub mod record;

pub use estimate::SalaryEstimate;
pub use record::{CategoricalAttribute, EmployeeRecord};
