//! Regression model loading and inference

pub mod forest;
pub mod inference;
pub mod loader;

pub use forest::ForestRegressor;
pub use inference::Predictor;
pub use loader::OnnxRegressor;

use anyhow::Result;

/// A loaded regression model mapping one feature row to one value
pub trait Regressor {
    fn name(&self) -> &str;

    /// Expected row width, when the model format records it
    fn n_features(&self) -> Option<usize>;

    fn predict(&self, features: &[f32]) -> Result<f64>;
}
