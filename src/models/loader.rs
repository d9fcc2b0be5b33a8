//! ONNX regressor loading and execution

use crate::models::Regressor;
use anyhow::{anyhow, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{Tensor, ValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Regression model executed through ONNX Runtime.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex.
pub struct OnnxRegressor {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    n_features: Option<usize>,
}

impl OnnxRegressor {
    /// Load a regressor from an `.onnx` file using `onnx_threads` intra-op threads
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        ort::init().commit()?;
        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input = session.inputs.first();
        let input_name = input
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());
        let n_features = input.and_then(|i| match &i.input_type {
            ValueType::Tensor { shape, .. } => {
                row_width(&shape.iter().copied().collect::<Vec<i64>>())
            }
            _ => None,
        });

        // skl2onnx names regressor outputs "variable"
        let output_name = session
            .outputs
            .iter()
            .find(|o| {
                o.name.contains("variable") || o.name.contains("output") || o.name.contains("pred")
            })
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            n_features = ?n_features,
            "Model loaded successfully"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
            n_features,
        })
    }
}

/// Feature count of a `[batch, n]` input shape. Dynamic dimensions are
/// reported as -1 and leave the width unknown.
fn row_width(dims: &[i64]) -> Option<usize> {
    match dims {
        [_, n] => usize::try_from(*n).ok().filter(|&n| n > 0),
        _ => None,
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict(&self, features: &[f32]) -> Result<f64> {
        // shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| anyhow!("Model output {} not found", self.output_name))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .context("Model output is not a float tensor")?;

        // [1, 1] or [1]: one value per row
        let value = data
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Model returned an empty tensor"))?;

        debug!(model = %self.name, value = value, "ONNX inference complete");
        Ok(f64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_width_from_input_shape() {
        assert_eq!(row_width(&[1, 20]), Some(20));
        assert_eq!(row_width(&[-1, 20]), Some(20));
        assert_eq!(row_width(&[-1, -1]), None);
        assert_eq!(row_width(&[20]), None);
        assert_eq!(row_width(&[1, 0]), None);
    }
}
