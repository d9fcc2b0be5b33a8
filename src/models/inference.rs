//! Salary inference over a loaded artifact store

use crate::artifacts::ArtifactStore;
use crate::types::estimate::SalaryEstimate;
use crate::types::record::EmployeeRecord;
use anyhow::{bail, Context, Result};
use std::time::Instant;
use tracing::{debug, warn};

/// Runs the loaded model on encoded rows. One forward pass per call; no
/// retries, batching or caching.
pub struct Predictor<'a> {
    store: &'a ArtifactStore,
}

impl<'a> Predictor<'a> {
    pub fn new(store: &'a ArtifactStore) -> Self {
        Self { store }
    }

    /// Predict the unrounded salary for an encoded, scaled row
    pub fn predict(&self, features: &[f32]) -> Result<f64> {
        let expected = self.store.layout().len();
        if features.len() != expected {
            bail!(
                "feature row has {} values, model expects {}",
                features.len(),
                expected
            );
        }

        let model = self.store.model();
        let value = model
            .predict(features)
            .with_context(|| format!("Inference failed for model {}", model.name()))?;

        if !value.is_finite() {
            bail!("model {} returned a non-finite value", model.name());
        }
        Ok(value)
    }

    /// Encode `record` and predict its salary
    pub fn estimate(&self, record: &EmployeeRecord) -> Result<SalaryEstimate> {
        let start_time = Instant::now();

        let out_of_range = record.out_of_range_fields();
        if !out_of_range.is_empty() {
            warn!(fields = ?out_of_range, "Record has values outside the input form ranges");
        }

        let features = self.store.pipeline().encode(record);
        let salary = self.predict(&features)?;

        debug!(
            salary = salary,
            processing_time_us = start_time.elapsed().as_micros() as u64,
            "Salary estimated"
        );

        Ok(SalaryEstimate::new(salary, self.store.model().name()))
    }
}
