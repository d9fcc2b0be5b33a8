//! Fitted standardization scaler

use serde::{Deserialize, Serialize};

/// Per-column standardization `(x - mean) / scale` with parameters learned
/// at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    /// Column order the scaler was fitted with, when the training side recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self {
            mean,
            scale,
            feature_names_in: None,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let scaler: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(names) = &self.feature_names_in {
            if names.len() != self.mean.len() {
                return Err(format!(
                    "feature_names_in has {} entries but mean has {}",
                    names.len(),
                    self.mean.len()
                ));
            }
        }
        if let Some(i) = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .position(|v| !v.is_finite())
        {
            return Err(format!("non-finite parameter at position {i}"));
        }
        Ok(())
    }

    /// Number of columns the scaler was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one row. `row` must have `width()` columns in fitted order.
    /// A zero scale (constant training column) divides by one.
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        debug_assert_eq!(row.len(), self.width());
        row.iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                (x - mean) / scale
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![10.0, 0.0, 5.0], vec![2.0, 1.0, 0.0]).unwrap();

        let scaled = scaler.transform(&[14.0, -3.0, 7.0]);
        assert_eq!(scaled, vec![2.0, -3.0, 2.0]);
    }

    #[test]
    fn test_from_json_with_feature_names() {
        let json = r#"{"mean": [1.0, 2.0], "scale": [1.0, 4.0], "feature_names_in": ["Age", "WorkingHours"]}"#;
        let scaler = StandardScaler::from_json(json).unwrap();

        assert_eq!(scaler.width(), 2);
        assert_eq!(
            scaler.feature_names_in.as_deref(),
            Some(&["Age".to_string(), "WorkingHours".to_string()][..])
        );
    }

    #[test]
    fn test_rejects_inconsistent_parameters() {
        assert!(StandardScaler::new(vec![], vec![]).is_err());
        assert!(StandardScaler::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).is_err());

        let json = r#"{"mean": [1.0], "scale": [1.0], "feature_names_in": ["Age", "Extra"]}"#;
        assert!(StandardScaler::from_json(json).is_err());
    }
}
