//! Salary estimate returned for one record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model output for a single employee record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryEstimate {
    /// Unique estimate identifier
    pub estimate_id: String,

    /// Unrounded model output
    pub salary: f64,

    /// Name of the model that produced the value
    pub model: String,

    pub predicted_at: DateTime<Utc>,
}

impl SalaryEstimate {
    pub fn new(salary: f64, model: impl Into<String>) -> Self {
        Self {
            estimate_id: uuid::Uuid::new_v4().to_string(),
            salary,
            model: model.into(),
            predicted_at: Utc::now(),
        }
    }

    /// Dollar amount rounded to cents with thousands separators, e.g. `$85,250.50`
    pub fn formatted(&self) -> String {
        format_currency(self.salary)
    }
}

/// Format `amount` as US dollars with two decimals
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}
