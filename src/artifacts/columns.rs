//! Canonical training column layout

use crate::artifacts::options::CategoricalOptions;
use crate::feature_pipeline::NumericFeature;
use crate::types::record::CategoricalAttribute;
use std::collections::HashSet;

/// Where the value of a canonical column comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Numeric(NumericFeature),
    /// 1.0 when the record's attribute equals `value`
    OneHot {
        attribute: CategoricalAttribute,
        value: String,
    },
    /// Not produced by the pipeline, always 0.0
    Unmapped,
}

/// The ordered column list the model was trained on, resolved once into
/// per-column sources.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    columns: Vec<String>,
    sources: Vec<ColumnSource>,
}

impl ColumnLayout {
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        if columns.is_empty() {
            return Err("column list is empty".to_string());
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(format!("duplicate column {column:?}"));
            }
        }

        let sources = columns.iter().map(|c| resolve(c)).collect();
        Ok(Self { columns, sources })
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let columns: Vec<String> = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::new(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sources(&self) -> &[ColumnSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Columns the pipeline never produces
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.sources)
            .filter(|(_, source)| **source == ColumnSource::Unmapped)
            .map(|(column, _)| column.as_str())
            .collect()
    }

    /// Known values of `attr` that have no one-hot column. With the training
    /// process dropping the first category this is exactly one value, the
    /// reference category.
    pub fn uncovered_values<'a>(
        &self,
        attr: CategoricalAttribute,
        options: &'a CategoricalOptions,
    ) -> Vec<&'a str> {
        options
            .values(attr)
            .iter()
            .filter(|value| {
                !self.sources.iter().any(|source| {
                    matches!(source, ColumnSource::OneHot { attribute, value: v }
                        if *attribute == attr && v == *value)
                })
            })
            .map(String::as_str)
            .collect()
    }

    /// One-hot columns whose value is not in the known option table
    pub fn unknown_one_hot_columns(&self, options: &CategoricalOptions) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.sources)
            .filter(|(_, source)| match source {
                ColumnSource::OneHot { attribute, value } => !options.contains(*attribute, value),
                _ => false,
            })
            .map(|(column, _)| column.as_str())
            .collect()
    }
}

fn resolve(column: &str) -> ColumnSource {
    if let Some(feature) = NumericFeature::from_column(column) {
        return ColumnSource::Numeric(feature);
    }
    match CategoricalAttribute::parse_one_hot(column) {
        Some((attribute, value)) => ColumnSource::OneHot {
            attribute,
            value: value.to_string(),
        },
        None => ColumnSource::Unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ColumnLayout {
        ColumnLayout::new(
            [
                "YearsExperience",
                "Productivity_Score",
                "JobRole_Manager",
                "Gender_Male",
                "Gender_Other",
                "Bonus",
            ]
            .map(String::from)
            .to_vec(),
        )
        .unwrap()
    }

    fn options() -> CategoricalOptions {
        CategoricalOptions::new([
            (CategoricalAttribute::JobRole, vec!["Engineer", "Manager"]),
            (CategoricalAttribute::Location, vec!["CityA"]),
            (CategoricalAttribute::TechStack, vec!["Python"]),
            (CategoricalAttribute::Department, vec!["Tech"]),
            (CategoricalAttribute::Gender, vec!["Female", "Male"]),
            (CategoricalAttribute::EmploymentType, vec!["Full-time"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolves_sources() {
        let layout = layout();

        assert_eq!(
            layout.sources()[0],
            ColumnSource::Numeric(NumericFeature::YearsExperience)
        );
        assert_eq!(
            layout.sources()[1],
            ColumnSource::Numeric(NumericFeature::ProductivityScore)
        );
        assert_eq!(
            layout.sources()[2],
            ColumnSource::OneHot {
                attribute: CategoricalAttribute::JobRole,
                value: "Manager".to_string()
            }
        );
        assert_eq!(layout.unmapped_columns(), vec!["Bonus"]);
        assert_eq!(layout.position("Gender_Male"), Some(3));
    }

    #[test]
    fn test_reference_categories_come_from_columns() {
        let layout = layout();
        let options = options();

        assert_eq!(
            layout.uncovered_values(CategoricalAttribute::JobRole, &options),
            vec!["Engineer"]
        );
        assert_eq!(
            layout.uncovered_values(CategoricalAttribute::Gender, &options),
            vec!["Female"]
        );
        assert_eq!(layout.unknown_one_hot_columns(&options), vec!["Gender_Other"]);
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let err = ColumnLayout::new(vec!["Age".to_string(), "Age".to_string()]).unwrap_err();
        assert!(err.contains("duplicate"));
        assert!(ColumnLayout::new(Vec::new()).is_err());
        assert!(ColumnLayout::from_json(r#"{"Age": 1}"#).is_err());
    }
}
