//! Reference table of known categorical values

use crate::types::record::CategoricalAttribute;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Known values per categorical attribute, in the order they were first seen
/// in the training data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalOptions {
    values: BTreeMap<CategoricalAttribute, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawOptions(HashMap<String, Vec<String>>);

impl CategoricalOptions {
    /// Build from per-attribute value lists. Every attribute must have at least
    /// one value; duplicates keep their first position.
    pub fn new<I, V>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (CategoricalAttribute, V)>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (attr, list) in entries {
            let mut unique: Vec<String> = Vec::new();
            for value in list {
                let value = value.into();
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            values.insert(attr, unique);
        }

        for attr in CategoricalAttribute::ALL {
            match values.get(&attr) {
                None => return Err(format!("no options listed for {attr}")),
                Some(list) if list.is_empty() => {
                    return Err(format!("option list for {attr} is empty"))
                }
                Some(_) => {}
            }
        }

        Ok(Self { values })
    }

    /// Parse the JSON reference table (`{"JobRole": [...], ...}`)
    pub fn from_json(json: &str) -> Result<Self, String> {
        let RawOptions(raw) = serde_json::from_str(json).map_err(|e| e.to_string())?;

        let mut entries = Vec::with_capacity(raw.len());
        for (name, list) in raw {
            match CategoricalAttribute::ALL
                .iter()
                .find(|attr| attr.column_name() == name)
            {
                Some(attr) => entries.push((*attr, list)),
                None => warn!(attribute = %name, "Ignoring options for unknown categorical attribute"),
            }
        }

        Self::new(entries)
    }

    /// Known values of `attr`, for populating selectable options
    pub fn values(&self, attr: CategoricalAttribute) -> &[String] {
        self.values.get(&attr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, attr: CategoricalAttribute, value: &str) -> bool {
        self.values(attr).iter().any(|v| v == value)
    }

    /// First listed value, preselected by the input form
    pub fn default_value(&self, attr: CategoricalAttribute) -> Option<&str> {
        self.values(attr).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoricalAttribute, &[String])> {
        self.values.iter().map(|(attr, list)| (*attr, list.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "JobRole": ["Engineer", "Analyst", "Engineer", "Manager"],
        "Location": ["CityA", "CityB"],
        "TechStack": ["Java", "Python"],
        "Department": ["HR", "Tech"],
        "Gender": ["Female", "Male", "Other"],
        "EmploymentType": ["Contract", "Full-time", "Part-time"]
    }"#;

    #[test]
    fn test_from_json_dedups_in_order() {
        let options = CategoricalOptions::from_json(JSON).unwrap();

        assert_eq!(
            options.values(CategoricalAttribute::JobRole),
            ["Engineer", "Analyst", "Manager"]
        );
        assert_eq!(options.default_value(CategoricalAttribute::Gender), Some("Female"));
        assert!(options.contains(CategoricalAttribute::Location, "CityB"));
        assert!(!options.contains(CategoricalAttribute::Location, "CityZ"));
        assert_eq!(options.iter().count(), 6);
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let json = r#"{"JobRole": ["Engineer"]}"#;
        let err = CategoricalOptions::from_json(json).unwrap_err();
        assert!(err.contains("Location"), "{err}");
    }

    #[test]
    fn test_empty_list_rejected() {
        let json = JSON.replace(r#"["CityA", "CityB"]"#, "[]");
        let err = CategoricalOptions::from_json(&json).unwrap_err();
        assert!(err.contains("empty"), "{err}");
    }

    #[test]
    fn test_unknown_attribute_ignored() {
        let json = JSON.replace("\"JobRole\"", "\"Team\": [\"Red\"], \"JobRole\"");
        let options = CategoricalOptions::from_json(&json).unwrap();
        assert_eq!(options.values(CategoricalAttribute::JobRole).len(), 3);
    }
}
