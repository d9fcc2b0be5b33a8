//! Employee attribute record submitted for salary estimation

use crate::artifacts::CategoricalOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical attributes, in the order the training process encoded them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoricalAttribute {
    JobRole,
    Location,
    TechStack,
    Department,
    Gender,
    EmploymentType,
}

impl CategoricalAttribute {
    pub const ALL: [CategoricalAttribute; 6] = [
        CategoricalAttribute::JobRole,
        CategoricalAttribute::Location,
        CategoricalAttribute::TechStack,
        CategoricalAttribute::Department,
        CategoricalAttribute::Gender,
        CategoricalAttribute::EmploymentType,
    ];

    /// Training-time column name, also the prefix of its one-hot columns
    pub fn column_name(&self) -> &'static str {
        match self {
            CategoricalAttribute::JobRole => "JobRole",
            CategoricalAttribute::Location => "Location",
            CategoricalAttribute::TechStack => "TechStack",
            CategoricalAttribute::Department => "Department",
            CategoricalAttribute::Gender => "Gender",
            CategoricalAttribute::EmploymentType => "EmploymentType",
        }
    }

    /// Split a one-hot column name into its attribute and value
    pub fn parse_one_hot(column: &str) -> Option<(CategoricalAttribute, &str)> {
        Self::ALL.iter().find_map(|attr| {
            column
                .strip_prefix(attr.column_name())
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|value| (*attr, value))
        })
    }
}

impl fmt::Display for CategoricalAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Raw attributes of one employee, as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(alias = "YearsExperience")]
    pub years_experience: f64,

    /// Ordinal 1-5 (high school, associates, bachelor's, master's, PhD)
    #[serde(alias = "EducationLevel")]
    pub education_level: f64,

    #[serde(alias = "Age")]
    pub age: f64,

    #[serde(alias = "Certifications")]
    pub certifications: f64,

    #[serde(alias = "PreviousCompanies")]
    pub previous_companies: f64,

    /// Last review rating, 1-5
    #[serde(alias = "PerformanceRating")]
    pub performance_rating: f64,

    /// Average weekly working hours
    #[serde(alias = "WorkingHours")]
    pub working_hours: f64,

    /// Leave days taken per year
    #[serde(alias = "LeavesTaken")]
    pub leaves_taken: f64,

    /// 1 for remote positions, 0 otherwise
    #[serde(alias = "RemoteWork")]
    pub remote_work: f64,

    #[serde(alias = "JobRole")]
    pub job_role: String,

    #[serde(alias = "Location")]
    pub location: String,

    #[serde(alias = "TechStack")]
    pub tech_stack: String,

    #[serde(alias = "Department")]
    pub department: String,

    #[serde(alias = "Gender")]
    pub gender: String,

    #[serde(alias = "EmploymentType")]
    pub employment_type: String,
}

/// Inclusive bounds of the input form, with its default value
struct FieldBounds {
    name: &'static str,
    min: f64,
    max: f64,
    default: f64,
}

const YEARS_EXPERIENCE: FieldBounds = FieldBounds {
    name: "years_experience",
    min: 0.0,
    max: 30.0,
    default: 5.0,
};

const EDUCATION_LEVEL: FieldBounds = FieldBounds {
    name: "education_level",
    min: 1.0,
    max: 5.0,
    default: 1.0,
};

const AGE: FieldBounds = FieldBounds {
    name: "age",
    min: 20.0,
    max: 65.0,
    default: 30.0,
};

const CERTIFICATIONS: FieldBounds = FieldBounds {
    name: "certifications",
    min: 0.0,
    max: 5.0,
    default: 1.0,
};

const PREVIOUS_COMPANIES: FieldBounds = FieldBounds {
    name: "previous_companies",
    min: 0.0,
    max: 5.0,
    default: 1.0,
};

const PERFORMANCE_RATING: FieldBounds = FieldBounds {
    name: "performance_rating",
    min: 1.0,
    max: 5.0,
    default: 3.0,
};

const WORKING_HOURS: FieldBounds = FieldBounds {
    name: "working_hours",
    min: 35.0,
    max: 60.0,
    default: 40.0,
};

const LEAVES_TAKEN: FieldBounds = FieldBounds {
    name: "leaves_taken",
    min: 0.0,
    max: 30.0,
    default: 10.0,
};

const REMOTE_WORK: FieldBounds = FieldBounds {
    name: "remote_work",
    min: 0.0,
    max: 1.0,
    default: 0.0,
};

/// Same order as `numeric_values`
const FIELD_BOUNDS: [FieldBounds; 9] = [
    YEARS_EXPERIENCE,
    EDUCATION_LEVEL,
    AGE,
    CERTIFICATIONS,
    PREVIOUS_COMPANIES,
    PERFORMANCE_RATING,
    WORKING_HOURS,
    LEAVES_TAKEN,
    REMOTE_WORK,
];

impl EmployeeRecord {
    /// Record holding the form defaults, with each categorical attribute set
    /// to the first known option.
    pub fn with_defaults(options: &CategoricalOptions) -> Self {
        let pick = |attr| options.default_value(attr).unwrap_or_default().to_string();

        Self {
            years_experience: YEARS_EXPERIENCE.default,
            education_level: EDUCATION_LEVEL.default,
            age: AGE.default,
            certifications: CERTIFICATIONS.default,
            previous_companies: PREVIOUS_COMPANIES.default,
            performance_rating: PERFORMANCE_RATING.default,
            working_hours: WORKING_HOURS.default,
            leaves_taken: LEAVES_TAKEN.default,
            remote_work: REMOTE_WORK.default,
            job_role: pick(CategoricalAttribute::JobRole),
            location: pick(CategoricalAttribute::Location),
            tech_stack: pick(CategoricalAttribute::TechStack),
            department: pick(CategoricalAttribute::Department),
            gender: pick(CategoricalAttribute::Gender),
            employment_type: pick(CategoricalAttribute::EmploymentType),
        }
    }

    /// Value of a categorical attribute
    pub fn categorical(&self, attr: CategoricalAttribute) -> &str {
        match attr {
            CategoricalAttribute::JobRole => &self.job_role,
            CategoricalAttribute::Location => &self.location,
            CategoricalAttribute::TechStack => &self.tech_stack,
            CategoricalAttribute::Department => &self.department,
            CategoricalAttribute::Gender => &self.gender,
            CategoricalAttribute::EmploymentType => &self.employment_type,
        }
    }

    fn numeric_values(&self) -> [f64; 9] {
        [
            self.years_experience,
            self.education_level,
            self.age,
            self.certifications,
            self.previous_companies,
            self.performance_rating,
            self.working_hours,
            self.leaves_taken,
            self.remote_work,
        ]
    }

    /// Numeric fields that fall outside the input form's ranges.
    ///
    /// Informational only: the pipeline encodes out-of-range values as given.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        self.numeric_values()
            .iter()
            .zip(FIELD_BOUNDS.iter())
            .filter(|(value, bounds)| !(bounds.min..=bounds.max).contains(*value))
            .map(|(_, bounds)| bounds.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EmployeeRecord {
        EmployeeRecord {
            years_experience: 5.0,
            education_level: 1.0,
            age: 30.0,
            certifications: 1.0,
            previous_companies: 1.0,
            performance_rating: 3.0,
            working_hours: 40.0,
            leaves_taken: 10.0,
            remote_work: 0.0,
            job_role: "Engineer".to_string(),
            location: "CityA".to_string(),
            tech_stack: "Python".to_string(),
            department: "Tech".to_string(),
            gender: "Other".to_string(),
            employment_type: "Full-time".to_string(),
        }
    }

    #[test]
    fn test_accepts_training_column_names() {
        let json = r#"{
            "YearsExperience": 5, "EducationLevel": 1, "Age": 30,
            "Certifications": 1, "PreviousCompanies": 1, "PerformanceRating": 3,
            "WorkingHours": 40, "LeavesTaken": 10, "RemoteWork": 0,
            "JobRole": "Engineer", "Location": "CityA", "TechStack": "Python",
            "Department": "Tech", "Gender": "Other", "EmploymentType": "Full-time"
        }"#;

        let parsed: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_out_of_range_fields() {
        assert!(record().out_of_range_fields().is_empty());

        let mut rec = record();
        rec.age = 70.0;
        rec.working_hours = 20.0;
        rec.remote_work = 2.0;
        assert_eq!(
            rec.out_of_range_fields(),
            vec!["age", "working_hours", "remote_work"]
        );
    }

    #[test]
    fn test_one_hot_column_names() {
        assert_eq!(
            CategoricalAttribute::parse_one_hot("EmploymentType_Full-time"),
            Some((CategoricalAttribute::EmploymentType, "Full-time"))
        );
        assert_eq!(
            CategoricalAttribute::parse_one_hot("JobRole_Data_Scientist"),
            Some((CategoricalAttribute::JobRole, "Data_Scientist"))
        );
        assert_eq!(CategoricalAttribute::parse_one_hot("Age"), None);
        assert_eq!(CategoricalAttribute::parse_one_hot("JobRoleX"), None);
    }

    #[test]
    fn test_form_defaults_are_in_range() {
        let options = CategoricalOptions::new(
            CategoricalAttribute::ALL.map(|attr| (attr, vec![format!("{attr}_a")])),
        )
        .unwrap();
        let rec = EmployeeRecord::with_defaults(&options);

        assert!(rec.out_of_range_fields().is_empty());
        assert_eq!(rec.years_experience, 5.0);
        assert_eq!(rec.age, 30.0);
        assert_eq!(rec.performance_rating, 3.0);
        assert_eq!(rec.working_hours, 40.0);
        assert_eq!(rec.leaves_taken, 10.0);
        assert_eq!(rec.job_role, "JobRole_a");
    }

    #[test]
    fn test_categorical_lookup() {
        let rec = record();
        assert_eq!(rec.categorical(CategoricalAttribute::Gender), "Other");
        assert_eq!(rec.categorical(CategoricalAttribute::Location), "CityA");
    }
}
