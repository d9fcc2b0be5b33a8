//! Feature engineering for salary model inference.
//!
//! Turns one [`EmployeeRecord`] into the scaled feature row the model was
//! trained on: derived features, one-hot categorical columns aligned to the
//! persisted column list, then standardization.

use crate::artifacts::{CategoricalOptions, ColumnLayout, ColumnSource, StandardScaler};
use crate::types::record::{CategoricalAttribute, EmployeeRecord};
use tracing::warn;

/// Guard added to denominators of the ratio features
pub const EPSILON: f64 = 1e-6;

/// Numeric columns produced by the pipeline, raw and derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFeature {
    YearsExperience,
    EducationLevel,
    Age,
    Certifications,
    PreviousCompanies,
    PerformanceRating,
    WorkingHours,
    LeavesTaken,
    RemoteWork,
    ExperienceAgeRatio,
    TotalSkillsCertifications,
    ProductivityScore,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 12] = [
        NumericFeature::YearsExperience,
        NumericFeature::EducationLevel,
        NumericFeature::Age,
        NumericFeature::Certifications,
        NumericFeature::PreviousCompanies,
        NumericFeature::PerformanceRating,
        NumericFeature::WorkingHours,
        NumericFeature::LeavesTaken,
        NumericFeature::RemoteWork,
        NumericFeature::ExperienceAgeRatio,
        NumericFeature::TotalSkillsCertifications,
        NumericFeature::ProductivityScore,
    ];

    /// Column name used by the training data
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericFeature::YearsExperience => "YearsExperience",
            NumericFeature::EducationLevel => "EducationLevel",
            NumericFeature::Age => "Age",
            NumericFeature::Certifications => "Certifications",
            NumericFeature::PreviousCompanies => "PreviousCompanies",
            NumericFeature::PerformanceRating => "PerformanceRating",
            NumericFeature::WorkingHours => "WorkingHours",
            NumericFeature::LeavesTaken => "LeavesTaken",
            NumericFeature::RemoteWork => "RemoteWork",
            NumericFeature::ExperienceAgeRatio => "Experience_Age_Ratio",
            NumericFeature::TotalSkillsCertifications => "Total_Skills_Certifications",
            NumericFeature::ProductivityScore => "Productivity_Score",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == column)
    }

    fn value(&self, record: &EmployeeRecord, derived: &DerivedFeatures) -> f64 {
        match self {
            NumericFeature::YearsExperience => record.years_experience,
            NumericFeature::EducationLevel => record.education_level,
            NumericFeature::Age => record.age,
            NumericFeature::Certifications => record.certifications,
            NumericFeature::PreviousCompanies => record.previous_companies,
            NumericFeature::PerformanceRating => record.performance_rating,
            NumericFeature::WorkingHours => record.working_hours,
            NumericFeature::LeavesTaken => record.leaves_taken,
            NumericFeature::RemoteWork => record.remote_work,
            NumericFeature::ExperienceAgeRatio => derived.experience_age_ratio,
            NumericFeature::TotalSkillsCertifications => derived.total_skills_certifications,
            NumericFeature::ProductivityScore => derived.productivity_score,
        }
    }
}

/// Features computed from the raw record before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    pub experience_age_ratio: f64,
    pub total_skills_certifications: f64,
    pub productivity_score: f64,
}

impl DerivedFeatures {
    pub fn from_record(record: &EmployeeRecord) -> Self {
        let experience_age_ratio = record.years_experience / (record.age + EPSILON);
        let productivity_score =
            record.performance_rating * (record.working_hours / (record.leaves_taken + EPSILON));

        Self {
            experience_age_ratio: finite_or_zero(experience_age_ratio),
            total_skills_certifications: record.certifications + record.education_level,
            productivity_score: finite_or_zero(productivity_score),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Encodes records against a fixed set of loaded artifacts.
///
/// Borrowed from an [`ArtifactStore`](crate::artifacts::ArtifactStore); holds
/// no state of its own, so encoding the same record twice yields identical rows.
pub struct FeaturePipeline<'a> {
    layout: &'a ColumnLayout,
    options: &'a CategoricalOptions,
    scaler: &'a StandardScaler,
}

impl<'a> FeaturePipeline<'a> {
    pub fn new(
        layout: &'a ColumnLayout,
        options: &'a CategoricalOptions,
        scaler: &'a StandardScaler,
    ) -> Self {
        Self {
            layout,
            options,
            scaler,
        }
    }

    /// Derived features for `record`
    pub fn derive(&self, record: &EmployeeRecord) -> DerivedFeatures {
        DerivedFeatures::from_record(record)
    }

    /// Unscaled row in canonical column order.
    ///
    /// A categorical value missing from the option table encodes like the
    /// reference category (all of its one-hot columns are 0).
    pub fn align(&self, record: &EmployeeRecord) -> Vec<f64> {
        let derived = self.derive(record);

        let known: Vec<(CategoricalAttribute, bool)> = CategoricalAttribute::ALL
            .iter()
            .map(|&attr| {
                let value = record.categorical(attr);
                let is_known = self.options.contains(attr, value);
                if !is_known {
                    warn!(
                        attribute = %attr,
                        value = %value,
                        "Unknown categorical value, encoding as reference category"
                    );
                }
                (attr, is_known)
            })
            .collect();
        let is_known = |attr: CategoricalAttribute| {
            known
                .iter()
                .any(|&(a, known)| a == attr && known)
        };

        self.layout
            .sources()
            .iter()
            .map(|source| match source {
                ColumnSource::Numeric(feature) => feature.value(record, &derived),
                ColumnSource::OneHot { attribute, value } => {
                    if is_known(*attribute) && record.categorical(*attribute) == value {
                        1.0
                    } else {
                        0.0
                    }
                }
                ColumnSource::Unmapped => 0.0,
            })
            .collect()
    }

    /// Model-ready row: aligned, then standardized with the fitted scaler
    pub fn encode(&self, record: &EmployeeRecord) -> Vec<f32> {
        let aligned = self.align(record);
        self.scaler
            .transform(&aligned)
            .into_iter()
            .map(|v| v as f32)
            .collect()
    }

    /// Number of values in every encoded row
    pub fn feature_count(&self) -> usize {
        self.layout.len()
    }

    pub fn feature_names(&self) -> &[String] {
        self.layout.columns()
    }
}
