//! Employee Salary Predictor Library
//!
//! Loads trained regression artifacts once, turns employee attribute records
//! into model-ready feature rows and returns salary estimates.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod feature_pipeline;
pub mod models;
pub mod types;

pub use artifacts::ArtifactStore;
pub use config::AppConfig;
pub use error::ArtifactError;
pub use feature_pipeline::FeaturePipeline;
pub use models::inference::Predictor;
pub use types::{estimate::SalaryEstimate, record::EmployeeRecord};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `level`; `format` is `json` or anything else for
/// human-readable output.
pub fn init_logging(target: &str, level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{target}={level}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
