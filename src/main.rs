//! Salary Predictor - Main Entry Point
//!
//! Loads the trained artifacts, then reads one JSON employee record per stdin
//! line and prints its estimated salary.

use anyhow::{Context, Result};
use salary_predictor::{config::AppConfig, ArtifactStore, EmployeeRecord};
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    salary_predictor::init_logging("salary_predictor", &config.logging.level, &config.logging.format)?;

    info!("Starting Salary Predictor");

    let store = match ArtifactStore::load(&config.artifacts) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to load model artifacts");
            eprintln!("Error loading model artifacts: {e}");
            eprintln!(
                "Ensure the model, scaler, train columns and categorical options files are in {}",
                config.artifacts.dir
            );
            std::process::exit(1);
        }
    };

    info!(
        model = %store.model().name(),
        features = store.layout().len(),
        "Salary predictor ready"
    );
    for (attribute, values) in store.options().iter() {
        info!(attribute = %attribute, options = ?values, "Selectable options");
    }

    let predictor = store.predictor();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut processed = 0u64;

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let record: EmployeeRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Failed to parse employee record");
                writeln!(stdout, "Invalid record on line {}: {e}", line_no + 1)?;
                continue;
            }
        };

        let estimate = predictor.estimate(&record)?;
        processed += 1;

        info!(
            estimate_id = %estimate.estimate_id,
            salary = estimate.salary,
            "Salary estimate produced"
        );
        writeln!(stdout, "Estimated Salary: {}", estimate.formatted())?;
    }

    info!(processed = processed, "Salary predictor shutting down");
    Ok(())
}
