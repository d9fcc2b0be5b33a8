//! Sample Record Generator
//!
//! Prints random employee records, one JSON object per line, for feeding the
//! salary predictor. Numeric fields stay inside the input form's ranges and
//! categorical fields are drawn from the configured option table.
//!
//! Usage: sample-records [count] [seed]

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use salary_predictor::artifacts::CategoricalOptions;
use salary_predictor::config::AppConfig;
use salary_predictor::types::record::CategoricalAttribute;
use salary_predictor::EmployeeRecord;
use std::fs;
use std::io::{self, Write};
use std::ops::RangeInclusive;
use tracing::info;

struct RecordGenerator<'a> {
    rng: StdRng,
    options: &'a CategoricalOptions,
}

impl<'a> RecordGenerator<'a> {
    fn new(options: &'a CategoricalOptions, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, options }
    }

    fn generate(&mut self) -> EmployeeRecord {
        let age = self.rng.gen_range(20..=65u32);
        // no more experience than years since 18
        let years_experience = self.rng.gen_range(0..=30u32.min(age - 18));

        EmployeeRecord {
            years_experience: f64::from(years_experience),
            education_level: self.uniform(1..=5),
            age: f64::from(age),
            certifications: self.uniform(0..=5),
            previous_companies: self.uniform(0..=5),
            performance_rating: self.uniform(1..=5),
            working_hours: self.uniform(35..=60),
            leaves_taken: self.uniform(0..=30),
            remote_work: if self.rng.gen_bool(0.3) { 1.0 } else { 0.0 },
            job_role: self.pick(CategoricalAttribute::JobRole),
            location: self.pick(CategoricalAttribute::Location),
            tech_stack: self.pick(CategoricalAttribute::TechStack),
            department: self.pick(CategoricalAttribute::Department),
            gender: self.pick(CategoricalAttribute::Gender),
            employment_type: self.pick(CategoricalAttribute::EmploymentType),
        }
    }

    fn uniform(&mut self, range: RangeInclusive<u32>) -> f64 {
        f64::from(self.rng.gen_range(range))
    }

    fn pick(&mut self, attr: CategoricalAttribute) -> String {
        let values = self.options.values(attr);
        values[self.rng.gen_range(0..values.len())].clone()
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load_or_default()?;
    salary_predictor::init_logging("sample_records", &config.logging.level, &config.logging.format)?;

    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let seed: Option<u64> = args.get(2).and_then(|s| s.parse().ok());

    let options_path = config.artifacts.options_path();
    let json = fs::read_to_string(&options_path)
        .with_context(|| format!("Failed to read {}", options_path.display()))?;
    let options = CategoricalOptions::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Invalid categorical options: {e}"))?;

    info!(count = count, seed = ?seed, options = %options_path.display(), "Generating sample records");

    let mut generator = RecordGenerator::new(&options, seed);
    let mut stdout = io::stdout().lock();
    for _ in 0..count {
        let record = generator.generate();
        writeln!(stdout, "{}", serde_json::to_string(&record)?)?;
    }

    Ok(())
}
