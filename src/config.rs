//! Configuration management for the salary predictor

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Serialized form of the regression model
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// ONNX graph executed through ONNX Runtime
    #[default]
    Onnx,
    /// Tree ensemble stored as JSON node arrays
    Forest,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

/// Location and format of the trained artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory containing all artifact files
    pub dir: String,
    /// Model file name, relative to `dir`
    #[serde(default = "default_model_file")]
    pub model_file: String,
    #[serde(default)]
    pub model_format: ModelFormat,
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    #[serde(default = "default_columns_file")]
    pub columns_file: String,
    #[serde(default = "default_options_file")]
    pub options_file: String,
    /// Number of intra-op threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_model_file() -> String {
    "model.onnx".to_string()
}

fn default_scaler_file() -> String {
    "scaler.json".to_string()
}

fn default_columns_file() -> String {
    "train_columns.json".to_string()
}

fn default_options_file() -> String {
    "categorical_options.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ArtifactsConfig {
    /// Config pointing at `dir` with the default file names
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_string_lossy().into_owned(),
            model_file: default_model_file(),
            model_format: ModelFormat::default(),
            scaler_file: default_scaler_file(),
            columns_file: default_columns_file(),
            options_file: default_options_file(),
            onnx_threads: default_onnx_threads(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.model_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.scaler_file)
    }

    pub fn columns_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.columns_file)
    }

    pub fn options_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.options_file)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file plus environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Like [`AppConfig::load`], but falls back to the defaults when the file
    /// does not exist. A file that exists and fails to parse is still an error.
    pub fn load_or_default() -> Result<Self> {
        Self::load_from_path_or_default("config/config.toml")
    }

    pub fn load_from_path_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// Values can be overridden with `SALARY_PREDICTOR__<SECTION>__<KEY>`,
    /// e.g. `SALARY_PREDICTOR__ARTIFACTS__DIR=/srv/artifacts`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SALARY_PREDICTOR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig::in_dir("artifacts"),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifacts.dir, "artifacts");
        assert_eq!(config.artifacts.model_format, ModelFormat::Onnx);
        assert_eq!(config.artifacts.onnx_threads, 1);
        assert_eq!(
            config.artifacts.scaler_path(),
            Path::new("artifacts").join("scaler.json")
        );
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[artifacts]
dir = "/srv/models"
model_file = "model.json"
model_format = "forest"

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.artifacts.model_format, ModelFormat::Forest);
        assert_eq!(config.artifacts.columns_file, "train_columns.json");
        assert_eq!(
            config.artifacts.model_path(),
            Path::new("/srv/models").join("model.json")
        );
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_absent_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path_or_default(dir.path().join("config.toml")).unwrap();
        assert_eq!(config.artifacts.dir, "artifacts");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[artifacts\ndir = ").unwrap();

        assert!(AppConfig::load_from_path_or_default(file.path()).is_err());
    }
}
