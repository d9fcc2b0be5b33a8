//! Trained artifacts, loaded once at startup and read-only afterwards

pub mod columns;
pub mod options;
pub mod scaler;

pub use columns::{ColumnLayout, ColumnSource};
pub use options::CategoricalOptions;
pub use scaler::StandardScaler;

use crate::config::{ArtifactsConfig, ModelFormat};
use crate::error::{ArtifactError, ArtifactKind, MissingArtifact};
use crate::feature_pipeline::FeaturePipeline;
use crate::models::{ForestRegressor, OnnxRegressor, Predictor, Regressor};
use crate::types::record::CategoricalAttribute;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Immutable context holding the model, scaler, column layout and option table.
///
/// Constructed explicitly and passed by reference to the pipeline and predictor.
pub struct ArtifactStore {
    model: Box<dyn Regressor>,
    scaler: StandardScaler,
    layout: ColumnLayout,
    options: CategoricalOptions,
}

impl ArtifactStore {
    /// Load all four artifacts described by `config`.
    ///
    /// Every absent file is reported in a single [`ArtifactError::Missing`];
    /// there is no partially loaded store.
    pub fn load(config: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        let paths = [
            (ArtifactKind::Model, config.model_path()),
            (ArtifactKind::Scaler, config.scaler_path()),
            (ArtifactKind::TrainColumns, config.columns_path()),
            (ArtifactKind::CategoricalOptions, config.options_path()),
        ];

        let missing: Vec<MissingArtifact> = paths
            .iter()
            .filter(|(_, path)| !path.is_file())
            .map(|(kind, path)| MissingArtifact {
                kind: *kind,
                path: path.clone(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(ArtifactError::Missing(missing));
        }

        let [(_, model_path), (_, scaler_path), (_, columns_path), (_, options_path)] = paths;

        let model = load_model(&model_path, config)?;
        let scaler = parse(ArtifactKind::Scaler, &scaler_path, StandardScaler::from_json)?;
        let layout = parse(ArtifactKind::TrainColumns, &columns_path, ColumnLayout::from_json)?;
        let options = parse(
            ArtifactKind::CategoricalOptions,
            &options_path,
            CategoricalOptions::from_json,
        )?;

        info!(dir = %config.dir, "Artifacts loaded");
        Self::assemble(model, scaler, layout, options).map_err(|(kind, reason)| {
            let path = match kind {
                ArtifactKind::Model => model_path,
                ArtifactKind::Scaler => scaler_path,
                ArtifactKind::TrainColumns => columns_path,
                ArtifactKind::CategoricalOptions => options_path,
            };
            ArtifactError::malformed(kind, path, reason)
        })
    }

    /// Build a store from already-parsed artifacts, applying the same
    /// cross-artifact checks as [`ArtifactStore::load`].
    pub fn new(
        model: Box<dyn Regressor>,
        scaler: StandardScaler,
        layout: ColumnLayout,
        options: CategoricalOptions,
    ) -> Result<Self, ArtifactError> {
        Self::assemble(model, scaler, layout, options)
            .map_err(|(kind, reason)| ArtifactError::invalid(kind, reason))
    }

    /// Check that the artifacts agree on the column count and order
    fn assemble(
        model: Box<dyn Regressor>,
        scaler: StandardScaler,
        layout: ColumnLayout,
        options: CategoricalOptions,
    ) -> Result<Self, (ArtifactKind, String)> {
        if scaler.width() != layout.len() {
            return Err((
                ArtifactKind::Scaler,
                format!(
                    "scaler has {} columns but there are {} training columns",
                    scaler.width(),
                    layout.len()
                ),
            ));
        }
        if let Some(names) = &scaler.feature_names_in {
            if let Some((i, (fitted, canonical))) = names
                .iter()
                .zip(layout.columns())
                .enumerate()
                .find(|(_, (a, b))| a != b)
            {
                return Err((
                    ArtifactKind::Scaler,
                    format!(
                        "scaler was fitted on a different column order: position {i} is {fitted:?}, expected {canonical:?}"
                    ),
                ));
            }
        }
        if let Some(n_features) = model.n_features() {
            if n_features != layout.len() {
                return Err((
                    ArtifactKind::Model,
                    format!(
                        "model expects {} features but there are {} training columns",
                        n_features,
                        layout.len()
                    ),
                ));
            }
        }

        report_layout(&layout, &options);

        Ok(Self {
            model,
            scaler,
            layout,
            options,
        })
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Known categorical values, for populating selectable options
    pub fn options(&self) -> &CategoricalOptions {
        &self.options
    }

    pub fn pipeline(&self) -> FeaturePipeline<'_> {
        FeaturePipeline::new(&self.layout, &self.options, &self.scaler)
    }

    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(self)
    }
}

fn read(kind: ArtifactKind, path: &Path) -> Result<String, ArtifactError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing(vec![MissingArtifact {
            kind,
            path: path.to_path_buf(),
        }]),
        _ => ArtifactError::malformed(kind, path, e),
    })
}

fn parse<T>(
    kind: ArtifactKind,
    path: &Path,
    from_json: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ArtifactError> {
    let json = read(kind, path)?;
    from_json(&json).map_err(|reason| ArtifactError::malformed(kind, path, reason))
}

fn load_model(
    path: &Path,
    config: &ArtifactsConfig,
) -> Result<Box<dyn Regressor>, ArtifactError> {
    match config.model_format {
        ModelFormat::Onnx => OnnxRegressor::load(path, config.onnx_threads)
            .map(|m| Box::new(m) as Box<dyn Regressor>)
            .map_err(|e| ArtifactError::malformed(ArtifactKind::Model, path, format!("{e:#}"))),
        ModelFormat::Forest => {
            let forest = parse(ArtifactKind::Model, path, ForestRegressor::from_json)?;
            info!(
                model = %forest.name(),
                trees = forest.tree_count(),
                "Tree ensemble loaded"
            );
            Ok(Box::new(forest))
        }
    }
}

/// Log how the persisted columns map onto the pipeline's inputs
fn report_layout(layout: &ColumnLayout, options: &CategoricalOptions) {
    let unmapped = layout.unmapped_columns();
    if !unmapped.is_empty() {
        warn!(columns = ?unmapped, "Training columns not produced by the pipeline will be zero");
    }

    let unknown = layout.unknown_one_hot_columns(options);
    if !unknown.is_empty() {
        warn!(columns = ?unknown, "One-hot columns for values missing from the option table");
    }

    for attr in CategoricalAttribute::ALL {
        match layout.uncovered_values(attr, options).as_slice() {
            [reference] => {
                info!(attribute = %attr, reference = %reference, "Reference category")
            }
            [] => warn!(attribute = %attr, "Every known value has a column, no reference category"),
            several => warn!(
                attribute = %attr,
                values = ?several,
                "Several known values have no column and encode identically"
            ),
        }
    }

    info!(columns = layout.len(), "Column layout resolved");
}
