//! Error types for artifact loading

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The four resources that must be present before any prediction can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Scaler,
    TrainColumns,
    CategoricalOptions,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Model,
        ArtifactKind::Scaler,
        ArtifactKind::TrainColumns,
        ArtifactKind::CategoricalOptions,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::TrainColumns => "train columns",
            ArtifactKind::CategoricalOptions => "categorical options",
        };
        f.write_str(name)
    }
}

/// A required artifact that could not be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl fmt::Display for MissingArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.path.display())
    }
}

/// Startup failures while loading the artifact store. Both variants are fatal.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// One or more required files are absent
    #[error("missing required artifact(s): {}", describe_missing(.0))]
    Missing(Vec<MissingArtifact>),

    /// The artifact exists but cannot be used. `path` is `None` for
    /// artifacts handed over already parsed.
    #[error("malformed {kind} artifact{}: {reason}", describe_location(path.as_deref()))]
    Malformed {
        kind: ArtifactKind,
        path: Option<PathBuf>,
        reason: String,
    },
}

impl ArtifactError {
    pub fn malformed(kind: ArtifactKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ArtifactError::Malformed {
            kind,
            path: Some(path.into()),
            reason: reason.to_string(),
        }
    }

    /// Malformed artifact that was not read from a file
    pub fn invalid(kind: ArtifactKind, reason: impl ToString) -> Self {
        ArtifactError::Malformed {
            kind,
            path: None,
            reason: reason.to_string(),
        }
    }

    /// Kinds of every artifact this error is about
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        match self {
            ArtifactError::Missing(missing) => missing.iter().map(|m| m.kind).collect(),
            ArtifactError::Malformed { kind, .. } => vec![*kind],
        }
    }
}

fn describe_location(path: Option<&Path>) -> String {
    path.map(|p| format!(" at {}", p.display())).unwrap_or_default()
}

fn describe_missing(missing: &[MissingArtifact]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
