use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::encoding::LabelEncoder;
use crate::core::forest::{ForestError, RandomForest};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Errors raised while loading a classifier artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    #[error("artifact lists no feature columns")]
    NoFeatures,

    #[error("no label encoder for feature '{0}'")]
    MissingEncoder(String),

    #[error("forest expects {forest} features but artifact lists {listed}")]
    FeatureCountMismatch { forest: usize, listed: usize },

    #[error("positive class {0} is not among the classifier classes")]
    UnknownPositiveClass(i64),

    #[error("invalid forest: {0}")]
    Forest(#[from] ForestError),
}

fn default_positive_class() -> i64 { 1 }
fn default_classes() -> Vec<i64> { vec![0, 1] }

#[derive(Debug, Deserialize)]
struct RawArtifact {
    format_version: u32,
    feature_cols: Vec<String>,
    label_encoders: HashMap<String, LabelEncoder>,
    #[serde(default = "default_classes")]
    classes: Vec<i64>,
    #[serde(default = "default_positive_class")]
    positive_class: i64,
    #[serde(default)]
    unknown_code: u32,
    forest: RandomForest,
}

/// Saved encoders plus fitted forest, as produced by the training side
///
/// Immutable once loaded; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MatchClassifier {
    feature_cols: Vec<String>,
    encoders: Vec<LabelEncoder>,
    forest: RandomForest,
    positive_index: usize,
    unknown_code: u32,
}

impl MatchClassifier {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ArtifactError> {
        let artifact: RawArtifact = serde_json::from_str(raw)?;
        Self::from_raw(artifact)
    }

    fn from_raw(mut artifact: RawArtifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(artifact.format_version));
        }
        if artifact.feature_cols.is_empty() {
            return Err(ArtifactError::NoFeatures);
        }
        if artifact.forest.n_features != artifact.feature_cols.len() {
            return Err(ArtifactError::FeatureCountMismatch {
                forest: artifact.forest.n_features,
                listed: artifact.feature_cols.len(),
            });
        }

        let positive_index = artifact
            .classes
            .iter()
            .position(|c| *c == artifact.positive_class)
            .ok_or(ArtifactError::UnknownPositiveClass(artifact.positive_class))?;

        artifact.forest.validate(artifact.classes.len())?;

        // Encoders are kept in feature order so scoring can index them positionally.
        let encoders = artifact
            .feature_cols
            .iter()
            .map(|col| {
                artifact
                    .label_encoders
                    .remove(col)
                    .ok_or_else(|| ArtifactError::MissingEncoder(col.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            feature_cols: artifact.feature_cols,
            encoders,
            forest: artifact.forest,
            positive_index,
            unknown_code: artifact.unknown_code,
        })
    }

    pub fn feature_cols(&self) -> &[String] {
        &self.feature_cols
    }

    pub fn n_features(&self) -> usize {
        self.feature_cols.len()
    }

    /// Code of `value` in the encoder of feature `position`; unseen values get the fallback code
    pub fn encode(&self, position: usize, value: &str) -> Option<u32> {
        self.encoders
            .get(position)
            .map(|encoder| encoder.encode_or(value, self.unknown_code))
    }

    /// Probability of the "correct match" class for one encoded row
    pub fn match_probability(&self, row: &[f64]) -> Result<f64, ForestError> {
        let probabilities = self.forest.predict_proba(row)?;
        Ok(probabilities.get(self.positive_index).copied().unwrap_or(0.0))
    }
}
