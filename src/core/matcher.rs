use std::sync::Arc;

use thiserror::Error;

use crate::core::classifier::MatchClassifier;
use crate::core::forest::ForestError;
use crate::core::table::CandidateTable;
use crate::models::{AdopterPreferences, RankedCandidate};

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("feature column '{0}' is neither a candidate column nor a preference field")]
    MissingFeature(String),

    #[error("no encoder for feature column '{0}'")]
    MissingEncoder(String),

    #[error("classifier rejected the feature matrix: {0}")]
    Classifier(#[from] ForestError),
}

/// Where a feature column's values come from
enum FeatureSource {
    /// Preference field, already encoded; the same for every row
    Constant(f64),
    /// Candidate table column
    Column(usize),
}

/// Result of the ranking process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<RankedCandidate>,
    pub total_candidates: usize,
}

/// Scores candidates against a preference record with the loaded classifier
///
/// # Pipeline Stages
/// 1. Preference fields attached as constant columns
/// 2. Categorical encoding through the saved encoders
/// 3. Match probability per candidate, scaled to 0–100
/// 4. Stable descending sort and top-K truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    classifier: Arc<MatchClassifier>,
}

impl Matcher {
    pub fn new(classifier: Arc<MatchClassifier>) -> Self {
        Self { classifier }
    }

    /// Rank every candidate in `table` for `preferences` and keep the best `top_k`
    ///
    /// Either every candidate is scored or an error is returned; there are no
    /// partial results.
    pub fn find_matches(
        &self,
        table: &CandidateTable,
        preferences: &AdopterPreferences,
        top_k: usize,
    ) -> Result<MatchResult, ScoringError> {
        let sources = self.resolve_features(table, preferences)?;
        let ids = table.animal_ids();

        let mut matches = Vec::with_capacity(table.len());
        let mut row = vec![0.0; sources.len()];
        for (index, animal_id) in ids.into_iter().enumerate() {
            for (position, source) in sources.iter().enumerate() {
                row[position] = match source {
                    FeatureSource::Constant(code) => *code,
                    FeatureSource::Column(column) => {
                        let key = table.category_key(index, *column);
                        self.encode(position, &key)?
                    }
                };
            }

            let probability = self.classifier.match_probability(&row)?;
            matches.push(RankedCandidate {
                animal_id,
                score: to_percentage(probability),
            });
        }

        // sort_by is stable, so equal scores keep table order
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        Ok(MatchResult {
            matches,
            total_candidates: table.len(),
        })
    }

    fn resolve_features(
        &self,
        table: &CandidateTable,
        preferences: &AdopterPreferences,
    ) -> Result<Vec<FeatureSource>, ScoringError> {
        self.classifier
            .feature_cols()
            .iter()
            .enumerate()
            .map(|(position, column)| {
                if let Some(value) = preferences.feature_value(column) {
                    return Ok(FeatureSource::Constant(self.encode(position, &value)?));
                }
                table
                    .column_index(column)
                    .map(FeatureSource::Column)
                    .ok_or_else(|| ScoringError::MissingFeature(column.clone()))
            })
            .collect()
    }

    #[inline]
    fn encode(&self, position: usize, value: &str) -> Result<f64, ScoringError> {
        self.classifier
            .encode(position, value)
            .map(f64::from)
            .ok_or_else(|| {
                let column = self
                    .classifier
                    .feature_cols()
                    .get(position)
                    .cloned()
                    .unwrap_or_default();
                ScoringError::MissingEncoder(column)
            })
    }
}

/// Scale a probability to a percentage rounded to two decimals, halves to even
#[inline]
pub fn to_percentage(probability: f64) -> f64 {
    let percentage = (probability.clamp(0.0, 1.0) * 100.0 * 100.0).round_ties_even() / 100.0;
    percentage.clamp(0.0, 100.0)
}
