use serde::{Deserialize, Serialize};
use crate::models::domain::RankedCandidate;

/// Response for the predict endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<RankedCandidate>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
