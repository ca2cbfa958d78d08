use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string accepted by the predict endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PredictQuery {
    /// Overrides the configured top-K
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub limit: Option<usize>,
}
