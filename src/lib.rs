//! Pet Matcher - prediction service ranking adoptable pets for an adopter
//!
//! Questionnaire answers are normalized into a preference record, joined with
//! every candidate from the document store and scored by a pre-trained
//! random-forest classifier. The best K candidates are returned.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchClassifier, CandidateTable, normalize_preferences};
pub use models::{AdopterPreferences, RankedCandidate, PredictResponse};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_library_exports() {
        let prefs = normalize_preferences(&json!({"a1": "Apartment"})).unwrap();
        assert_eq!(prefs.housing_type, "apartment");
    }
}
