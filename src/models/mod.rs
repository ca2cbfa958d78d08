// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AdopterPreferences, RankedCandidate};
pub use requests::PredictQuery;
pub use responses::{PredictResponse, HealthResponse, ErrorResponse};
