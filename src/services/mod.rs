// Service exports
pub mod documents;

pub use documents::{DocumentStoreClient, DocumentStoreConfig, DocumentStoreError};
