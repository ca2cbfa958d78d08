// Core algorithm exports
pub mod classifier;
pub mod encoding;
pub mod forest;
pub mod matcher;
pub mod normalizer;
pub mod table;

pub use classifier::{MatchClassifier, ArtifactError};
pub use encoding::LabelEncoder;
pub use forest::{RandomForest, DecisionTree, TreeNode, ForestError};
pub use matcher::{Matcher, MatchResult, ScoringError, to_percentage};
pub use normalizer::{normalize_preferences, NormalizeError};
pub use table::{CandidateTable, ColumnKind, TableError};
