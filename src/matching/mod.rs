pub mod pipeline;
pub mod scoring;
pub mod weights;

pub use pipeline::{MatchingEngine, RankedCandidate};
pub use scoring::{calculate_total_score, CompatibilityEngine, MatchingConfig, MatchingError};
pub use weights::{ProfileAttribute, WeightConfig, WeightConfigError};
