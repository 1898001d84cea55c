// Core algorithm exports
pub mod error;
pub mod features;
pub mod heuristic;
pub mod matcher;
pub mod recorder;
pub mod similarity;
pub mod source;

pub use error::MatchError;
pub use features::{extract, FeatureVector};
pub use heuristic::heuristic_score;
pub use matcher::{Matcher, DEFAULT_LIMIT, DEFAULT_NEIGHBORS};
pub use recorder::{MatchRecorder, InMemoryRecorder, MatchStats, RecordedMatch};
pub use similarity::{similarity_scores, standardize};
pub use source::{ProfileSource, InMemoryProfileSource};
