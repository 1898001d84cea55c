// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, SleepSchedule, StudyHabit, MatchResult, HeuristicPenalties, BlendWeights, ScoringWeights, NeighborPolicy};
pub use requests::{RankRequest, DashboardQuery};
pub use responses::{RankResponse, RecordedMatchesResponse, HealthResponse, ErrorResponse};
