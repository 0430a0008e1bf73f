//! Peer-score aggregation.
//!
//! Raw peer ratings are bucketed into bands by percentile rank across the
//! class, and the band score is added to each student's base score.

pub mod aggregate;
pub mod band;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate_scores, load_score_rows};
pub use types::{ScoreRow, ScoreSummary, ScoredStudent};
