//! Data types used by the score aggregation.

use serde::{Deserialize, Serialize};

/// A single row of the returned-scores CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRow {
    #[serde(rename = "idx", alias = "id")]
    pub id: u32,
    #[serde(rename = "andrewid", alias = "handle")]
    pub handle: String,
    pub name: String,
    #[serde(rename = "score", alias = "base_score")]
    pub base_score: f64,
    #[serde(default)]
    pub peer_rating: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ScoreRow {
    /// The rating, treating NaN cells the same as empty ones.
    pub fn rating(&self) -> Option<f64> {
        self.peer_rating.filter(|r| !r.is_nan())
    }
}

/// A student's result after bucketing, written to the scored CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStudent {
    #[serde(rename = "idx")]
    pub id: u32,
    #[serde(rename = "andrewid")]
    pub handle: String,
    pub name: String,
    pub base_score: f64,
    pub peer_rating: Option<f64>,
    pub peer_score: Option<u32>,
    pub total_score: Option<f64>,
    #[serde(skip)]
    pub feedback: Option<String>,
}

/// Outcome of one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    /// Class-wide rating cut points, absent when nobody has a rating.
    pub cut_points: Option<[f64; 5]>,
    pub students: Vec<ScoredStudent>,
}
