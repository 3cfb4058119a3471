use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Feedback block for one scoring dimension.
/// `suggestions` is a fixed-size array: any other length fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFeedback {
    pub score: i32,
    pub feedback: String,
    pub suggestions: [String; 3],
}

/// The three scored dimensions, keyed as in the model contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisCategories {
    pub clarity: CategoryFeedback,
    pub persuasiveness: CategoryFeedback,
    pub investor_appeal: CategoryFeedback,
}

/// A stored analysis. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    /// Monotonic tiebreaker for rows sharing a `created_at` tick.
    pub seq: i64,
    pub pitch_id: Uuid,
    pub overall_score: i32,
    pub clarity_score: i32,
    pub persuasiveness_score: i32,
    pub investor_appeal_score: i32,
    pub feedback: Json<AnalysisCategories>,
    pub improved_pitch: String,
    pub elevator_pitch: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRow {
    pub fn scores(&self) -> ScoreSet {
        ScoreSet {
            overall: self.overall_score,
            clarity: self.clarity_score,
            persuasiveness: self.persuasiveness_score,
            investor_appeal: self.investor_appeal_score,
        }
    }

    /// Sort key for "newest": timestamp first, insertion sequence second.
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.seq)
    }
}

/// The four scores of an analysis, or the difference between two of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub overall: i32,
    pub clarity: i32,
    pub persuasiveness: i32,
    pub investor_appeal: i32,
}

impl ScoreSet {
    /// `self - earlier`, per score.
    pub fn delta_from(&self, earlier: &ScoreSet) -> ScoreSet {
        ScoreSet {
            overall: self.overall - earlier.overall,
            clarity: self.clarity - earlier.clarity,
            persuasiveness: self.persuasiveness - earlier.persuasiveness,
            investor_appeal: self.investor_appeal - earlier.investor_appeal,
        }
    }
}
