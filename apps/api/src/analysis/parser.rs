//! Analysis result parsing. Turns raw model text into a validated `AnalysisResult`.
//!
//! Parsing is strict: the reply must be exactly the contract JSON object.
//! Nothing is repaired, trimmed of code fences, or clamped.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisCategories, ScoreSet};

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Reply shape as the model sends it. `overallScore` may be missing or null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    overall_score: Option<i32>,
    categories: AnalysisCategories,
    improved_pitch: String,
    elevator_pitch: String,
}

/// A validated analysis, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: i32,
    pub categories: AnalysisCategories,
    pub improved_pitch: String,
    pub elevator_pitch: String,
}

impl AnalysisResult {
    pub fn scores(&self) -> ScoreSet {
        ScoreSet {
            overall: self.overall_score,
            clarity: self.categories.clarity.score,
            persuasiveness: self.categories.persuasiveness.score,
            investor_appeal: self.categories.investor_appeal.score,
        }
    }
}

/// Rounded mean of the three category scores, half away from zero.
pub fn derive_overall_score(clarity: i32, persuasiveness: i32, investor_appeal: i32) -> i32 {
    let sum = f64::from(clarity) + f64::from(persuasiveness) + f64::from(investor_appeal);
    (sum / 3.0).round() as i32
}

/// Parses and validates a raw model reply.
///
/// Fails with `AppError::MalformedAnalysis` on invalid JSON, a shape mismatch
/// (missing key, wrong type, suggestions not exactly three) or a score outside 0 to 100.
/// The raw text is logged for diagnosis on every failure.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, AppError> {
    let parsed: RawAnalysis = serde_json::from_str(raw).map_err(|e| {
        warn!(error = %e, raw_response = %raw, "Model reply is not a valid analysis object");
        AppError::MalformedAnalysis(format!("shape mismatch: {e}"))
    })?;

    let categories = parsed.categories;
    let overall_score = parsed.overall_score.unwrap_or_else(|| {
        derive_overall_score(
            categories.clarity.score,
            categories.persuasiveness.score,
            categories.investor_appeal.score,
        )
    });

    let result = AnalysisResult {
        overall_score,
        categories,
        improved_pitch: parsed.improved_pitch,
        elevator_pitch: parsed.elevator_pitch,
    };

    check_score_ranges(&result.scores()).map_err(|detail| {
        warn!(detail = %detail, raw_response = %raw, "Model reply has out-of-range scores");
        AppError::MalformedAnalysis(detail)
    })?;

    Ok(result)
}

fn check_score_ranges(scores: &ScoreSet) -> Result<(), String> {
    let named = [
        ("overallScore", scores.overall),
        ("clarity", scores.clarity),
        ("persuasiveness", scores.persuasiveness),
        ("investorAppeal", scores.investor_appeal),
    ];
    match named
        .iter()
        .find(|(_, score)| !(MIN_SCORE..=MAX_SCORE).contains(score))
    {
        Some((name, score)) => Err(format!("{name} score {score} is outside 0-100")),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Well-formed reply with the given category scores and optional overall.
    pub fn analysis_json(
        overall: Option<i32>,
        clarity: i32,
        persuasiveness: i32,
        investor_appeal: i32,
    ) -> String {
        let mut value = serde_json::json!({
            "categories": {
                "clarity": {
                    "score": clarity,
                    "feedback": "The problem statement is crisp but the business model is buried.",
                    "suggestions": [
                        "Lead with the problem in one sentence",
                        "State pricing explicitly",
                        "Name the initial customer segment"
                    ]
                },
                "persuasiveness": {
                    "score": persuasiveness,
                    "feedback": "Traction is mentioned but not framed as proof.",
                    "suggestions": [
                        "Quantify growth month over month",
                        "Add a customer quote",
                        "Address the obvious competitor"
                    ]
                },
                "investorAppeal": {
                    "score": investor_appeal,
                    "feedback": "Market size is asserted rather than sized.",
                    "suggestions": [
                        "Show a bottom-up TAM",
                        "Explain use of funds",
                        "Describe the path to Series A"
                    ]
                }
            },
            "improvedPitch": "Rural clinics lose power daily. We sell solar kiosks that keep vaccines cold.",
            "elevatorPitch": "We keep vaccines cold where the grid fails. 40 clinics already pay us."
        });
        if let Some(overall) = overall {
            value["overallScore"] = serde_json::json!(overall);
        }
        value.to_string()
    }
}
