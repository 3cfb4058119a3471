//! Compares two analyses of the same pitch: score deltas plus a coaching narrative.

use serde::Serialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::analysis::prompts::{render_template, COMPARE_PROMPT_TEMPLATE, COMPARE_SYSTEM};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::analysis::{AnalysisRow, ScoreSet};
use crate::pitches::repository::PitchRepository;
use crate::pitches::service::{load_analysis, Access};

pub const COMPARE_FAILED_MESSAGE: &str = "Failed to compare analyses. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisComparison {
    pub pitch_id: Uuid,
    pub previous_id: Uuid,
    pub current_id: Uuid,
    /// Current minus previous.
    pub score_delta: ScoreSet,
    pub insights: String,
}

/// Both analyses must belong to the same pitch, owned by the caller.
pub async fn compare_analyses(
    repo: &dyn PitchRepository,
    generator: &dyn TextGenerator,
    caller: &Caller,
    previous_id: Uuid,
    current_id: Uuid,
) -> Result<AnalysisComparison, AppError> {
    if previous_id == current_id {
        return Err(AppError::Validation(
            "previous and current must be different analyses".to_string(),
        ));
    }
    let (previous, _) = load_analysis(repo, caller, previous_id, Access::Write).await?;
    let (current, _) = load_analysis(repo, caller, current_id, Access::Write).await?;
    if previous.pitch_id != current.pitch_id {
        return Err(AppError::Validation(
            "Both analyses must belong to the same pitch".to_string(),
        ));
    }

    let score_delta = current.scores().delta_from(&previous.scores());
    let prompt = build_compare_prompt(&previous, &current, &score_delta)?;

    let insights = generator
        .generate(COMPARE_SYSTEM, &prompt)
        .await
        .map_err(|e| {
            error!("Comparison call for {previous_id} -> {current_id} failed: {e}");
            AppError::Generation(COMPARE_FAILED_MESSAGE.to_string())
        })?;

    Ok(AnalysisComparison {
        pitch_id: current.pitch_id,
        previous_id,
        current_id,
        score_delta,
        insights,
    })
}

fn build_compare_prompt(
    previous: &AnalysisRow,
    current: &AnalysisRow,
    delta: &ScoreSet,
) -> Result<String, AppError> {
    let summarize = |a: &AnalysisRow| {
        serde_json::to_string_pretty(&json!({
            "created_at": a.created_at,
            "scores": a.scores(),
            "feedback": a.feedback,
            "elevator_pitch": a.elevator_pitch,
        }))
    };
    let to_internal =
        |e: serde_json::Error| AppError::Internal(anyhow::anyhow!("Failed to serialize analysis: {e}"));

    let previous_json = summarize(previous).map_err(to_internal)?;
    let current_json = summarize(current).map_err(to_internal)?;
    let delta_json = serde_json::to_string(delta).map_err(to_internal)?;

    Ok(render_template(
        COMPARE_PROMPT_TEMPLATE,
        &[
            ("previous_json", previous_json.as_str()),
            ("current_json", current_json.as_str()),
            ("delta_json", delta_json.as_str()),
        ],
    ))
}
