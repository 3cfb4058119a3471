//! Persistence gateway: authorized operations over a `PitchRepository`.
//!
//! Access rule for every operation: the caller must own the pitch, or the
//! operation is a read and the pitch is public. Anything else is `Forbidden`.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::analysis::parser::AnalysisResult;
use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::{InvestorType, NewPitch, PitchRow};
use crate::pitches::repository::PitchRepository;

pub const MIN_CONTENT_CHARS: usize = 10;

/// Whether an operation only reads the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Unvalidated pitch submission.
#[derive(Debug, Clone)]
pub struct PitchSubmission {
    pub title: String,
    pub content: String,
    /// Raw boundary tag; unknown values are stored as absent.
    pub investor_type: Option<String>,
    pub is_public: bool,
}

pub fn check_access(caller: &Caller, pitch: &PitchRow, access: Access) -> Result<(), AppError> {
    let owner = pitch.user_id == caller.user_id;
    match access {
        Access::Write if owner => Ok(()),
        Access::Read if owner || pitch.is_public => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

pub fn validate_submission(
    caller: &Caller,
    submission: PitchSubmission,
) -> Result<NewPitch, AppError> {
    if submission.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    // Surrounding whitespace does not count; the stored text stays verbatim.
    if submission.content.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(AppError::Validation(format!(
            "Pitch content must be at least {MIN_CONTENT_CHARS} characters"
        )));
    }
    Ok(NewPitch {
        user_id: caller.user_id,
        title: submission.title,
        content: submission.content,
        investor_type: submission
            .investor_type
            .as_deref()
            .and_then(InvestorType::parse),
        is_public: submission.is_public,
    })
}

pub async fn create_pitch(
    repo: &dyn PitchRepository,
    caller: &Caller,
    submission: PitchSubmission,
) -> Result<PitchRow, AppError> {
    let new_pitch = validate_submission(caller, submission)?;
    let pitch = repo.insert_pitch(new_pitch).await?;
    info!("Created pitch {} for user {}", pitch.id, caller.user_id);
    Ok(pitch)
}

/// Loads a pitch and applies the access rule.
pub async fn load_pitch(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
    access: Access,
) -> Result<PitchRow, AppError> {
    let pitch = repo
        .find_pitch(pitch_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pitch {pitch_id} not found")))?;
    check_access(caller, &pitch, access)?;
    Ok(pitch)
}

pub async fn get_pitch(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
) -> Result<PitchRow, AppError> {
    load_pitch(repo, caller, pitch_id, Access::Read).await
}

/// The caller's own pitches, newest first.
pub async fn list_pitches_for_user(
    repo: &dyn PitchRepository,
    caller: &Caller,
) -> Result<Vec<PitchRow>, AppError> {
    repo.list_pitches_for_user(caller.user_id).await
}

/// Appends an analysis. Only the owner may write.
pub async fn save_analysis(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
    result: &AnalysisResult,
) -> Result<AnalysisRow, AppError> {
    load_pitch(repo, caller, pitch_id, Access::Write).await?;
    let analysis = repo.insert_analysis(pitch_id, result).await?;
    info!(
        "Saved analysis {} for pitch {} (overall {})",
        analysis.id, pitch_id, analysis.overall_score
    );
    Ok(analysis)
}

pub async fn get_latest_analysis(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
) -> Result<Option<AnalysisRow>, AppError> {
    load_pitch(repo, caller, pitch_id, Access::Read).await?;
    repo.find_latest_analysis(pitch_id).await
}

/// A readable pitch together with its newest analysis.
pub async fn get_pitch_with_latest(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
) -> Result<(PitchRow, Option<AnalysisRow>), AppError> {
    let pitch = get_pitch(repo, caller, pitch_id).await?;
    let latest = get_latest_analysis(repo, caller, pitch.id).await?;
    Ok((pitch, latest))
}

/// The caller's own pitches, newest first, each paired with its newest analysis.
/// Two queries regardless of the number of pitches.
pub async fn list_pitches_with_latest(
    repo: &dyn PitchRepository,
    caller: &Caller,
) -> Result<Vec<(PitchRow, Option<AnalysisRow>)>, AppError> {
    let pitches = list_pitches_for_user(repo, caller).await?;
    let mut latest: HashMap<Uuid, AnalysisRow> = repo
        .list_latest_analyses_for_user(caller.user_id)
        .await?
        .into_iter()
        .map(|a| (a.pitch_id, a))
        .collect();
    Ok(pitches
        .into_iter()
        .map(|pitch| {
            let analysis = latest.remove(&pitch.id);
            (pitch, analysis)
        })
        .collect())
}

/// Newest first.
pub async fn list_analyses_for_pitch(
    repo: &dyn PitchRepository,
    caller: &Caller,
    pitch_id: Uuid,
) -> Result<Vec<AnalysisRow>, AppError> {
    load_pitch(repo, caller, pitch_id, Access::Read).await?;
    repo.list_analyses_for_pitch(pitch_id).await
}

/// Loads an analysis together with its pitch, applying the access rule to the pitch.
pub async fn load_analysis(
    repo: &dyn PitchRepository,
    caller: &Caller,
    analysis_id: Uuid,
    access: Access,
) -> Result<(AnalysisRow, PitchRow), AppError> {
    let analysis = repo
        .find_analysis(analysis_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))?;
    let pitch = load_pitch(repo, caller, analysis.pitch_id, access).await?;
    Ok((analysis, pitch))
}

pub async fn get_analysis(
    repo: &dyn PitchRepository,
    caller: &Caller,
    analysis_id: Uuid,
) -> Result<AnalysisRow, AppError> {
    let (analysis, _) = load_analysis(repo, caller, analysis_id, Access::Read).await?;
    Ok(analysis)
}
