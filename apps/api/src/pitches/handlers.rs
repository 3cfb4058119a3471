//! Axum route handlers for pitches and dashboard reads.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::PitchRow;
use crate::pitches::service::{self, PitchSubmission};
use crate::pitches::stats::{self, DashboardStats, PitchHistoryEntry};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Missing fields deserialize as empty so validation reports them by name.
#[derive(Debug, Deserialize)]
pub struct CreatePitchRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub investor_type: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<CreatePitchRequest> for PitchSubmission {
    fn from(req: CreatePitchRequest) -> Self {
        PitchSubmission {
            title: req.title,
            content: req.content,
            investor_type: req.investor_type,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PitchWithLatest {
    #[serde(flatten)]
    pub pitch: PitchRow,
    pub latest_analysis: Option<AnalysisRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/pitches
pub async fn handle_create_pitch(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreatePitchRequest>,
) -> Result<(StatusCode, Json<PitchRow>), AppError> {
    let pitch = service::create_pitch(state.repo.as_ref(), &caller, req.into()).await?;
    Ok((StatusCode::CREATED, Json(pitch)))
}

/// GET /api/v1/pitches
///
/// The caller's pitches, newest first, each with its latest analysis.
pub async fn handle_list_pitches(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<PitchWithLatest>>, AppError> {
    let listed = service::list_pitches_with_latest(state.repo.as_ref(), &caller).await?;
    Ok(Json(
        listed
            .into_iter()
            .map(|(pitch, latest_analysis)| PitchWithLatest {
                pitch,
                latest_analysis,
            })
            .collect(),
    ))
}

/// GET /api/v1/pitches/history
pub async fn handle_pitch_history(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<PitchHistoryEntry>>, AppError> {
    Ok(Json(
        stats::get_pitch_history(state.repo.as_ref(), &caller).await?,
    ))
}

/// GET /api/v1/pitches/:id
pub async fn handle_get_pitch(
    State(state): State<AppState>,
    caller: Caller,
    Path(pitch_id): Path<Uuid>,
) -> Result<Json<PitchWithLatest>, AppError> {
    let (pitch, latest_analysis) =
        service::get_pitch_with_latest(state.repo.as_ref(), &caller, pitch_id).await?;
    Ok(Json(PitchWithLatest {
        pitch,
        latest_analysis,
    }))
}

/// GET /api/v1/pitches/:id/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    caller: Caller,
    Path(pitch_id): Path<Uuid>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    Ok(Json(
        service::list_analyses_for_pitch(state.repo.as_ref(), &caller, pitch_id).await?,
    ))
}

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(
        stats::get_dashboard_stats(state.repo.as_ref(), &caller).await?,
    ))
}
