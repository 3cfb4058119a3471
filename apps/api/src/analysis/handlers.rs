//! Axum route handlers for the analysis pipeline and its read paths.

use std::future::Future;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::compare::{compare_analyses, AnalysisComparison};
use crate::analysis::pipeline::{analyze_pitch, submit_and_analyze};
use crate::analysis::prompts::investor_profile;
use crate::analysis::tips::{investor_tips, InvestorTips};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::{InvestorType, PitchRow};
use crate::pitches::export::{export_analysis, AnalysisExport, ExportFormat};
use crate::pitches::handlers::CreatePitchRequest;
use crate::pitches::service;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubmitAndAnalyzeResponse {
    pub pitch: PitchRow,
    pub analysis: AnalysisRow,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvestorTipsRequest {
    #[serde(default)]
    pub investor_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub previous: Uuid,
    pub current: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestorProfile {
    pub investor_type: InvestorType,
    pub name: &'static str,
    pub description: &'static str,
}

impl From<InvestorType> for InvestorProfile {
    fn from(investor_type: InvestorType) -> Self {
        InvestorProfile {
            investor_type,
            name: investor_type.label(),
            description: investor_profile(Some(investor_type)),
        }
    }
}

/// Runs a pipeline on its own task so a dropped client connection cannot
/// cancel it between the model call and the INSERT.
async fn run_detached<T, F>(pipeline: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(pipeline)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Analysis task aborted: {e}")))?
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/pitches/analyze
///
/// Creates the pitch, then runs the analysis pipeline on it.
pub async fn handle_submit_and_analyze(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreatePitchRequest>,
) -> Result<(StatusCode, Json<SubmitAndAnalyzeResponse>), AppError> {
    let AppState { repo, generator } = state;
    let (pitch, analysis) = run_detached(async move {
        submit_and_analyze(repo.as_ref(), generator.as_ref(), &caller, req.into()).await
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitAndAnalyzeResponse { pitch, analysis }),
    ))
}

/// POST /api/v1/pitches/:id/analyses
pub async fn handle_analyze_pitch(
    State(state): State<AppState>,
    caller: Caller,
    Path(pitch_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnalysisRow>), AppError> {
    let AppState { repo, generator } = state;
    let analysis = run_detached(async move {
        analyze_pitch(repo.as_ref(), generator.as_ref(), &caller, pitch_id).await
    })
    .await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

/// POST /api/v1/pitches/:id/investor-tips
///
/// The body is optional; without one the pitch's own investor type is used.
pub async fn handle_investor_tips(
    State(state): State<AppState>,
    caller: Caller,
    Path(pitch_id): Path<Uuid>,
    body: Option<Json<InvestorTipsRequest>>,
) -> Result<Json<InvestorTips>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let tips = investor_tips(
        state.repo.as_ref(),
        state.generator.as_ref(),
        &caller,
        pitch_id,
        req.investor_type.as_deref(),
    )
    .await?;
    Ok(Json(tips))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    caller: Caller,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AnalysisRow>, AppError> {
    Ok(Json(
        service::get_analysis(state.repo.as_ref(), &caller, analysis_id).await?,
    ))
}

/// GET /api/v1/analyses/compare?previous=..&current=..
pub async fn handle_compare_analyses(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<CompareQuery>,
) -> Result<Json<AnalysisComparison>, AppError> {
    let comparison = compare_analyses(
        state.repo.as_ref(),
        state.generator.as_ref(),
        &caller,
        query.previous,
        query.current,
    )
    .await?;
    Ok(Json(comparison))
}

/// GET /api/v1/analyses/:id/export?format=json|pdf|docx
pub async fn handle_export_analysis(
    State(state): State<AppState>,
    caller: Caller,
    Path(analysis_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<AnalysisExport>, AppError> {
    let format = ExportFormat::parse(query.format.as_deref());
    Ok(Json(
        export_analysis(state.repo.as_ref(), &caller, analysis_id, format).await?,
    ))
}

/// GET /api/v1/investor-profiles
pub async fn handle_list_investor_profiles() -> Json<Vec<InvestorProfile>> {
    Json(InvestorType::ALL.into_iter().map(InvestorProfile::from).collect())
}

/// GET /api/v1/investor-profiles/:tag
pub async fn handle_get_investor_profile(
    Path(tag): Path<String>,
) -> Result<Json<InvestorProfile>, AppError> {
    InvestorType::parse(&tag)
        .map(|t| Json(t.into()))
        .ok_or_else(|| AppError::NotFound(format!("Investor profile '{tag}' not found")))
}
