pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::errors::AppError;
use crate::pitches::handlers as pitches;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Investor catalog
        .route(
            "/api/v1/investor-profiles",
            get(analysis::handle_list_investor_profiles),
        )
        .route(
            "/api/v1/investor-profiles/:tag",
            get(analysis::handle_get_investor_profile),
        )
        // Pitches
        .route(
            "/api/v1/pitches",
            get(pitches::handle_list_pitches).post(pitches::handle_create_pitch),
        )
        .route(
            "/api/v1/pitches/analyze",
            post(analysis::handle_submit_and_analyze),
        )
        .route("/api/v1/pitches/history", get(pitches::handle_pitch_history))
        .route("/api/v1/pitches/:id", get(pitches::handle_get_pitch))
        .route(
            "/api/v1/pitches/:id/analyses",
            get(pitches::handle_list_analyses).post(analysis::handle_analyze_pitch),
        )
        .route(
            "/api/v1/pitches/:id/investor-tips",
            post(analysis::handle_investor_tips),
        )
        // Analyses
        .route(
            "/api/v1/analyses/compare",
            get(analysis::handle_compare_analyses),
        )
        .route("/api/v1/analyses/:id", get(analysis::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/export",
            get(analysis::handle_export_analysis),
        )
        // Share links have no defined contract yet
        .route("/api/v1/analyses/:id/share", post(not_implemented))
        // Dashboard
        .route(
            "/api/v1/dashboard/stats",
            get(pitches::handle_dashboard_stats),
        )
        .with_state(state)
}
