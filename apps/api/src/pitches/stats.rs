//! Read-side aggregates for the dashboard: counts, latest scores, score
//! evolution, recent activity and per-pitch improvement history.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, ScoreSet};
use crate::models::pitch::PitchRow;
use crate::pitches::repository::PitchRepository;

pub const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub score: i32,
    pub pitch_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub kind: &'static str,
    pub title: String,
    pub time: DateTime<Utc>,
    pub score: i32,
    pub pitch_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub pitch_count: usize,
    pub analysis_count: usize,
    /// Scores of the newest analysis of the newest pitch; zeros when there is none.
    pub latest_scores: ScoreSet,
    /// Oldest first.
    pub score_evolution: Vec<ScorePoint>,
    /// Newest first, at most `RECENT_ACTIVITY_LIMIT` items.
    pub recent_activity: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestAnalysisSummary {
    pub id: Uuid,
    pub scores: ScoreSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PitchHistoryEntry {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub latest_analysis: Option<LatestAnalysisSummary>,
    /// Latest minus previous; `None` with fewer than two analyses.
    pub improvement: Option<ScoreSet>,
    pub analysis_count: usize,
}

/// Score delta between the two most recent analyses. Input must be newest first.
pub fn improvement(newest_first: &[AnalysisRow]) -> Option<ScoreSet> {
    match newest_first {
        [latest, previous, ..] => Some(latest.scores().delta_from(&previous.scores())),
        _ => None,
    }
}

/// Builds dashboard stats from the user's pitches (newest first) and
/// analyses (oldest first).
pub fn build_dashboard_stats(pitches: &[PitchRow], analyses_oldest_first: &[AnalysisRow]) -> DashboardStats {
    let titles: HashMap<Uuid, &str> = pitches.iter().map(|p| (p.id, p.title.as_str())).collect();
    let title_of = |pitch_id: &Uuid| titles.get(pitch_id).copied().unwrap_or_default().to_string();

    let latest_scores = pitches
        .first()
        .and_then(|newest_pitch| {
            analyses_oldest_first
                .iter()
                .filter(|a| a.pitch_id == newest_pitch.id)
                .max_by_key(|a| a.order_key())
        })
        .map(AnalysisRow::scores)
        .unwrap_or_default();

    let score_evolution = analyses_oldest_first
        .iter()
        .map(|a| ScorePoint {
            date: a.created_at.date_naive(),
            score: a.overall_score,
            pitch_title: title_of(&a.pitch_id),
        })
        .collect();

    let recent_activity = analyses_oldest_first
        .iter()
        .rev()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|a| ActivityItem {
            id: a.id,
            kind: "analysis",
            title: format!("{} analyzed", title_of(&a.pitch_id)),
            time: a.created_at,
            score: a.overall_score,
            pitch_id: a.pitch_id,
        })
        .collect();

    DashboardStats {
        pitch_count: pitches.len(),
        analysis_count: analyses_oldest_first.len(),
        latest_scores,
        score_evolution,
        recent_activity,
    }
}

pub async fn get_dashboard_stats(
    repo: &dyn PitchRepository,
    caller: &Caller,
) -> Result<DashboardStats, AppError> {
    let pitches = repo.list_pitches_for_user(caller.user_id).await?;
    let analyses = repo.list_analyses_for_user(caller.user_id).await?;
    Ok(build_dashboard_stats(&pitches, &analyses))
}

/// The caller's pitches, newest first, each with its latest scores and improvement.
pub async fn get_pitch_history(
    repo: &dyn PitchRepository,
    caller: &Caller,
) -> Result<Vec<PitchHistoryEntry>, AppError> {
    let pitches = repo.list_pitches_for_user(caller.user_id).await?;
    let mut history = Vec::with_capacity(pitches.len());
    for pitch in pitches {
        let analyses = repo.list_analyses_for_pitch(pitch.id).await?;
        history.push(PitchHistoryEntry {
            id: pitch.id,
            title: pitch.title,
            created_at: pitch.created_at,
            latest_analysis: analyses.first().map(|a| LatestAnalysisSummary {
                id: a.id,
                scores: a.scores(),
                created_at: a.created_at,
            }),
            improvement: improvement(&analyses),
            analysis_count: analyses.len(),
        });
    }
    Ok(history)
}
