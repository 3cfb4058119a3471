//! In-memory `PitchRepository` used by gateway, pipeline and router tests.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::parser::AnalysisResult;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::{NewPitch, PitchRow};
use crate::pitches::repository::PitchRepository;

#[derive(Default)]
struct Tables {
    pitches: Vec<PitchRow>,
    analyses: Vec<AnalysisRow>,
    next_pitch_seq: i64,
    next_analysis_seq: i64,
}

#[derive(Default)]
pub struct MemoryPitchRepository {
    tables: RwLock<Tables>,
    frozen_at: Option<DateTime<Utc>>,
}

impl MemoryPitchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row gets the same `created_at`, so ordering falls to `seq`.
    pub fn with_frozen_clock(at: DateTime<Utc>) -> Self {
        Self {
            frozen_at: Some(at),
            ..Self::default()
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }

    pub async fn analysis_count(&self) -> usize {
        self.tables.read().await.analyses.len()
    }
}

#[async_trait]
impl PitchRepository for MemoryPitchRepository {
    async fn insert_pitch(&self, pitch: NewPitch) -> Result<PitchRow, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_pitch_seq += 1;
        let row = PitchRow {
            id: Uuid::new_v4(),
            seq: tables.next_pitch_seq,
            user_id: pitch.user_id,
            title: pitch.title,
            content: pitch.content,
            investor_type: pitch.investor_type.map(|t| t.as_str().to_string()),
            is_public: pitch.is_public,
            created_at: self.now(),
        };
        tables.pitches.push(row.clone());
        Ok(row)
    }

    async fn find_pitch(&self, id: Uuid) -> Result<Option<PitchRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.pitches.iter().find(|p| p.id == id).cloned())
    }

    async fn list_pitches_for_user(&self, user_id: Uuid) -> Result<Vec<PitchRow>, AppError> {
        let tables = self.tables.read().await;
        let mut pitches: Vec<PitchRow> = tables
            .pitches
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        pitches.sort_by_key(|p| Reverse(p.order_key()));
        Ok(pitches)
    }

    async fn insert_analysis(
        &self,
        pitch_id: Uuid,
        result: &AnalysisResult,
    ) -> Result<AnalysisRow, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_analysis_seq += 1;
        let row = AnalysisRow {
            id: Uuid::new_v4(),
            seq: tables.next_analysis_seq,
            pitch_id,
            overall_score: result.overall_score,
            clarity_score: result.categories.clarity.score,
            persuasiveness_score: result.categories.persuasiveness.score,
            investor_appeal_score: result.categories.investor_appeal.score,
            feedback: Json(result.categories.clone()),
            improved_pitch: result.improved_pitch.clone(),
            elevator_pitch: result.elevator_pitch.clone(),
            created_at: self.now(),
        };
        tables.analyses.push(row.clone());
        Ok(row)
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<AnalysisRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.analyses.iter().find(|a| a.id == id).cloned())
    }

    async fn list_analyses_for_pitch(&self, pitch_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        let tables = self.tables.read().await;
        let mut analyses: Vec<AnalysisRow> = tables
            .analyses
            .iter()
            .filter(|a| a.pitch_id == pitch_id)
            .cloned()
            .collect();
        analyses.sort_by_key(|a| Reverse(a.order_key()));
        Ok(analyses)
    }

    async fn find_latest_analysis(&self, pitch_id: Uuid) -> Result<Option<AnalysisRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .analyses
            .iter()
            .filter(|a| a.pitch_id == pitch_id)
            .max_by_key(|a| a.order_key())
            .cloned())
    }

    async fn list_latest_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        let tables = self.tables.read().await;
        let mut latest: HashMap<Uuid, &AnalysisRow> = HashMap::new();
        for analysis in &tables.analyses {
            let owned = tables
                .pitches
                .iter()
                .any(|p| p.id == analysis.pitch_id && p.user_id == user_id);
            if !owned {
                continue;
            }
            latest
                .entry(analysis.pitch_id)
                .and_modify(|current| {
                    if analysis.order_key() > current.order_key() {
                        *current = analysis;
                    }
                })
                .or_insert(analysis);
        }
        Ok(latest.into_values().cloned().collect())
    }

    async fn list_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        let tables = self.tables.read().await;
        let mut analyses: Vec<AnalysisRow> = tables
            .analyses
            .iter()
            .filter(|a| {
                tables
                    .pitches
                    .iter()
                    .any(|p| p.id == a.pitch_id && p.user_id == user_id)
            })
            .cloned()
            .collect();
        analyses.sort_by_key(AnalysisRow::order_key);
        Ok(analyses)
    }
}
