//! Storage seam for pitches and analyses.
//!
//! The repository performs no authorization; `pitches::service` wraps it with
//! the caller checks. Analyses are append-only: there is no update or delete.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::parser::AnalysisResult;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::{NewPitch, PitchRow};

/// Carried in `AppState` as `Arc<dyn PitchRepository>`.
#[async_trait]
pub trait PitchRepository: Send + Sync {
    async fn insert_pitch(&self, pitch: NewPitch) -> Result<PitchRow, AppError>;

    async fn find_pitch(&self, id: Uuid) -> Result<Option<PitchRow>, AppError>;

    /// Newest first, by `(created_at, seq)`.
    async fn list_pitches_for_user(&self, user_id: Uuid) -> Result<Vec<PitchRow>, AppError>;

    async fn insert_analysis(
        &self,
        pitch_id: Uuid,
        result: &AnalysisResult,
    ) -> Result<AnalysisRow, AppError>;

    async fn find_analysis(&self, id: Uuid) -> Result<Option<AnalysisRow>, AppError>;

    /// Newest first, by `(created_at, seq)`.
    async fn list_analyses_for_pitch(&self, pitch_id: Uuid) -> Result<Vec<AnalysisRow>, AppError>;

    /// The newest analysis of one pitch.
    async fn find_latest_analysis(&self, pitch_id: Uuid) -> Result<Option<AnalysisRow>, AppError>;

    /// The newest analysis of each pitch the user owns, in no particular order.
    /// Pitches without analyses are absent.
    async fn list_latest_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError>;

    /// Every analysis of every pitch the user owns, oldest first.
    async fn list_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError>;
}

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgPitchRepository {
    pool: PgPool,
}

impl PgPitchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PitchRepository for PgPitchRepository {
    async fn insert_pitch(&self, pitch: NewPitch) -> Result<PitchRow, AppError> {
        Ok(sqlx::query_as::<_, PitchRow>(
            r#"
            INSERT INTO pitches (id, user_id, title, content, investor_type, is_public)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pitch.user_id)
        .bind(&pitch.title)
        .bind(&pitch.content)
        .bind(pitch.investor_type.map(|t| t.as_str()))
        .bind(pitch.is_public)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_pitch(&self, id: Uuid) -> Result<Option<PitchRow>, AppError> {
        Ok(
            sqlx::query_as::<_, PitchRow>("SELECT * FROM pitches WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_pitches_for_user(&self, user_id: Uuid) -> Result<Vec<PitchRow>, AppError> {
        Ok(sqlx::query_as::<_, PitchRow>(
            "SELECT * FROM pitches WHERE user_id = $1 ORDER BY created_at DESC, seq DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_analysis(
        &self,
        pitch_id: Uuid,
        result: &AnalysisResult,
    ) -> Result<AnalysisRow, AppError> {
        // Single INSERT: the row exists completely or not at all.
        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO pitch_analyses
                (id, pitch_id, overall_score, clarity_score, persuasiveness_score,
                 investor_appeal_score, feedback, improved_pitch, elevator_pitch)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pitch_id)
        .bind(result.overall_score)
        .bind(result.categories.clarity.score)
        .bind(result.categories.persuasiveness.score)
        .bind(result.categories.investor_appeal.score)
        .bind(Json(&result.categories))
        .bind(&result.improved_pitch)
        .bind(&result.elevator_pitch)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<AnalysisRow>, AppError> {
        Ok(
            sqlx::query_as::<_, AnalysisRow>("SELECT * FROM pitch_analyses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_analyses_for_pitch(&self, pitch_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRow>(
            "SELECT * FROM pitch_analyses WHERE pitch_id = $1 ORDER BY created_at DESC, seq DESC",
        )
        .bind(pitch_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_latest_analysis(&self, pitch_id: Uuid) -> Result<Option<AnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT * FROM pitch_analyses
            WHERE pitch_id = $1
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(pitch_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_latest_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT DISTINCT ON (a.pitch_id) a.*
            FROM pitch_analyses a
            JOIN pitches p ON p.id = a.pitch_id
            WHERE p.user_id = $1
            ORDER BY a.pitch_id, a.created_at DESC, a.seq DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_analyses_for_user(&self, user_id: Uuid) -> Result<Vec<AnalysisRow>, AppError> {
        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT a.*
            FROM pitch_analyses a
            JOIN pitches p ON p.id = a.pitch_id
            WHERE p.user_id = $1
            ORDER BY a.created_at ASC, a.seq ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
