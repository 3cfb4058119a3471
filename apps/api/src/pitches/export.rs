use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisCategories, ScoreSet};
use crate::pitches::repository::PitchRepository;
use crate::pitches::service::{load_analysis, Access};

/// Requested export format. Only JSON has a defined layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Pdf,
    Docx,
}

impl ExportFormat {
    /// Unknown or missing formats fall back to JSON.
    pub fn parse(format: Option<&str>) -> Self {
        match format.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("pdf") => ExportFormat::Pdf,
            Some("docx") => ExportFormat::Docx,
            _ => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisExport {
    pub analysis_id: Uuid,
    pub title: String,
    pub original_pitch: String,
    pub improved_pitch: String,
    pub elevator_pitch: String,
    pub scores: ScoreSet,
    pub feedback: AnalysisCategories,
    pub created_at: DateTime<Utc>,
}

/// Exports an analysis. Owner only, since the export carries the original pitch text.
pub async fn export_analysis(
    repo: &dyn PitchRepository,
    caller: &Caller,
    analysis_id: Uuid,
    format: ExportFormat,
) -> Result<AnalysisExport, AppError> {
    let (analysis, pitch) = load_analysis(repo, caller, analysis_id, Access::Write).await?;

    match format {
        ExportFormat::Json => {}
        ExportFormat::Pdf | ExportFormat::Docx => return Err(AppError::NotImplemented),
    }

    Ok(AnalysisExport {
        analysis_id: analysis.id,
        title: pitch.title,
        original_pitch: pitch.content,
        scores: analysis.scores(),
        improved_pitch: analysis.improved_pitch,
        elevator_pitch: analysis.elevator_pitch,
        feedback: analysis.feedback.0,
        created_at: analysis.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::{fixtures::analysis_json, parse_analysis};
    use crate::pitches::memory::MemoryPitchRepository;
    use crate::pitches::service::{create_pitch, save_analysis, PitchSubmission};

    async fn seeded(public: bool) -> (MemoryPitchRepository, Caller, Uuid) {
        let repo = MemoryPitchRepository::new();
        let owner = Caller::new(Uuid::new_v4());
        let pitch = create_pitch(
            &repo,
            &owner,
            PitchSubmission {
                title: "Seed Deck".to_string(),
                content: "Solar kiosks for rural clinics.".to_string(),
                investor_type: Some("impact".to_string()),
                is_public: public,
            },
        )
        .await
        .unwrap();
        let result = parse_analysis(&analysis_json(Some(77), 80, 75, 70)).unwrap();
        let analysis = save_analysis(&repo, &owner, pitch.id, &result).await.unwrap();
        (repo, owner, analysis.id)
    }

    #[test]
    fn test_format_parsing_defaults_to_json() {
        assert_eq!(ExportFormat::parse(None), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("csv")), ExportFormat::Json);
        assert_eq!(ExportFormat::parse(Some("PDF")), ExportFormat::Pdf);
        assert_eq!(ExportFormat::parse(Some("docx")), ExportFormat::Docx);
    }

    #[tokio::test]
    async fn test_json_export_contains_pitch_and_scores() {
        let (repo, owner, analysis_id) = seeded(false).await;
        let export = export_analysis(&repo, &owner, analysis_id, ExportFormat::Json)
            .await
            .unwrap();
        assert_eq!(export.title, "Seed Deck");
        assert_eq!(export.original_pitch, "Solar kiosks for rural clinics.");
        assert_eq!(export.scores.overall, 77);
        assert_eq!(export.scores.investor_appeal, 70);
    }

    #[tokio::test]
    async fn test_binary_formats_are_not_implemented() {
        let (repo, owner, analysis_id) = seeded(false).await;
        for format in [ExportFormat::Pdf, ExportFormat::Docx] {
            assert!(matches!(
                export_analysis(&repo, &owner, analysis_id, format).await,
                Err(AppError::NotImplemented)
            ));
        }
    }

    #[tokio::test]
    async fn test_export_of_public_pitch_is_owner_only() {
        let (repo, _, analysis_id) = seeded(true).await;
        let stranger = Caller::new(Uuid::new_v4());
        assert!(matches!(
            export_analysis(&repo, &stranger, analysis_id, ExportFormat::Json).await,
            Err(AppError::Forbidden)
        ));
    }
}
