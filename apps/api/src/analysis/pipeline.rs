//! Pitch analysis pipeline.
//!
//! Flow: load pitch (owner only) → build_analysis_prompt → generator.generate →
//!       parse_analysis → save_analysis.
//!
//! Persistence is the last step, so any failure leaves no analysis row behind.

use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::parser::parse_analysis;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_PROMPT_VERSION};
use crate::auth::Caller;
use crate::errors::{AppError, ANALYZE_FAILED_MESSAGE};
use crate::llm_client::TextGenerator;
use crate::models::analysis::AnalysisRow;
use crate::models::pitch::PitchRow;
use crate::pitches::repository::PitchRepository;
use crate::pitches::service::{create_pitch, load_pitch, save_analysis, Access, PitchSubmission};

/// Runs one analysis of an existing pitch and persists the result.
pub async fn analyze_pitch(
    repo: &dyn PitchRepository,
    generator: &dyn TextGenerator,
    caller: &Caller,
    pitch_id: Uuid,
) -> Result<AnalysisRow, AppError> {
    let pitch = load_pitch(repo, caller, pitch_id, Access::Write).await?;
    run_pipeline(repo, generator, caller, &pitch).await
}

/// Creates a pitch, then analyzes it.
/// If the analysis fails the pitch stays; no analysis row is written.
pub async fn submit_and_analyze(
    repo: &dyn PitchRepository,
    generator: &dyn TextGenerator,
    caller: &Caller,
    submission: PitchSubmission,
) -> Result<(PitchRow, AnalysisRow), AppError> {
    let pitch = create_pitch(repo, caller, submission).await?;
    let analysis = run_pipeline(repo, generator, caller, &pitch).await?;
    Ok((pitch, analysis))
}

async fn run_pipeline(
    repo: &dyn PitchRepository,
    generator: &dyn TextGenerator,
    caller: &Caller,
    pitch: &PitchRow,
) -> Result<AnalysisRow, AppError> {
    let prompt = build_analysis_prompt(&pitch.content, pitch.investor_type());
    info!(
        "Analyzing pitch {} (prompt v{}, investor type {:?})",
        pitch.id,
        ANALYSIS_PROMPT_VERSION,
        pitch.investor_type
    );

    let raw = generator
        .generate(&prompt.system, &prompt.user)
        .await
        .map_err(|e| {
            error!("Analysis call for pitch {} failed: {e}", pitch.id);
            AppError::Generation(ANALYZE_FAILED_MESSAGE.to_string())
        })?;

    let result = parse_analysis(&raw)?;
    save_analysis(repo, caller, pitch.id, &result).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::fixtures::analysis_json;
    use crate::llm_client::testing::CannedGenerator;
    use crate::pitches::memory::MemoryPitchRepository;
    use crate::pitches::service::list_analyses_for_pitch;

    fn seed_deck() -> PitchSubmission {
        PitchSubmission {
            title: "Seed Deck".to_string(),
            content: "Solar kiosks that keep vaccines cold in rural clinics.".to_string(),
            investor_type: Some("vc".to_string()),
            is_public: false,
        }
    }

    #[tokio::test]
    async fn test_submit_and_analyze_persists_derived_overall() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::replying(&analysis_json(None, 80, 75, 70));
        let caller = Caller::new(Uuid::new_v4());

        let (pitch, analysis) = submit_and_analyze(&repo, &generator, &caller, seed_deck())
            .await
            .unwrap();

        assert_eq!(analysis.pitch_id, pitch.id);
        assert_eq!(analysis.overall_score, 75);
        assert_eq!(analysis.clarity_score, 80);
        assert_eq!(repo.analysis_count().await, 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_pitch_and_investor_context() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::replying(&analysis_json(None, 80, 75, 70));
        let caller = Caller::new(Uuid::new_v4());

        submit_and_analyze(&repo, &generator, &caller, seed_deck())
            .await
            .unwrap();

        let (system, user) = generator.last_prompt().unwrap();
        assert!(system.contains("\"investorAppeal\""));
        assert!(user.contains("Solar kiosks that keep vaccines cold in rural clinics."));
        assert!(user.contains("Venture Capital"));
    }

    #[tokio::test]
    async fn test_malformed_reply_persists_nothing() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::replying("not json");
        let caller = Caller::new(Uuid::new_v4());

        let err = submit_and_analyze(&repo, &generator, &caller, seed_deck())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedAnalysis(_)));
        assert_eq!(repo.analysis_count().await, 0);
    }

    #[tokio::test]
    async fn test_reply_missing_clarity_persists_nothing() {
        let repo = MemoryPitchRepository::new();
        let mut value: serde_json::Value =
            serde_json::from_str(&analysis_json(None, 80, 75, 70)).unwrap();
        value["categories"].as_object_mut().unwrap().remove("clarity");
        let generator = CannedGenerator::replying(&value.to_string());
        let caller = Caller::new(Uuid::new_v4());

        let err = submit_and_analyze(&repo, &generator, &caller, seed_deck())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedAnalysis(_)));
        assert_eq!(repo.analysis_count().await, 0);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_retry_message() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::failing();
        let caller = Caller::new(Uuid::new_v4());

        let err = submit_and_analyze(&repo, &generator, &caller, seed_deck())
            .await
            .unwrap_err();
        match err {
            AppError::Generation(msg) => assert_eq!(msg, "Failed to analyze pitch. Please try again."),
            other => panic!("expected Generation, got {other:?}"),
        }
        assert_eq!(repo.analysis_count().await, 0);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_only_owner_can_analyze() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::replying(&analysis_json(None, 80, 75, 70));
        let owner = Caller::new(Uuid::new_v4());
        let stranger = Caller::new(Uuid::new_v4());

        let mut public = seed_deck();
        public.is_public = true;
        let pitch = create_pitch(&repo, &owner, public).await.unwrap();

        let err = analyze_pitch(&repo, &generator, &stranger, pitch.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_runs_append_in_order() {
        let repo = MemoryPitchRepository::new();
        let generator = CannedGenerator::sequence(vec![
            Some(analysis_json(None, 60, 60, 60)),
            Some(analysis_json(None, 75, 75, 75)),
        ]);
        let caller = Caller::new(Uuid::new_v4());
        let pitch = create_pitch(&repo, &caller, seed_deck()).await.unwrap();

        analyze_pitch(&repo, &generator, &caller, pitch.id).await.unwrap();
        analyze_pitch(&repo, &generator, &caller, pitch.id).await.unwrap();

        let overall: Vec<i32> = list_analyses_for_pitch(&repo, &caller, pitch.id)
            .await
            .unwrap()
            .iter()
            .map(|a| a.overall_score)
            .collect();
        assert_eq!(overall, vec![75, 60]);
    }
}
