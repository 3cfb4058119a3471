//! Investor-matching advice: free-text recommendations for tailoring a pitch
//! to one investor archetype.

use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::analysis::prompts::{build_investor_tips_prompt, INVESTOR_TIPS_SYSTEM};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::pitch::InvestorType;
use crate::pitches::repository::PitchRepository;
use crate::pitches::service::{load_pitch, Access};

pub const TIPS_FAILED_MESSAGE: &str =
    "Failed to generate investor matching tips. Please try again.";

#[derive(Debug, Clone, Serialize)]
pub struct InvestorTips {
    pub pitch_id: Uuid,
    /// `None` means the generic profile was used.
    pub investor_type: Option<InvestorType>,
    pub tips: String,
}

/// Generates tips for the requested tag, falling back to the pitch's own tag,
/// then to the generic profile. A blank requested tag counts as absent. Owner only.
pub async fn investor_tips(
    repo: &dyn PitchRepository,
    generator: &dyn TextGenerator,
    caller: &Caller,
    pitch_id: Uuid,
    requested: Option<&str>,
) -> Result<InvestorTips, AppError> {
    let pitch = load_pitch(repo, caller, pitch_id, Access::Write).await?;
    let investor_type = match requested.map(str::trim).filter(|tag| !tag.is_empty()) {
        Some(tag) => InvestorType::parse(tag),
        None => pitch.investor_type(),
    };

    let prompt = build_investor_tips_prompt(&pitch.content, investor_type);
    let tips = generator
        .generate(INVESTOR_TIPS_SYSTEM, &prompt)
        .await
        .map_err(|e| {
            error!("Investor tips call for pitch {pitch_id} failed: {e}");
            AppError::Generation(TIPS_FAILED_MESSAGE.to_string())
        })?;

    Ok(InvestorTips {
        pitch_id,
        investor_type,
        tips,
    })
}
