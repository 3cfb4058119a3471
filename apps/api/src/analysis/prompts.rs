// All LLM prompt constants for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, PITCH_EXPERT_PERSONA};
use crate::models::pitch::InvestorType;

/// Bumped whenever the analysis template or the JSON layout changes.
pub const ANALYSIS_PROMPT_VERSION: u32 = 1;

/// System prompt for pitch analysis.
/// Replace: {persona}, {json_only}
pub const ANALYSIS_SYSTEM_TEMPLATE: &str = r#"{persona}
Your task is to analyze startup pitches and provide detailed, constructive feedback that helps founders improve their messaging and increase their chances of securing investment.

Analyze the pitch on three key dimensions:

1. CLARITY (0-100):
   - How clear and understandable is the value proposition?
   - Is the problem statement well-defined?
   - Is the solution clearly articulated?
   - Is the business model explained effectively?
   - Is the target market clearly identified?

2. PERSUASIVENESS (0-100):
   - How compelling and convincing is the pitch?
   - Does it use strong, evidence-based arguments?
   - Does it address potential objections?
   - Does it create urgency and excitement?
   - Does it effectively communicate the unique value proposition?

3. INVESTOR APPEAL (0-100):
   - How likely is this pitch to attract investment?
   - Does it highlight market opportunity and potential returns?
   - Does it address the team's capabilities and advantages?
   - Does it include relevant metrics and traction?
   - Does it present a clear path to growth and profitability?

For each dimension, provide:
- An integer score from 0 to 100
- Specific, actionable feedback highlighting strengths and weaknesses
- Exactly 3 concrete, prioritized suggestions for improvement

Then, write an improved version of the pitch that addresses every issue you identified. Keep the founder's voice and core message while enhancing clarity, persuasiveness, and investor appeal.

Finally, write a 30-second elevator pitch (2-3 sentences) that captures the essence of the business opportunity.

Return a JSON object with this EXACT structure:
{
  "overallScore": 0-100,
  "categories": {
    "clarity": {
      "score": 0-100,
      "feedback": "string",
      "suggestions": ["string", "string", "string"]
    },
    "persuasiveness": {
      "score": 0-100,
      "feedback": "string",
      "suggestions": ["string", "string", "string"]
    },
    "investorAppeal": {
      "score": 0-100,
      "feedback": "string",
      "suggestions": ["string", "string", "string"]
    }
  },
  "improvedPitch": "string",
  "elevatorPitch": "string"
}

{json_only}"#;

const ANGEL_CONTEXT: &str = "\
The pitch should be optimized for Angel Investors who typically:
- Focus on early-stage startups
- Value the founder's vision and passion
- Are often more willing to take risks on unproven concepts
- May invest based on personal connection to the problem or solution
- Typically invest smaller amounts ($25K-$100K) but can make decisions quickly";

const VC_CONTEXT: &str = "\
The pitch should be optimized for Venture Capital investors who typically:
- Focus on scalable businesses with high growth potential
- Require strong evidence of product-market fit and traction
- Look for clear paths to significant returns (10x+)
- Value metrics, market size, and competitive advantages
- Need to see a clear exit strategy within 5-7 years";

const CORPORATE_CONTEXT: &str = "\
The pitch should be optimized for Corporate Investors who typically:
- Look for strategic alignment with their existing business
- Value potential synergies and integration opportunities
- Consider how the startup could enhance their market position
- May be less focused on immediate financial returns
- Often have longer investment horizons and complex decision processes";

const IMPACT_CONTEXT: &str = "\
The pitch should be optimized for Impact Investors who typically:
- Seek both financial returns and positive social/environmental impact
- Value measurable impact metrics alongside business metrics
- Look for alignment with specific impact goals (e.g., climate, education, health)
- May accept lower financial returns for higher impact potential
- Value sustainability and long-term thinking";

/// Used when no investor type is given or the tag is unknown.
pub const GENERIC_CONTEXT: &str = "\
The pitch should be optimized for general investors, balancing elements that appeal to \
different investor types.";

/// System prompt for investor-matching advice. Reply is free text, not JSON.
pub const INVESTOR_TIPS_SYSTEM: &str = "\
You are an expert in startup fundraising and investor relations with deep knowledge of \
different investor profiles and preferences. \
Your task is to provide specific, actionable advice on how to tailor a startup pitch for a \
particular type of investor. \
Focus on what this investor type values most, what language resonates with them, what metrics \
they prioritize, and how to structure the pitch to maximize appeal.";

/// Investor-matching prompt.
/// Replace: {profile}, {pitch}, {audience}
pub const INVESTOR_TIPS_PROMPT_TEMPLATE: &str = r#"{profile}

Based on this startup pitch:

"{pitch}"

Provide specific, actionable advice on how to tailor this pitch for {audience}.
What should be emphasized? What should be added? What should be removed or de-emphasized?
What specific language, metrics, or proof points would resonate with this investor type?
How should the pitch be structured to maximize appeal?

Format your response as a clear, bulleted list of recommendations that the founder can immediately implement."#;

const ANGEL_PROFILE: &str = "\
Angel Investors typically:
- Are high-net-worth individuals investing their own money
- Often have entrepreneurial backgrounds themselves
- Make decisions based on personal interest and connection to the founders
- Value vision, passion, and potential more than current metrics
- May mentor and provide connections in addition to capital
- Typically invest at pre-seed and seed stages";

const VC_PROFILE: &str = "\
Venture Capital investors typically:
- Manage funds with money from limited partners (LPs)
- Have specific investment theses and portfolio strategies
- Make data-driven decisions based on market size, traction, and growth potential
- Look for companies that can return their entire fund (100x+ potential)
- Have structured investment processes with multiple decision-makers
- Invest across various stages but often focus on Series A and beyond";

const CORPORATE_PROFILE: &str = "\
Corporate Investors typically:
- Invest from a company's balance sheet rather than a dedicated fund
- Look for strategic alignment with their core business
- Value potential for partnership, acquisition, or integration
- May offer market access, customer relationships, and industry expertise
- Often have longer, more complex decision processes
- May have non-financial objectives alongside return expectations";

const IMPACT_PROFILE: &str = "\
Impact Investors typically:
- Seek both financial returns and measurable social/environmental impact
- Have specific impact theses (climate, education, healthcare, etc.)
- Require impact metrics and reporting alongside financial metrics
- Value mission alignment and authentic commitment to impact
- May accept market-rate or below-market-rate returns depending on impact
- Look for scalable solutions to significant social/environmental challenges";

const GENERIC_PROFILE: &str = "\
General investors encompass a broad range of profiles with varying priorities and preferences.";

/// System prompt for comparing two analyses of the same pitch.
pub const COMPARE_SYSTEM: &str = "\
You are an expert pitch coach who specializes in helping founders improve their pitches over \
time. Your task is to compare two analyses of a pitch and explain the improvements made and the \
areas that still need work. Focus on patterns of improvement, the most significant changes, and \
next steps for continued enhancement.";

/// Comparison prompt.
/// Replace: {previous_json}, {current_json}, {delta_json}
pub const COMPARE_PROMPT_TEMPLATE: &str = r#"PREVIOUS ANALYSIS:
{previous_json}

CURRENT ANALYSIS:
{current_json}

SCORE CHANGES (current minus previous):
{delta_json}

Provide insights on:
1. The most significant improvements made between versions
2. Areas where the pitch has shown the most growth
3. Persistent issues that still need to be addressed
4. Recommended next steps for continued improvement

Format your response as a clear, structured analysis that helps the founder understand their progress and next steps."#;

/// The (system, user) instruction pair sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub system: String,
    pub user: String,
}

/// Fills `{name}` placeholders in a single left-to-right pass.
/// Substituted values are never rescanned, so braces inside pitch text or
/// model output pass through untouched. Unknown `{...}` runs are kept verbatim.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            tail.starts_with(name) && tail[name.len()..].starts_with('}')
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Fully rendered analysis system prompt.
pub fn analysis_system_prompt() -> String {
    render_template(
        ANALYSIS_SYSTEM_TEMPLATE,
        &[("persona", PITCH_EXPERT_PERSONA), ("json_only", JSON_ONLY_INSTRUCTION)],
    )
}

/// Paragraph prepended to the pitch text in the analysis prompt.
pub fn investor_context(investor_type: Option<InvestorType>) -> &'static str {
    match investor_type {
        Some(InvestorType::Angel) => ANGEL_CONTEXT,
        Some(InvestorType::Vc) => VC_CONTEXT,
        Some(InvestorType::Corporate) => CORPORATE_CONTEXT,
        Some(InvestorType::Impact) => IMPACT_CONTEXT,
        None => GENERIC_CONTEXT,
    }
}

/// Longer archetype description used for investor-matching advice and the profile catalog.
pub fn investor_profile(investor_type: Option<InvestorType>) -> &'static str {
    match investor_type {
        Some(InvestorType::Angel) => ANGEL_PROFILE,
        Some(InvestorType::Vc) => VC_PROFILE,
        Some(InvestorType::Corporate) => CORPORATE_PROFILE,
        Some(InvestorType::Impact) => IMPACT_PROFILE,
        None => GENERIC_PROFILE,
    }
}

/// Builds the analysis prompt pair. Pure: no I/O, no clock.
pub fn build_analysis_prompt(content: &str, investor_type: Option<InvestorType>) -> AnalysisPrompt {
    let user = format!(
        "{}\n\nHere is the startup pitch to analyze:\n\n{}",
        investor_context(investor_type),
        content
    );
    AnalysisPrompt {
        system: analysis_system_prompt(),
        user,
    }
}

/// Builds the investor-matching prompt.
pub fn build_investor_tips_prompt(content: &str, investor_type: Option<InvestorType>) -> String {
    let audience = match investor_type {
        Some(t) => t.label().to_string(),
        None => "general investors".to_string(),
    };
    render_template(
        INVESTOR_TIPS_PROMPT_TEMPLATE,
        &[
            ("profile", investor_profile(investor_type)),
            ("audience", audience.as_str()),
            ("pitch", content),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PITCH: &str = "We build {solar} kiosks for rural clinics. 40 sites live, $12k MRR.";

    #[test]
    fn test_user_prompt_contains_pitch_verbatim() {
        for investor_type in InvestorType::ALL.into_iter().map(Some).chain([None]) {
            let prompt = build_analysis_prompt(PITCH, investor_type);
            assert!(prompt.user.contains(PITCH));
            assert!(prompt.user.ends_with(PITCH));
        }
    }

    #[test]
    fn test_known_tag_paragraph_precedes_pitch() {
        let prompt = build_analysis_prompt(PITCH, Some(InvestorType::Vc));
        let context_at = prompt.user.find(VC_CONTEXT).expect("vc paragraph present");
        let pitch_at = prompt.user.find(PITCH).unwrap();
        assert!(context_at < pitch_at);
        assert!(!prompt.user.contains(GENERIC_CONTEXT));
    }

    #[test]
    fn test_each_tag_maps_to_its_own_paragraph() {
        assert!(build_analysis_prompt(PITCH, Some(InvestorType::Angel))
            .user
            .contains("Angel Investors"));
        assert!(build_analysis_prompt(PITCH, Some(InvestorType::Corporate))
            .user
            .contains("strategic alignment"));
        assert!(build_analysis_prompt(PITCH, Some(InvestorType::Impact))
            .user
            .contains("social/environmental impact"));
    }

    #[test]
    fn test_absent_or_unknown_tag_uses_generic_paragraph() {
        let absent = build_analysis_prompt(PITCH, None);
        assert!(absent.user.starts_with(GENERIC_CONTEXT));

        let unknown = build_analysis_prompt(PITCH, InvestorType::parse("hedge_fund"));
        assert_eq!(unknown, absent);
    }

    #[test]
    fn test_system_prompt_is_fully_rendered() {
        let system = analysis_system_prompt();
        assert!(!system.contains("{persona}"));
        assert!(!system.contains("{json_only}"));
        for key in [
            "\"overallScore\"",
            "\"clarity\"",
            "\"persuasiveness\"",
            "\"investorAppeal\"",
            "\"improvedPitch\"",
            "\"elevatorPitch\"",
        ] {
            assert!(system.contains(key), "missing {key}");
        }
        assert!(system.contains("Exactly 3"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_analysis_prompt(PITCH, Some(InvestorType::Angel)),
            build_analysis_prompt(PITCH, Some(InvestorType::Angel))
        );
    }

    #[test]
    fn test_investor_tips_prompt_names_audience() {
        let prompt = build_investor_tips_prompt(PITCH, Some(InvestorType::Impact));
        assert!(prompt.contains(IMPACT_PROFILE));
        assert!(prompt.contains("tailor this pitch for Impact Investors"));
        assert!(prompt.contains(PITCH));

        let generic = build_investor_tips_prompt(PITCH, None);
        assert!(generic.contains(GENERIC_PROFILE));
        assert!(generic.contains("general investors"));
    }

    #[test]
    fn test_render_template_does_not_rescan_substituted_values() {
        let rendered = render_template(
            "A={a} B={b} {json} {unknown}",
            &[("a", "see {b}"), ("b", "second")],
        );
        assert_eq!(rendered, "A=see {b} B=second {json} {unknown}");
    }

    #[test]
    fn test_tips_prompt_keeps_placeholder_text_in_pitch() {
        let pitch = "Our {profile} engine routes {audience} leads.";
        let prompt = build_investor_tips_prompt(pitch, Some(InvestorType::Angel));
        assert!(prompt.contains(pitch));
        assert_eq!(prompt.matches(ANGEL_PROFILE).count(), 1);
    }
}
