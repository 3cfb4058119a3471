use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Investor archetype a pitch can be tailored for.
/// Any tag outside this set is treated as "generic" and stored as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorType {
    Angel,
    Vc,
    Corporate,
    Impact,
}

impl InvestorType {
    pub const ALL: [InvestorType; 4] = [
        InvestorType::Angel,
        InvestorType::Vc,
        InvestorType::Corporate,
        InvestorType::Impact,
    ];

    /// Parses a boundary tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "angel" => Some(InvestorType::Angel),
            "vc" => Some(InvestorType::Vc),
            "corporate" => Some(InvestorType::Corporate),
            "impact" => Some(InvestorType::Impact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorType::Angel => "angel",
            InvestorType::Vc => "vc",
            InvestorType::Corporate => "corporate",
            InvestorType::Impact => "impact",
        }
    }

    /// Human-readable archetype name.
    pub fn label(&self) -> &'static str {
        match self {
            InvestorType::Angel => "Angel Investors",
            InvestorType::Vc => "Venture Capital",
            InvestorType::Corporate => "Corporate Investors",
            InvestorType::Impact => "Impact Investors",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PitchRow {
    pub id: Uuid,
    /// Monotonic tiebreaker for rows sharing a `created_at` tick.
    pub seq: i64,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub investor_type: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl PitchRow {
    pub fn investor_type(&self) -> Option<InvestorType> {
        self.investor_type.as_deref().and_then(InvestorType::parse)
    }

    /// Sort key for "newest": timestamp first, insertion sequence second.
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.seq)
    }
}

/// Validated input for a new pitch row.
#[derive(Debug, Clone)]
pub struct NewPitch {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub investor_type: Option<InvestorType>,
    pub is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        for investor_type in InvestorType::ALL {
            assert_eq!(InvestorType::parse(investor_type.as_str()), Some(investor_type));
        }
        assert_eq!(InvestorType::parse(" VC "), Some(InvestorType::Vc));
    }

    #[test]
    fn test_parse_unknown_tag_is_generic() {
        assert_eq!(InvestorType::parse("family_office"), None);
        assert_eq!(InvestorType::parse(""), None);
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&InvestorType::Corporate).unwrap();
        assert_eq!(json, r#""corporate""#);
    }
}
