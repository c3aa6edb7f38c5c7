use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rate unit of an extracted or requested price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Hourly,
    Monthly,
}

impl PriceType {
    /// Japanese label used in exclusion messages and reason lines
    pub fn label(&self) -> &'static str {
        match self {
            PriceType::Hourly => "時給",
            PriceType::Monthly => "月額",
        }
    }

    /// Unit suffix for displaying an amount ("円/時" or "円/月")
    pub fn unit(&self) -> &'static str {
        match self {
            PriceType::Hourly => "円/時",
            PriceType::Monthly => "円/月",
        }
    }
}

/// A single listing record pulled from the sheet source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anken {
    pub id: String,
    pub name: String,
    #[serde(rename = "fullText")]
    pub full_text: String,
}

/// Candidate's search request. Every field is optional; an unset field
/// disables the corresponding rule rather than penalizing listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCondition {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "priceType", default)]
    pub price_type: Option<PriceType>,
    #[serde(rename = "minPrice", default)]
    pub min_price: Option<u32>,
    #[serde(rename = "workHours", default)]
    pub work_hours: Option<String>,
    #[serde(rename = "workTimeZone", default)]
    pub work_time_zone: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Years of experience for one skill, as reported by the AI parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceYears {
    Years(f64),
    Unknown(String),
}

/// AI-derived skill-sheet summary, consumed as-is by the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: HashMap<String, ExperienceYears>,
    #[serde(rename = "rawText", default)]
    pub raw_text: String,
}

impl SkillProfile {
    /// Lenient parse of the AI parser's JSON response. Code fences are
    /// stripped, missing fields fall back to defaults, and an unparseable
    /// response yields an empty profile with a generic summary — a parse
    /// failure must never surface into the matching pipeline.
    pub fn from_llm_response(response_text: &str, raw_text: &str) -> Self {
        let cleaned = response_text
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string();

        match serde_json::from_str::<SkillProfile>(&cleaned) {
            Ok(mut profile) => {
                if profile.summary.is_empty() {
                    profile.summary = "スキル情報を解析しました".to_string();
                }
                profile.raw_text = raw_text.to_string();
                profile
            }
            Err(_) => SkillProfile {
                summary: "スキルシートを解析しました".to_string(),
                skills: vec![],
                years_of_experience: HashMap::new(),
                raw_text: raw_text.to_string(),
            },
        }
    }
}

/// Typed warning attached to a matched listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    LocationOutOfRange,
    LocationUnknown,
    PriceUnknown,
}

/// Price pulled out of a listing's free text; recomputed per request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExtractedPrice {
    pub price: Option<u32>,
    pub price_type: Option<PriceType>,
}

/// Aggregated outcome of matching the candidate's remarks free text
/// against one listing. A non-empty `ng_matched` is a hard exclusion
/// signal regardless of `score`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemarksMatchResult {
    pub score: i64,
    pub ng_matched: Vec<String>,
    pub positive_matched: Vec<String>,
    pub free_text_matched: Vec<String>,
    pub free_text_unmatched: Vec<String>,
}

/// Status of a condition badge chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    Match,
    Warn,
    Info,
}

/// Short labeled status chip summarizing one matched/unmatched signal.
/// Derived from the same facts as `match_reason_detail`; the two must
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBadge {
    pub label: String,
    pub status: BadgeStatus,
}

/// A listing that survived every exclusion rule, with its score and
/// explanation artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnkenResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "fullText")]
    pub full_text: String,
    pub score: u32,
    pub warnings: Vec<WarningType>,
    #[serde(rename = "warningMessages")]
    pub warning_messages: Vec<String>,
    #[serde(rename = "extractedLocation", skip_serializing_if = "Option::is_none")]
    pub extracted_location: Option<String>,
    #[serde(rename = "extractedPriceType", skip_serializing_if = "Option::is_none")]
    pub extracted_price_type: Option<PriceType>,
    #[serde(rename = "extractedPrice", skip_serializing_if = "Option::is_none")]
    pub extracted_price: Option<u32>,
    #[serde(rename = "matchReason", skip_serializing_if = "Option::is_none")]
    pub match_reason: Option<String>,
    #[serde(rename = "matchReasonDetail", skip_serializing_if = "Option::is_none")]
    pub match_reason_detail: Option<String>,
    #[serde(rename = "conditionBadges")]
    pub condition_badges: Vec<ConditionBadge>,
}

impl AnkenResult {
    /// Combined export text. The sheet sometimes repeats the listing name
    /// as the leading line of the full text; don't duplicate it.
    pub fn combined_text(&self) -> String {
        let name = self.name.trim();
        let full = self.full_text.trim();
        if full.starts_with(name) {
            full.to_string()
        } else {
            format!("{name}\n{full}")
        }
    }
}

/// Why a listing was removed from the matched set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcludeReason {
    PriceMismatch,
    RemarksNg,
    LocationExcluded,
}

/// A listing removed by an exclusion rule; terminal for the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedAnken {
    pub id: String,
    pub name: String,
    #[serde(rename = "fullText")]
    pub full_text: String,
    #[serde(rename = "excludeReason")]
    pub exclude_reason: ExcludeReason,
    #[serde(rename = "excludeReasonMessage")]
    pub exclude_reason_message: String,
}

/// Output of a full matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<AnkenResult>,
    pub excluded: Vec<ExcludedAnken>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "skillSummary", skip_serializing_if = "Option::is_none")]
    pub skill_summary: Option<String>,
}

impl MatchResult {
    /// Matched listings flattened into one copy-ready text block
    pub fn export_text(&self) -> String {
        self.matched
            .iter()
            .map(AnkenResult::combined_text)
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}
