// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Anken, AnkenResult, BadgeStatus, ConditionBadge, ExcludeReason, ExcludedAnken,
    ExperienceYears, ExtractedPrice, MatchResult, PriceType, RemarksMatchResult, SearchCondition,
    SkillProfile, WarningType,
};
pub use requests::SearchRequest;
pub use responses::{CacheClearResponse, ErrorResponse, HealthResponse};
