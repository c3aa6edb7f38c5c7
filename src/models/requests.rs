use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::domain::{PriceType, SearchCondition, SkillProfile};

/// Request to run a matching pass
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(max = 100))]
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "price_type", rename = "priceType", default)]
    pub price_type: Option<PriceType>,
    #[serde(
        alias = "min_price",
        rename = "minPrice",
        default,
        deserialize_with = "lenient_min_price"
    )]
    pub min_price: Option<u32>,
    #[serde(alias = "work_hours", rename = "workHours", default)]
    pub work_hours: Option<String>,
    #[serde(alias = "work_time_zone", rename = "workTimeZone", default)]
    pub work_time_zone: Option<String>,
    #[serde(alias = "start_date", rename = "startDate", default)]
    pub start_date: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(alias = "skill_profile", rename = "skillProfile", default)]
    pub skill_profile: Option<SkillProfile>,
}

impl SearchRequest {
    /// Split off the condition fields consumed by the matching engine
    pub fn condition(&self) -> SearchCondition {
        SearchCondition {
            location: self.location.clone(),
            price_type: self.price_type,
            min_price: self.min_price,
            work_hours: self.work_hours.clone(),
            work_time_zone: self.work_time_zone.clone(),
            start_date: self.start_date.clone(),
            remarks: self.remarks.clone(),
        }
    }
}

/// Accept `minPrice` as a number or a numeric string. Anything that
/// doesn't coerce cleanly counts as "condition absent" rather than a
/// request error, so unset fields stay neutral.
fn lenient_min_price<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
