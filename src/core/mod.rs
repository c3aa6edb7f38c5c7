// Core algorithm exports
pub mod keywords;
pub mod location;
pub mod matcher;
pub mod price;
pub mod remarks;
pub mod scoring;

pub use keywords::{detect_keywords, DetectedKeyword};
pub use location::{extract_location_label, is_remote, match_location, LocationMatch};
pub use matcher::Matcher;
pub use price::extract_price;
pub use remarks::evaluate_remarks;
pub use scoring::{score_anken, ScoreOutcome};
