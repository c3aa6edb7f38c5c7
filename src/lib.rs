//! Anken Match - matching service for sales-agent job listings
//!
//! This library implements the listing-matching engine behind the anken
//! search API: price extraction from Japanese listing text, location
//! classification, remarks keyword evaluation and scored ranking.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{extract_price, match_location, Matcher};
pub use crate::models::{
    Anken, AnkenResult, ExcludedAnken, MatchResult, PriceType, SearchCondition, SearchRequest,
    SkillProfile,
};
