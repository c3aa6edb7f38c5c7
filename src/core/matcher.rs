use tracing::debug;

use crate::core::scoring::{score_anken, ScoreOutcome};
use crate::models::{Anken, MatchResult, SearchCondition, SkillProfile};

/// Matching orchestrator - runs the scoring engine over every listing
/// and assembles the ranked result.
///
/// # Pipeline
/// 1. Score each listing against the search condition (and skill profile)
/// 2. Partition into matched vs. excluded
/// 3. Sort matched by descending score, keeping sheet order on ties
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Run a full matching pass.
    ///
    /// Every listing lands in exactly one partition; an exclusion is
    /// terminal for the run. `total_count` counts matched listings only.
    pub fn run(
        &self,
        ankens: &[Anken],
        condition: &SearchCondition,
        skill_profile: Option<&SkillProfile>,
    ) -> MatchResult {
        let mut matched = Vec::new();
        let mut excluded = Vec::new();

        for anken in ankens {
            match score_anken(anken, condition, skill_profile) {
                ScoreOutcome::Matched(result) => matched.push(*result),
                ScoreOutcome::Excluded(reason) => excluded.push(reason),
            }
        }

        // sort_by is stable: equal scores keep their sheet order
        matched.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            total = ankens.len(),
            matched = matched.len(),
            excluded = excluded.len(),
            "matching pass complete"
        );

        let total_count = matched.len();
        MatchResult {
            matched,
            excluded,
            total_count,
            skill_summary: skill_profile.map(|p| p.summary.clone()),
        }
    }
}
