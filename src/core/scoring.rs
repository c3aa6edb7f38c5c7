use regex::Regex;

use crate::core::keywords::{detect_keywords, DetectedKeyword, CATEGORY_ORDER};
use crate::core::location::{extract_location_label, match_location, LocationMatch};
use crate::core::price::extract_price;
use crate::core::remarks::evaluate_remarks;
use crate::models::{
    Anken, AnkenResult, BadgeStatus, ConditionBadge, ExcludeReason, ExcludedAnken, PriceType,
    SearchCondition, SkillProfile, WarningType,
};

/// Terminal outcome for one listing: it lands in exactly one partition
#[derive(Debug, Clone)]
pub enum ScoreOutcome {
    Matched(Box<AnkenResult>),
    Excluded(ExcludedAnken),
}

const BASE_SCORE: i64 = 50;
const PRICE_BONUS_CAP: i64 = 20;
const REMOTE_BONUS: i64 = 5;
const EXACT_LOCATION_BONUS: i64 = 10;
const WARNING_PENALTY: i64 = 10;
const EXCLUDED_PENALTY: i64 = 30;
const SKILL_BONUS: i64 = 5;
const KEYWORD_BONUS_CAP: i64 = 10;
const LOW_SCORE_THRESHOLD: i64 = 40;

/// 3桁区切りで金額を整形（1600 → "1,600"）
fn format_yen(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// スキル文字列が本文に現れるか（大文字小文字無視のリテラル検索）
fn skill_in_text(skill: &str, text: &str) -> bool {
    Regex::new(&format!("(?i){}", regex::escape(skill)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn exclude(anken: &Anken, reason: ExcludeReason, message: String) -> ScoreOutcome {
    ScoreOutcome::Excluded(ExcludedAnken {
        id: anken.id.clone(),
        name: anken.name.clone(),
        full_text: anken.full_text.clone(),
        exclude_reason: reason,
        exclude_reason_message: message,
    })
}

/// 案件1件を条件・スキルプロフィールに照らして採点する。
///
/// 基礎点50から、単価 → 勤務地 → 備考 → スキル → キーワードの順に
/// 加減点する。各段階は除外で短絡し、除外後の再採点はない。
pub fn score_anken(
    anken: &Anken,
    condition: &SearchCondition,
    skill_profile: Option<&SkillProfile>,
) -> ScoreOutcome {
    let text = &anken.full_text;
    let mut score = BASE_SCORE;
    let mut warnings = Vec::new();
    let mut warning_messages = Vec::new();

    // 単価チェック
    let extracted = extract_price(text);
    let price_condition = match (condition.price_type, condition.min_price) {
        // minPrice=0 は条件未設定と同じ扱い（未設定の条件は常に中立）
        (Some(price_type), Some(min_price)) if min_price > 0 => Some((price_type, min_price)),
        _ => None,
    };

    let mut price_met = false;
    if let Some((wanted_type, min_price)) = price_condition {
        match (extracted.price_type, extracted.price) {
            (None, _) => {
                warnings.push(WarningType::PriceUnknown);
                warning_messages.push("単価が案件本文から確認できませんでした".to_string());
            }
            (Some(found_type), _) if found_type != wanted_type => {
                return exclude(
                    anken,
                    ExcludeReason::PriceMismatch,
                    format!(
                        "単価種別が一致しません（案件: {}, 条件: {}）",
                        found_type.label(),
                        wanted_type.label()
                    ),
                );
            }
            (Some(_), Some(price)) if price < min_price => {
                return exclude(
                    anken,
                    ExcludeReason::PriceMismatch,
                    format!(
                        "単価が最低条件を下回ります（案件: {}円, 条件: {}円以上）",
                        format_yen(price),
                        format_yen(min_price)
                    ),
                );
            }
            (Some(_), Some(price)) => {
                let excess = (price - min_price) as i64 * 100 / min_price as i64;
                score += excess.min(PRICE_BONUS_CAP);
                price_met = true;
            }
            (Some(_), None) => {}
        }
    }

    // 勤務地チェック
    let location = match_location(condition.location.as_deref(), text);
    let extracted_location = extract_location_label(text);

    match location.kind {
        LocationMatch::Excluded => {
            score -= EXCLUDED_PENALTY;
            warnings.push(WarningType::LocationOutOfRange);
            if let Some(message) = &location.message {
                warning_messages.push(message.clone());
            }
        }
        LocationMatch::Warning => {
            score -= WARNING_PENALTY;
            warnings.push(WarningType::LocationOutOfRange);
            if let Some(message) = &location.message {
                warning_messages.push(message.clone());
            }
        }
        LocationMatch::Unknown => {
            warnings.push(WarningType::LocationUnknown);
        }
        LocationMatch::Remote => score += REMOTE_BONUS,
        LocationMatch::Exact => score += EXACT_LOCATION_BONUS,
        LocationMatch::InRange => {}
    }

    // 備考チェック（NGは除外、加点はスコアへ）
    let remarks = evaluate_remarks(condition.remarks.as_deref(), text);
    if !remarks.ng_matched.is_empty() {
        return exclude(
            anken,
            ExcludeReason::RemarksNg,
            format!(
                "備考のNGキーワードに合致しました: {}",
                remarks.ng_matched.join(", ")
            ),
        );
    }
    score += remarks.score;

    // スキルマッチング
    let mut matched_skills: Vec<&str> = Vec::new();
    let mut unmatched_skills: Vec<&str> = Vec::new();
    if let Some(profile) = skill_profile {
        for skill in &profile.skills {
            if skill_in_text(skill, text) {
                matched_skills.push(skill);
                score += SKILL_BONUS;
            } else {
                unmatched_skills.push(skill);
            }
        }
    }

    // キーワード自動検出（スキルプロフィールがない場合のみ加点）
    let detected_keywords = detect_keywords(text);
    if skill_profile.is_none() && !detected_keywords.is_empty() {
        score += (detected_keywords.len() as i64 * 2).min(KEYWORD_BONUS_CAP);
    }

    let score = score.clamp(0, 100);

    let (match_reason, match_reason_detail) = build_explanation(
        score,
        &extracted,
        price_met,
        price_condition,
        &location.kind,
        location.message.as_deref(),
        extracted_location.as_deref(),
        &matched_skills,
        &unmatched_skills,
        skill_profile.is_some(),
        &detected_keywords,
        &remarks.positive_matched,
        &remarks.free_text_matched,
        &remarks.free_text_unmatched,
    );

    let condition_badges = build_badges(
        &extracted,
        price_met,
        price_condition.is_some(),
        &location.kind,
        extracted_location.as_deref(),
        &remarks.positive_matched,
        &remarks.free_text_matched,
        &remarks.free_text_unmatched,
    );

    ScoreOutcome::Matched(Box::new(AnkenResult {
        id: anken.id.clone(),
        name: anken.name.clone(),
        full_text: anken.full_text.clone(),
        score: score as u32,
        warnings,
        warning_messages,
        extracted_location,
        extracted_price_type: extracted.price_type,
        extracted_price: extracted.price,
        match_reason: Some(match_reason),
        match_reason_detail,
        condition_badges,
    }))
}

/// マッチ理由（短文）と明細（行単位）を既に確定した事実だけから組み立てる。
/// ここでマッチングロジックを再実行してはならない。
#[allow(clippy::too_many_arguments)]
fn build_explanation(
    score: i64,
    extracted: &crate::models::ExtractedPrice,
    price_met: bool,
    price_condition: Option<(PriceType, u32)>,
    location: &LocationMatch,
    location_message: Option<&str>,
    extracted_location: Option<&str>,
    matched_skills: &[&str],
    unmatched_skills: &[&str],
    has_skill_profile: bool,
    detected_keywords: &[DetectedKeyword],
    positive_matched: &[String],
    free_text_matched: &[String],
    free_text_unmatched: &[String],
) -> (String, Option<String>) {
    let mut reason_parts: Vec<String> = Vec::new();
    let mut detail_parts: Vec<String> = Vec::new();

    // 単価
    if let (Some(price), Some(price_type)) = (extracted.price, extracted.price_type) {
        let unit = price_type.unit();
        if price_met {
            let (_, min_price) = price_condition.unwrap_or((price_type, 0));
            reason_parts.push(format!("単価{}{}", format_yen(price), unit));
            detail_parts.push(format!(
                "✅ 単価: {}{}（条件: {}{}以上）",
                format_yen(price),
                unit,
                format_yen(min_price),
                unit
            ));
        } else {
            detail_parts.push(format!("ℹ️ 単価: {}{}", format_yen(price), unit));
        }
    }

    // 勤務地
    match location {
        LocationMatch::Remote => {
            reason_parts.push("フルリモート".to_string());
            detail_parts.push("✅ 勤務地: フルリモート対応".to_string());
        }
        LocationMatch::Exact => {
            if let Some(label) = extracted_location {
                reason_parts.push(label.chars().take(10).collect());
                detail_parts.push(format!("✅ 勤務地: {label}（希望地と一致）"));
            }
        }
        LocationMatch::Warning => {
            if let Some(message) = location_message {
                detail_parts.push(format!("⚠️ 勤務地: {message}"));
            }
        }
        _ => {}
    }

    // スキル
    if has_skill_profile {
        if !matched_skills.is_empty() {
            reason_parts.push(format!("スキル{}項一致", matched_skills.len()));
            detail_parts.push(format!(
                "✅ スキルマッチ: {}",
                matched_skills
                    .iter()
                    .take(5)
                    .copied()
                    .collect::<Vec<_>>()
                    .join("、")
            ));
        }
        if !unmatched_skills.is_empty() {
            detail_parts.push(format!(
                "ℹ️ 未一致スキル: {}",
                unmatched_skills
                    .iter()
                    .take(3)
                    .copied()
                    .collect::<Vec<_>>()
                    .join("、")
            ));
        }
    }

    // 検出キーワード（カテゴリ別）
    if !detected_keywords.is_empty() {
        if !has_skill_profile {
            let mut card_keywords: Vec<&str> = Vec::new();
            for category in CATEGORY_ORDER {
                if let Some(kw) = detected_keywords.iter().find(|k| k.category == *category) {
                    card_keywords.push(kw.label);
                    if card_keywords.len() >= 2 {
                        break;
                    }
                }
            }
            if !card_keywords.is_empty() {
                reason_parts.push(card_keywords.join("・"));
            }
        }
        for category in CATEGORY_ORDER {
            let labels: Vec<&str> = detected_keywords
                .iter()
                .filter(|k| k.category == *category)
                .map(|k| k.label)
                .collect();
            if !labels.is_empty() {
                detail_parts.push(format!("ℹ️ {}: {}", category, labels.join("、")));
            }
        }
    }

    // 備考
    if !positive_matched.is_empty() {
        reason_parts.push(positive_matched[0].clone());
        detail_parts.push(format!("✅ 希望条件: {}", positive_matched.join("、")));
    }
    if !free_text_matched.is_empty() {
        detail_parts.push(format!("✅ 備考一致: {}", free_text_matched.join("、")));
    }
    if !free_text_unmatched.is_empty() {
        detail_parts.push(format!("ℹ️ 要確認: {}", free_text_unmatched.join("、")));
    }

    if score < LOW_SCORE_THRESHOLD {
        detail_parts
            .push("⚠️ スコアが低いため、条件に完全にはマッチしていない可能性があります".to_string());
    }

    let match_reason = if reason_parts.is_empty() {
        if score >= 70 {
            "条件に適合しています".to_string()
        } else if score >= LOW_SCORE_THRESHOLD {
            "部分的にマッチしています".to_string()
        } else {
            "参考情報として表示".to_string()
        }
    } else {
        reason_parts.join("・")
    };

    let detail = if detail_parts.is_empty() {
        None
    } else {
        Some(detail_parts.join("\n"))
    };

    (match_reason, detail)
}

/// 明細と同じ事実をバッジ（チップ表示）に写す
#[allow(clippy::too_many_arguments)]
fn build_badges(
    extracted: &crate::models::ExtractedPrice,
    price_met: bool,
    price_requested: bool,
    location: &LocationMatch,
    extracted_location: Option<&str>,
    positive_matched: &[String],
    free_text_matched: &[String],
    free_text_unmatched: &[String],
) -> Vec<ConditionBadge> {
    let mut badges = Vec::new();

    // 単価バッジ
    match (extracted.price, extracted.price_type) {
        (Some(price), Some(price_type)) => {
            badges.push(ConditionBadge {
                label: format!("単価{}{}", format_yen(price), price_type.unit()),
                status: if price_met {
                    BadgeStatus::Match
                } else {
                    BadgeStatus::Info
                },
            });
        }
        _ if price_requested => {
            badges.push(ConditionBadge {
                label: "単価不明".to_string(),
                status: BadgeStatus::Warn,
            });
        }
        _ => {}
    }

    // 勤務地バッジ
    match location {
        LocationMatch::Remote => badges.push(ConditionBadge {
            label: "フルリモート".to_string(),
            status: BadgeStatus::Match,
        }),
        LocationMatch::Exact => badges.push(ConditionBadge {
            label: extracted_location.unwrap_or("希望地一致").to_string(),
            status: BadgeStatus::Match,
        }),
        LocationMatch::Warning => badges.push(ConditionBadge {
            label: "出社の可能性あり".to_string(),
            status: BadgeStatus::Warn,
        }),
        LocationMatch::Unknown => badges.push(ConditionBadge {
            label: "勤務地不明".to_string(),
            status: BadgeStatus::Info,
        }),
        _ => {}
    }

    // 備考バッジ（一致は3件、未確認は2件まで）
    for label in positive_matched
        .iter()
        .chain(free_text_matched.iter())
        .take(3)
    {
        badges.push(ConditionBadge {
            label: label.clone(),
            status: BadgeStatus::Match,
        });
    }
    for label in free_text_unmatched.iter().take(2) {
        badges.push(ConditionBadge {
            label: label.clone(),
            status: BadgeStatus::Warn,
        });
    }

    badges
}
