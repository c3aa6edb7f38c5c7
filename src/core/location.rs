use once_cell::sync::Lazy;
use regex::Regex;

/// Outcome of classifying a listing's location against the requested one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMatch {
    Remote,
    Exact,
    InRange,
    Warning,
    Unknown,
    Excluded,
}

#[derive(Debug, Clone)]
pub struct LocationResult {
    pub kind: LocationMatch,
    pub message: Option<String>,
}

impl LocationResult {
    fn new(kind: LocationMatch) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    fn with_message(kind: LocationMatch, message: &str) -> Self {
        Self {
            kind,
            message: Some(message.to_string()),
        }
    }
}

// フルリモート宣言（和英）
static REMOTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"フルリモ|フルリモート|完全リモート|在宅.*可|リモート.*可|テレワーク").unwrap(),
        Regex::new(r"(?i)remote.*ok|fully\s*remote").unwrap(),
    ]
});

static REMOTE_CONDITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)リモート|remote").unwrap());

// 勤務地ラベル（優先順）
static LOCATION_LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"勤務地\s*[:：]\s*(.+?)(?:\n|$)").unwrap(),
        Regex::new(r"就業場所\s*[:：]\s*(.+?)(?:\n|$)").unwrap(),
        Regex::new(r"作業場所\s*[:：]\s*(.+?)(?:\n|$)").unwrap(),
        Regex::new(r"稼働\s*[:：]\s*(.+?)(?:\n|$)").unwrap(),
    ]
});

const PREFECTURES: &[&str] = &[
    "東京", "神奈川", "大阪", "愛知", "福岡", "北海道", "京都", "兵庫", "埼玉", "千葉",
];

const KANTO_PREFS: &[&str] = &["東京", "神奈川", "埼玉", "千葉", "茨城", "栃木", "群馬"];
const KANSAI_PREFS: &[&str] = &["大阪", "京都", "兵庫", "奈良", "滋賀", "和歌山"];

const MAX_LABEL_LEN: usize = 50;

/// 案件本文がフルリモート宣言を含むか
pub fn is_remote(text: &str) -> bool {
    REMOTE_PATTERNS.iter().any(|p| p.is_match(text))
}

/// 表示用の勤務地ラベルを本文から抜き出す。分類とは独立で、
/// 最初に非空かつ50文字未満で取れたラベルを返す。
pub fn extract_location_label(text: &str) -> Option<String> {
    for pattern in LOCATION_LABEL_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let label = caps[1].trim();
            if !label.is_empty() && label.chars().count() < MAX_LABEL_LEN {
                return Some(label.to_string());
            }
        }
    }
    None
}

/// 希望勤務地と案件本文を突き合わせて分類する。
///
/// 条件なしは常に中立（in_range）。フルリモート案件はどんな希望地でも
/// remote になる。
pub fn match_location(condition: Option<&str>, text: &str) -> LocationResult {
    let condition = match condition {
        Some(c) if !c.trim().is_empty() => c,
        _ => return LocationResult::new(LocationMatch::InRange),
    };

    // リモート希望
    if REMOTE_CONDITION.is_match(condition) {
        if is_remote(text) {
            return LocationResult::new(LocationMatch::Remote);
        }
        return LocationResult::with_message(
            LocationMatch::Warning,
            "リモート希望ですが、出社が必要な可能性があります",
        );
    }

    // フルリモート案件は常にOK
    if is_remote(text) {
        return LocationResult::new(LocationMatch::Remote);
    }

    // 都道府県・地名マッチ
    for pref in PREFECTURES {
        if condition.contains(pref) && text.contains(pref) {
            return LocationResult::new(LocationMatch::Exact);
        }
    }

    // 関東・関西エリア
    if condition.contains("関東") && KANTO_PREFS.iter().any(|p| text.contains(p)) {
        return LocationResult::new(LocationMatch::InRange);
    }
    if condition.contains("関西") && KANSAI_PREFS.iter().any(|p| text.contains(p)) {
        return LocationResult::new(LocationMatch::InRange);
    }

    LocationResult::new(LocationMatch::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_condition_is_neutral() {
        let result = match_location(None, "勤務地：東京都港区");
        assert_eq!(result.kind, LocationMatch::InRange);
        assert!(result.message.is_none());
    }

    #[test]
    fn remote_condition_against_remote_listing() {
        let result = match_location(Some("フルリモート希望"), "完全リモート案件です");
        assert_eq!(result.kind, LocationMatch::Remote);
    }

    #[test]
    fn remote_condition_against_onsite_listing_warns() {
        let result = match_location(Some("リモート"), "勤務地：東京都港区 出社必須");
        assert_eq!(result.kind, LocationMatch::Warning);
        assert!(result.message.as_deref().unwrap().contains("出社"));
    }

    #[test]
    fn remote_listing_satisfies_any_location() {
        for cond in ["東京", "大阪", "福岡県内"] {
            let result = match_location(Some(cond), "フルリモ可・週次MTGのみ");
            assert_eq!(result.kind, LocationMatch::Remote, "condition: {cond}");
        }
    }

    #[test]
    fn shared_prefecture_is_exact() {
        let result = match_location(Some("東京都内"), "勤務地：東京駅徒歩5分");
        assert_eq!(result.kind, LocationMatch::Exact);
    }

    #[test]
    fn macro_region_membership_is_in_range() {
        let result = match_location(Some("関東圏"), "勤務地：埼玉県さいたま市");
        assert_eq!(result.kind, LocationMatch::InRange);

        let result = match_location(Some("関西"), "勤務地：兵庫県神戸市");
        assert_eq!(result.kind, LocationMatch::InRange);
    }

    #[test]
    fn unrelated_location_is_unknown() {
        let result = match_location(Some("沖縄"), "勤務地：宮城県仙台市");
        assert_eq!(result.kind, LocationMatch::Unknown);
    }

    #[test]
    fn english_remote_declarations_match() {
        assert!(is_remote("Fully Remote position"));
        assert!(is_remote("remote OK"));
        assert!(!is_remote("on-site only"));
    }

    #[test]
    fn label_extraction_prefers_earlier_patterns() {
        let text = "稼働：週3日\n勤務地：東京都渋谷区\n";
        assert_eq!(extract_location_label(text), Some("東京都渋谷区".to_string()));
    }

    #[test]
    fn label_extraction_rejects_empty_and_oversized() {
        assert_eq!(extract_location_label("勤務地："), None);

        let oversized = format!("勤務地：{}", "あ".repeat(60));
        assert_eq!(extract_location_label(&oversized), None);
    }
}
