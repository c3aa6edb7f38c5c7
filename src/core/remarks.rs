use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::RemarksMatchResult;

/// 備考キーワードと案件本文パターンの対。トークンがキーワードに掛かり、
/// かつ本文がパターンに掛かったときだけ成立する（二段マッチ）。
struct DualKeyword {
    keyword: &'static str,
    token_re: Regex,
    body_re: Regex,
}

impl DualKeyword {
    fn new(keyword: &'static str, body: &str) -> Self {
        Self {
            keyword,
            token_re: Regex::new(&format!("(?i){}", regex::escape(keyword))).unwrap(),
            body_re: Regex::new(body).unwrap(),
        }
    }
}

/// 自由記述の言い換え → 本文パターン。展開パターンの直後に否定語
/// （なし/不可 等）が続く場合は不成立として次の出現箇所を探す。
struct Synonym {
    keyword: &'static str,
    token_re: Regex,
    body_re: Regex,
    negations: &'static [&'static str],
}

impl Synonym {
    fn new(keyword: &'static str, token: &str, body: &str, negations: &'static [&'static str]) -> Self {
        Self {
            keyword,
            token_re: Regex::new(&format!("(?i){token}")).unwrap(),
            body_re: Regex::new(body).unwrap(),
            negations,
        }
    }
}

// 絶対NG条件。成立した案件は上流で除外される。
static NG_KEYWORDS: Lazy<Vec<DualKeyword>> = Lazy::new(|| {
    vec![
        DualKeyword::new("PC持参不可", r"PC.*持参|自前.*PC|自己.*PC"),
        DualKeyword::new("土日出社", r"土日.*出社|週末.*出社"),
        DualKeyword::new("長期不可", r"長期|1年以上"),
    ]
});

// 加点条件（1件 +10）
static POSITIVE_KEYWORDS: Lazy<Vec<DualKeyword>> = Lazy::new(|| {
    vec![
        DualKeyword::new("フルリモート", r"フルリモ|フルリモート|完全リモート"),
        DualKeyword::new("週3以下", r"週[1-3]日|週[1-3]回"),
        DualKeyword::new("土日休み", r"土日祝|完全週休2日"),
        DualKeyword::new("SaaS", r"(?i)SaaS"),
        DualKeyword::new("高単価", r"高単価|単価高"),
    ]
});

// よくある言い換え（1件 +5）
static SYNONYMS: Lazy<Vec<Synonym>> = Lazy::new(|| {
    vec![
        Synonym::new(
            "フルリモ",
            r"フルリモ|リモート希望",
            r"フルリモ|フルリモート|完全リモート|在宅勤務",
            &["不可"],
        ),
        Synonym::new(
            "PC貸与",
            r"PC貸与|PC支給|パソコン貸与",
            r"PC\s*貸与|PC\s*支給|パソコン\s*貸与",
            &["なし", "無し", "不可"],
        ),
        Synonym::new(
            "残業なし",
            r"残業なし|残業無し|定時",
            r"残業(?:なし|無し|ほぼなし|少なめ)|定時退社",
            &[],
        ),
        Synonym::new(
            "週休2日",
            r"週休2日|週休二日",
            r"完全週休2日|週休2日制",
            &[],
        ),
        Synonym::new(
            "交通費支給",
            r"交通費",
            r"交通費\s*(?:支給|全額)",
            &["なし", "無し"],
        ),
        Synonym::new("副業可", r"副業", r"副業\s*(?:可|OK|ＯＫ)", &["不可"]),
        Synonym::new(
            "インセンティブ",
            r"インセンティブ|歩合",
            r"インセンティブ|歩合|成果報酬",
            &["なし", "無し"],
        ),
        Synonym::new(
            "服装自由",
            r"服装自由|私服",
            r"服装\s*自由|私服\s*(?:可|OK)",
            &[],
        ),
    ]
});

static TOKEN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s、。・/／,，]+").unwrap());

const POSITIVE_SCORE: i64 = 10;
const SYNONYM_SCORE: i64 = 5;
const LITERAL_SCORE: i64 = 3;
const MIN_TOKEN_CHARS: usize = 2;

/// 備考自由記述をトークン化する。空白・読点・スラッシュ区切り、
/// 2文字未満は捨てる。
pub fn tokenize_remarks(remarks: &str) -> Vec<String> {
    TOKEN_SPLIT
        .split(remarks)
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(|t| t.to_string())
        .collect()
}

/// 展開パターンの出現箇所を順に調べ、直後が否定語で始まらない
/// 出現が1つでもあれば成立とする。
fn matches_without_negation(body_re: &Regex, text: &str, negations: &[&str]) -> bool {
    body_re.find_iter(text).any(|m| {
        let after = text[m.end()..].trim_start();
        !negations.iter().any(|neg| after.starts_with(neg))
    })
}

fn push_unique(items: &mut Vec<String>, value: &str) -> bool {
    if items.iter().any(|v| v == value) {
        return false;
    }
    items.push(value.to_string());
    true
}

/// 候補者の備考と案件本文を突き合わせる。
///
/// トークンごとに NG表 → 加点表 → 既出スキップ → 言い換え表 →
/// リテラル検索の順に評価する。NG成立は除外シグナルであり、同じ案件の
/// 加点側に同トークンが現れることはない。
pub fn evaluate_remarks(remarks: Option<&str>, anken_text: &str) -> RemarksMatchResult {
    let remarks = match remarks {
        Some(r) if !r.trim().is_empty() => r,
        _ => return RemarksMatchResult::default(),
    };

    let mut result = RemarksMatchResult::default();

    'tokens: for token in tokenize_remarks(remarks) {
        // 1. 絶対NG
        for entry in NG_KEYWORDS.iter() {
            if entry.token_re.is_match(&token) && entry.body_re.is_match(anken_text) {
                push_unique(&mut result.ng_matched, entry.keyword);
                continue 'tokens;
            }
        }

        // 2. 加点キーワード
        for entry in POSITIVE_KEYWORDS.iter() {
            if entry.token_re.is_match(&token) && entry.body_re.is_match(anken_text) {
                if push_unique(&mut result.positive_matched, entry.keyword) {
                    result.score += POSITIVE_SCORE;
                }
                continue 'tokens;
            }
        }

        // 3. 既にNG/加点で拾ったキーワードと包含関係にあるトークンは流さない
        let captured = result
            .ng_matched
            .iter()
            .chain(result.positive_matched.iter());
        for keyword in captured {
            if token.contains(keyword.as_str()) || keyword.contains(&token) {
                continue 'tokens;
            }
        }

        // 4. 言い換えテーブル
        for synonym in SYNONYMS.iter() {
            if !synonym.token_re.is_match(&token) {
                continue;
            }
            if matches_without_negation(&synonym.body_re, anken_text, synonym.negations) {
                if push_unique(&mut result.free_text_matched, &token) {
                    result.score += SYNONYM_SCORE;
                }
            } else {
                push_unique(&mut result.free_text_unmatched, &token);
            }
            continue 'tokens;
        }

        // 5. リテラル検索へフォールバック
        let escaped = format!("(?i){}", regex::escape(&token));
        let matched = Regex::new(&escaped)
            .map(|re| re.is_match(anken_text))
            .unwrap_or(false);
        if matched {
            if push_unique(&mut result.free_text_matched, &token) {
                result.score += LITERAL_SCORE;
            }
        } else {
            push_unique(&mut result.free_text_unmatched, &token);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_on_punctuation_and_drops_short_tokens() {
        let tokens = tokenize_remarks("フルリモ、土日休み・SaaS希望　高単価/あ");
        assert_eq!(
            tokens,
            vec!["フルリモ", "土日休み", "SaaS希望", "高単価"]
        );
    }

    #[test]
    fn ng_keyword_requires_both_sides() {
        // トークンだけ一致しても本文に根拠がなければNGにならない
        let result = evaluate_remarks(Some("PC持参不可"), "PC貸与あり、快適です");
        assert!(result.ng_matched.is_empty());

        let result = evaluate_remarks(Some("PC持参不可"), "自前のPCをご用意ください");
        assert_eq!(result.ng_matched, vec!["PC持参不可"]);
    }

    #[test]
    fn ng_token_never_appears_in_positive_sets() {
        let result = evaluate_remarks(Some("土日出社"), "土日の出社をお願いする週があります");
        assert_eq!(result.ng_matched, vec!["土日出社"]);
        assert!(result.positive_matched.is_empty());
        assert!(result.free_text_matched.is_empty());
    }

    #[test]
    fn positive_keyword_scores_fixed_increment() {
        let result = evaluate_remarks(Some("フルリモート 高単価"), "完全リモート・高単価案件");
        assert_eq!(result.positive_matched, vec!["フルリモート", "高単価"]);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn synonym_matches_with_smaller_increment() {
        let result = evaluate_remarks(Some("PC貸与"), "就業環境：PC貸与あり");
        assert_eq!(result.free_text_matched, vec!["PC貸与"]);
        assert_eq!(result.score, 5);
    }

    #[test]
    fn synonym_negation_suffix_blocks_match() {
        let result = evaluate_remarks(Some("PC貸与"), "PC貸与なし（持参をお願いします）");
        assert!(result.free_text_matched.is_empty());
        assert_eq!(result.free_text_unmatched, vec!["PC貸与"]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn negated_occurrence_falls_through_to_later_one() {
        let text = "本社勤務はPC貸与なし。リモート勤務はPC貸与あり。";
        let result = evaluate_remarks(Some("PC貸与"), text);
        assert_eq!(result.free_text_matched, vec!["PC貸与"]);
    }

    #[test]
    fn literal_fallback_matches_verbatim_text() {
        let result = evaluate_remarks(Some("新宿オフィス"), "勤務地は新宿オフィスです");
        assert_eq!(result.free_text_matched, vec!["新宿オフィス"]);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn unmatched_tokens_are_reported_for_verification() {
        let result = evaluate_remarks(Some("英語面接"), "国内営業のみの案件です");
        assert!(result.free_text_matched.is_empty());
        assert_eq!(result.free_text_unmatched, vec!["英語面接"]);
    }

    #[test]
    fn empty_remarks_is_neutral() {
        let result = evaluate_remarks(None, "時給：2,000円");
        assert_eq!(result, RemarksMatchResult::default());

        let result = evaluate_remarks(Some("   "), "時給：2,000円");
        assert_eq!(result, RemarksMatchResult::default());
    }

    #[test]
    fn duplicate_tokens_are_counted_once() {
        let result = evaluate_remarks(Some("高単価 高単価"), "高単価の案件");
        assert_eq!(result.positive_matched, vec!["高単価"]);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn overlap_with_captured_keyword_is_skipped() {
        // 「フルリモート」が加点で拾われた後の「リモート」は再評価しない
        let result = evaluate_remarks(Some("フルリモート リモート"), "完全リモートの案件");
        assert_eq!(result.positive_matched, vec!["フルリモート"]);
        assert!(result.free_text_matched.is_empty());
        assert!(result.free_text_unmatched.is_empty());
        assert_eq!(result.score, 10);
    }
}
