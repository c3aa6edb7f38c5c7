use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ExtractedPrice, PriceType};

// 時給パターン
static HOURLY_TILDE_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"単価\s*[:：]\s*[〜～~]\s*([0-9,，]+)\s*円").unwrap());
static HOURLY_RANGE_SYSTEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"時給制\s*[:：]\s*([0-9,，]+)\s*[〜～~\-−]\s*[0-9,，]+\s*円").unwrap());
static HOURLY_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"時給\s*[:：]\s*([0-9,，]+)\s*円").unwrap());
static HOURLY_POSTFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9,，]+)\s*円\s*[〜～~\-−/／]\s*(?:[0-9,，]+\s*円\s*[〜～~\-−/／]\s*)?(?:時給|時間|h)")
        .unwrap()
});
static HOURLY_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9,，]+)\s*円\s*[/／]\s*時").unwrap());
static HOURLY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"時給\s*([0-9,，]+)\s*円").unwrap());
static HOURLY_LABEL_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"単価\s*[:：]\s*([0-9,，]+)\s*円\s*[〜～~\-−]\s*[0-9,，]+\s*円\s*[/／]\s*時").unwrap()
});
static HOURLY_LABEL_SMALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"単価\s*[:：]\s*([0-9,，]+)\s*円\s*[〜～~\-−]\s*[0-9,，]+\s*円").unwrap()
});
static DAILY_RATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"日\s*[/／]\s*([0-9,，]+)\s*円").unwrap());
static REWARD_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:報酬|給与)\s*\n(?:.*\n)*?.*?([0-9,，]+)\s*円\s*[〜～~\-−]\s*[0-9,，]+\s*円")
        .unwrap()
});
static REWARD_NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:報酬|給与)[^\n]*\n[^\n]*?([0-9,，]+)\s*円\s*[〜～~\-−]\s*[0-9,，]+\s*円")
        .unwrap()
});

// 月額パターン
static MONTHLY_TAX_EXCLUDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"税抜\s*([0-9.]+)\s*万円").unwrap());
static MONTHLY_MAN_LABEL_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"単価\s*[:：]\s*([0-9.]+)\s*[〜～~\-−]\s*[0-9.]+\s*万円").unwrap());
static MONTHLY_MAN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9.]+)\s*[〜～~\-−]\s*[0-9.]+\s*万円").unwrap());
static MONTHLY_YEN_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"単価\s*[:：]\s*([0-9,，]+)\s*円\s*[〜～~\-−]\s*[0-9,，]+\s*円").unwrap()
});
static MONTHLY_YEN_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"単価\s*[:：]\s*([0-9,，]+)\s*円").unwrap());
static MONTHLY_MAN_EN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"月額\s*([0-9.]+)\s*万円").unwrap());
static MONTHLY_MAN_PER_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9.]+)\s*万円\s*[/／]\s*月").unwrap());
static MONTHLY_YEN_PER_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9,，]+)\s*円\s*[/／]\s*月").unwrap());
static MONTHLY_LABEL_YEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"月額\s*([0-9,，]+)\s*円").unwrap());

/// 数値文字列から桁区切り（半角/全角カンマ）を除去してパース。
/// パース不能なら None を返し、呼び出し側は次のルールへ流す。
fn parse_yen(raw: &str) -> Option<u32> {
    raw.replace([',', '，'], "").parse().ok()
}

/// 万円単位の値を円に換算（"32.5" → 325,000）
fn parse_man_en(raw: &str) -> Option<u32> {
    let val: f64 = raw.parse().ok()?;
    if !val.is_finite() || val < 0.0 {
        return None;
    }
    Some((val * 10_000.0).round() as u32)
}

const HOURLY_CEILING: u32 = 10_000;
const WORKDAYS_PER_MONTH: u32 = 20;

/// 案件本文から単価と単位（時給/月額）を抽出する。
///
/// ルールは上から順に評価し、最初に成立したものが勝つ。実テキストは
/// 複数パターンに同時に掛かることが多く、確度の高いパターンを先に
/// 置いた並び順そのものが仕様になっている。並び替え禁止。
pub fn extract_price(text: &str) -> ExtractedPrice {
    // 1. 「単価：～2,400円税込」チルダ付き上限のみ → 時給扱い
    if let Some(caps) = HOURLY_TILDE_UPPER.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 2. 「時給制：2,000~2,400円」レンジの下限を採用
    if let Some(caps) = HOURLY_RANGE_SYSTEM.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            return hourly(val);
        }
    }

    // 3. 「時給：1,600円〜2,000円」
    if let Some(caps) = HOURLY_COLON.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            return hourly(val);
        }
    }

    // 4. 「2,300円~2,500円/時給」後置時給
    if let Some(caps) = HOURLY_POSTFIX.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 5. 「1,600円 / 時」
    if let Some(caps) = HOURLY_SLASH.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 6. 「時給2,200円」
    if let Some(caps) = HOURLY_PREFIX.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            return hourly(val);
        }
    }

    // 7. 「■単価：2,300円~2,500円/時給」単価ラベル付き時給レンジ
    if let Some(caps) = HOURLY_LABEL_RANGE.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 8. 「■単価：2,300円~2,500円」ラベル付きレンジで下限が小さければ時給とみなす
    if let Some(caps) = HOURLY_LABEL_SMALL.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 9. 「日/12,000円＋税」日給 → 稼働20日換算で月額に
    if let Some(caps) = DAILY_RATE.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            return monthly(val.saturating_mul(WORKDAYS_PER_MONTH));
        }
    }

    // 10. 「報酬」「給与」セクション直後のレンジ（番号付き小項目を挟む場合あり）
    if let Some(caps) = REWARD_SECTION.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }
    if let Some(caps) = REWARD_NUMBERED.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val < HOURLY_CEILING {
                return hourly(val);
            }
        }
    }

    // 11. 「税抜32万円（フルタイム）」
    if let Some(caps) = MONTHLY_TAX_EXCLUDED.captures(text) {
        if let Some(val) = parse_man_en(&caps[1]) {
            return monthly(val);
        }
    }

    // 12. 「単価：32〜35万円目安」万円レンジ（ラベル付き）
    if let Some(caps) = MONTHLY_MAN_LABEL_RANGE.captures(text) {
        if let Some(val) = parse_man_en(&caps[1]) {
            return monthly(val);
        }
    }

    // 13. 「32〜35万円」万円レンジ（ラベルなし）
    if let Some(caps) = MONTHLY_MAN_RANGE.captures(text) {
        if let Some(val) = parse_man_en(&caps[1]) {
            return monthly(val);
        }
    }

    // 14. 「単価：330,000円〜350,000円」円単位レンジ、下限1万円以上なら月額
    if let Some(caps) = MONTHLY_YEN_RANGE.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val >= HOURLY_CEILING {
                return monthly(val);
            }
        }
    }

    // 15. 「単価：330,000円（目安）」単一値
    if let Some(caps) = MONTHLY_YEN_SINGLE.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val >= HOURLY_CEILING {
                return monthly(val);
            }
        }
    }

    // 16. 「月額32万円」
    if let Some(caps) = MONTHLY_MAN_EN.captures(text) {
        if let Some(val) = parse_man_en(&caps[1]) {
            return monthly(val);
        }
    }

    // 17. 「32万円/月」
    if let Some(caps) = MONTHLY_MAN_PER_MONTH.captures(text) {
        if let Some(val) = parse_man_en(&caps[1]) {
            return monthly(val);
        }
    }

    // 18. 「330,000円/月」
    if let Some(caps) = MONTHLY_YEN_PER_MONTH.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val >= HOURLY_CEILING {
                return monthly(val);
            }
        }
    }

    // 19. 「月額400,000円」万円表記なしの月額。最後に置くことで
    //     上のどのパターンにも掛からなかった場合のみ効く。
    if let Some(caps) = MONTHLY_LABEL_YEN.captures(text) {
        if let Some(val) = parse_yen(&caps[1]) {
            if val >= HOURLY_CEILING {
                return monthly(val);
            }
        }
    }

    ExtractedPrice::default()
}

fn hourly(price: u32) -> ExtractedPrice {
    ExtractedPrice {
        price: Some(price),
        price_type: Some(PriceType::Hourly),
    }
}

fn monthly(price: u32) -> ExtractedPrice {
    ExtractedPrice {
        price: Some(price),
        price_type: Some(PriceType::Monthly),
    }
}
