use once_cell::sync::Lazy;
use regex::Regex;

/// One dictionary entry: the label shown to users, its category, and the
/// text patterns that reveal it in a listing
pub struct KeywordEntry {
    pub label: &'static str,
    pub category: &'static str,
    patterns: Vec<Regex>,
}

/// A dictionary hit on a listing's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedKeyword {
    pub label: &'static str,
    pub category: &'static str,
}

pub const CATEGORY_SALES_FORMAT: &str = "営業形態";
pub const CATEGORY_INDUSTRY: &str = "商材・業種";
pub const CATEGORY_TOOLING: &str = "ツール";
pub const CATEGORY_SALES_STYLE: &str = "営業スタイル";

/// Category display order used by reason/detail generation
pub const CATEGORY_ORDER: &[&str] = &[
    CATEGORY_SALES_FORMAT,
    CATEGORY_INDUSTRY,
    CATEGORY_TOOLING,
    CATEGORY_SALES_STYLE,
];

fn entry(label: &'static str, category: &'static str, patterns: &[&str]) -> KeywordEntry {
    KeywordEntry {
        label,
        category,
        patterns: patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
    }
}

// 略語の境界はASCII扱い（(?-u:\b)）。Unicode境界だと「SaaS商材」の
// ように漢字が続く位置で \b が成立しない。
static KEYWORD_DICT: Lazy<Vec<KeywordEntry>> = Lazy::new(|| {
    vec![
        // 営業形態
        entry("IS（インサイドセールス）", CATEGORY_SALES_FORMAT, &[r"(?i)インサイドセールス|(?-u:\b)IS(?-u:\b)|Inside\s*Sales"]),
        entry("FS（フィールドセールス）", CATEGORY_SALES_FORMAT, &[r"(?i)フィールドセールス|(?-u:\b)FS(?-u:\b)|Field\s*Sales"]),
        entry("BDR", CATEGORY_SALES_FORMAT, &[r"(?i)(?-u:\b)BDR(?-u:\b)|アウトバウンド"]),
        entry("SDR", CATEGORY_SALES_FORMAT, &[r"(?i)(?-u:\b)SDR(?-u:\b)|インバウンド"]),
        entry("CS（カスタマーサクセス）", CATEGORY_SALES_FORMAT, &[r"(?i)カスタマーサクセス|(?-u:\b)CS(?-u:\b)|Customer\s*Success"]),
        entry("新規開拓", CATEGORY_SALES_FORMAT, &[r"新規開拓|新規顧客|新規獲得"]),
        entry("テレアポ", CATEGORY_SALES_FORMAT, &[r"テレアポ|電話営業|コールセンター"]),
        entry("反響営業", CATEGORY_SALES_FORMAT, &[r"反響営業"]),
        entry("アップセル・クロスセル", CATEGORY_SALES_FORMAT, &[r"アップセル|クロスセル"]),
        // 商材・業種
        entry("SaaS", CATEGORY_INDUSTRY, &[r"(?i)(?-u:\b)SaaS(?-u:\b)"]),
        entry("無形商材", CATEGORY_INDUSTRY, &[r"無形商材"]),
        entry("HR・人材サービス", CATEGORY_INDUSTRY, &[r"(?i)(?-u:\b)HR(?-u:\b)|人材サービス|人材紹介|求人"]),
        entry("不動産・不動産DX", CATEGORY_INDUSTRY, &[r"不動産"]),
        entry("保険・金融", CATEGORY_INDUSTRY, &[r"保険|金融|フィンテック"]),
        entry("AI・機械学習", CATEGORY_INDUSTRY, &[r"(?i)(?-u:\b)AI(?-u:\b)|人工知能|機械学習"]),
        entry("法務・LegalTech", CATEGORY_INDUSTRY, &[r"(?i)法務|(?-u:\b)LegalTech(?-u:\b)|弁護士"]),
        entry("車両・自動車", CATEGORY_INDUSTRY, &[r"車両|自動車|車販|車買取"]),
        entry("DX・デジタル化", CATEGORY_INDUSTRY, &[r"(?i)(?-u:\b)DX(?-u:\b)|デジタル化"]),
        entry("医療・ヘルスケア", CATEGORY_INDUSTRY, &[r"医療|ヘルスケア"]),
        entry("光回線・通信", CATEGORY_INDUSTRY, &[r"光回線|通信|テレコム"]),
        entry("クラウド・インフラ", CATEGORY_INDUSTRY, &[r"(?i)クラウド|(?-u:\b)AWS(?-u:\b)|(?-u:\b)GCP(?-u:\b)|(?-u:\b)Azure(?-u:\b)"]),
        // ツール
        entry("Salesforce", CATEGORY_TOOLING, &[r"(?i)Salesforce|(?-u:\b)SFA(?-u:\b)|(?-u:\b)CRM(?-u:\b)"]),
        entry("HubSpot", CATEGORY_TOOLING, &[r"(?i)HubSpot"]),
        entry("Slack・Teams", CATEGORY_TOOLING, &[r"(?i)(?-u:\b)Slack(?-u:\b)|(?-u:\b)Teams(?-u:\b)"]),
        // 営業スタイル
        entry("エンタープライズ営業", CATEGORY_SALES_STYLE, &[r"エンタープライズ|大手企業|中堅大手"]),
        entry("ABM", CATEGORY_SALES_STYLE, &[r"(?i)(?-u:\b)ABM(?-u:\b)|アカウントベースド"]),
        entry("マネジメント・リーダー", CATEGORY_SALES_STYLE, &[r"マネジメント|リーダー|チームリード"]),
    ]
});

/// Stateless scan of listing text against the fixed dictionary. Every
/// entry with any matching pattern is reported; labels are unique so no
/// dedup is needed.
pub fn detect_keywords(text: &str) -> Vec<DetectedKeyword> {
    KEYWORD_DICT
        .iter()
        .filter(|entry| entry.patterns.iter().any(|p| p.is_match(text)))
        .map(|entry| DetectedKeyword {
            label: entry.label,
            category: entry.category,
        })
        .collect()
}
