// Integration tests for anken-match

use std::sync::Arc;

use anken_match::core::Matcher;
use anken_match::models::{
    Anken, BadgeStatus, ExcludeReason, PriceType, SearchCondition, SkillProfile,
};
use anken_match::services::{AnkenStore, SheetClient, SheetError};

fn create_anken(id: &str, name: &str, full_text: &str) -> Anken {
    Anken {
        id: id.to_string(),
        name: name.to_string(),
        full_text: full_text.to_string(),
    }
}

#[test]
fn test_end_to_end_hourly_remote_match() {
    let matcher = Matcher::new();
    let condition = SearchCondition {
        price_type: Some(PriceType::Hourly),
        min_price: Some(2000),
        remarks: Some("フルリモート".to_string()),
        ..SearchCondition::default()
    };
    let ankens = vec![create_anken(
        "anken_1",
        "IS支援",
        "時給：2,200円\nフルリモート案件",
    )];

    let result = matcher.run(&ankens, &condition, None);

    assert!(result.excluded.is_empty());
    assert_eq!(result.matched.len(), 1);

    let hit = &result.matched[0];
    assert_eq!(hit.extracted_price, Some(2200));
    assert_eq!(hit.extracted_price_type, Some(PriceType::Hourly));
    // 基礎50 + 単価ボーナス + リモート5 + 備考加点
    assert!(hit.score >= 65, "score was {}", hit.score);
    assert!(hit
        .condition_badges
        .iter()
        .any(|b| b.label.contains("単価") && b.status == BadgeStatus::Match));
    assert!(hit
        .condition_badges
        .iter()
        .any(|b| b.label == "フルリモート" && b.status == BadgeStatus::Match));
}

#[test]
fn test_end_to_end_unit_mismatch_excludes() {
    let matcher = Matcher::new();
    let condition = SearchCondition {
        price_type: Some(PriceType::Hourly),
        min_price: Some(3000),
        ..SearchCondition::default()
    };
    let ankens = vec![create_anken("anken_1", "月額案件", "月額400,000円")];

    let result = matcher.run(&ankens, &condition, None);

    assert!(result.matched.is_empty());
    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].exclude_reason, ExcludeReason::PriceMismatch);
    assert!(result.excluded[0]
        .exclude_reason_message
        .contains("単価種別が一致しません"));
}

#[test]
fn test_price_stage_neutral_without_condition() {
    let matcher = Matcher::new();
    let ankens = vec![
        create_anken("anken_1", "安い案件", "時給：900円"),
        create_anken("anken_2", "高い案件", "時給：5,000円"),
    ];

    let result = matcher.run(&ankens, &SearchCondition::default(), None);

    assert_eq!(result.matched.len(), 2);
    assert!(result.excluded.is_empty());
    assert_eq!(result.matched[0].score, result.matched[1].score);
}

#[test]
fn test_ng_remarks_beat_positive_signals() {
    let matcher = Matcher::new();
    let condition = SearchCondition {
        price_type: Some(PriceType::Hourly),
        min_price: Some(1000),
        remarks: Some("フルリモート 長期不可".to_string()),
        ..SearchCondition::default()
    };
    // 単価もリモートも好条件だが、NGキーワードが成立する
    let ankens = vec![create_anken(
        "anken_1",
        "好条件だがNG",
        "時給：3,000円\nフルリモート\n長期（1年以上）の稼働をお願いします",
    )];

    let result = matcher.run(&ankens, &condition, None);

    assert!(result.matched.is_empty());
    assert_eq!(result.excluded.len(), 1);
    assert_eq!(result.excluded[0].exclude_reason, ExcludeReason::RemarksNg);
}

#[test]
fn test_ranking_is_deterministic() {
    let matcher = Matcher::new();
    let condition = SearchCondition {
        price_type: Some(PriceType::Hourly),
        min_price: Some(2000),
        ..SearchCondition::default()
    };
    let ankens = vec![
        create_anken("anken_1", "普通", "時給：2,100円"),
        create_anken("anken_2", "良い", "時給：3,000円 フルリモート"),
        create_anken("anken_3", "同点A", "一般的な営業案件"),
        create_anken("anken_4", "同点B", "一般的な事務案件"),
    ];

    let first = matcher.run(&ankens, &condition, None);
    let second = matcher.run(&ankens, &condition, None);

    let first_ids: Vec<&str> = first.matched.iter().map(|m| m.id.as_str()).collect();
    let second_ids: Vec<&str> = second.matched.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);

    // スコア降順、同点はシート順
    for pair in first.matched.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    let pos3 = first_ids.iter().position(|id| *id == "anken_3").unwrap();
    let pos4 = first_ids.iter().position(|id| *id == "anken_4").unwrap();
    assert!(pos3 < pos4);
}

#[test]
fn test_export_text_deduplicates_leading_names() {
    let matcher = Matcher::new();
    let ankens = vec![
        create_anken("anken_1", "SaaS新規開拓", "SaaS新規開拓\n時給：2,200円"),
        create_anken("anken_2", "別案件", "月額32万円のIS案件"),
    ];

    let result = matcher.run(&ankens, &SearchCondition::default(), None);
    let text = result.export_text();

    // 本文の先頭に案件名が重複している場合は付け直さない
    assert_eq!(text.matches("SaaS新規開拓").count(), 1);
    assert!(text.contains("\n\n---\n\n"));
    assert!(text.contains("別案件\n月額32万円のIS案件"));
}

#[test]
fn test_skill_profile_drives_score_and_summary() {
    let matcher = Matcher::new();
    let profile = SkillProfile::from_llm_response(
        r#"```json
{"summary": "IS経験3年", "skills": ["インサイドセールス", "Salesforce", "英語"], "yearsOfExperience": {"インサイドセールス": 3}}
```"#,
        "raw sheet text",
    );
    let ankens = vec![create_anken(
        "anken_1",
        "IS案件",
        "インサイドセールス、Salesforce運用あり",
    )];

    let result = matcher.run(&ankens, &SearchCondition::default(), Some(&profile));

    assert_eq!(result.skill_summary.as_deref(), Some("IS経験3年"));
    let hit = &result.matched[0];
    // 50 + スキル2項 × 5
    assert_eq!(hit.score, 60);
    let detail = hit.match_reason_detail.as_deref().unwrap();
    assert!(detail.contains("✅ スキルマッチ"));
    assert!(detail.contains("ℹ️ 未一致スキル: 英語"));
}

#[tokio::test]
async fn test_store_fetches_and_caches() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body("案件A,案件B\n\"時給：2,000円\",\"月額300,000円\"\n")
        .expect(1)
        .create_async()
        .await;

    let sheet = Arc::new(SheetClient::new(format!(
        "{}/export?format=csv",
        server.url()
    )));
    let store = AnkenStore::new(sheet, 300);

    let first = store.get().await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "案件A");

    // TTL内の再取得はキャッシュから返る（HTTPは1回だけ）
    let second = store.get().await.unwrap();
    assert_eq!(second.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_store_invalidate_forces_refetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/export")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body("案件A\n本文A\n")
        .expect(2)
        .create_async()
        .await;

    let sheet = Arc::new(SheetClient::new(format!(
        "{}/export?format=csv",
        server.url()
    )));
    let store = AnkenStore::new(sheet, 300);

    store.get().await.unwrap();
    store.invalidate();
    store.get().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_store_surfaces_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/export")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let sheet = Arc::new(SheetClient::new(format!(
        "{}/export?format=csv",
        server.url()
    )));
    let store = AnkenStore::new(sheet, 300);

    let err = store.get().await.unwrap_err();
    assert!(matches!(err, SheetError::SourceUnavailable(_)));
    assert!(err.to_string().contains("取得に失敗"));
}

#[tokio::test]
async fn test_store_keeps_error_kind_through_cache() {
    // A URL that is neither an export link nor an edit link fails as
    // InvalidSource, and the cache layer must not flatten the variant.
    let sheet = Arc::new(SheetClient::new(
        "https://example.com/not-a-sheet".to_string(),
    ));
    let store = AnkenStore::new(sheet, 300);

    let err = store.get().await.unwrap_err();
    assert!(matches!(err, SheetError::InvalidSource(_)));
}

#[tokio::test]
async fn test_sheet_with_single_row_yields_no_listings() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/export")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("名前だけの行\n")
        .create_async()
        .await;

    let sheet = SheetClient::new(format!("{}/export?format=csv", server.url()));
    let ankens = sheet.fetch_anken().await.unwrap();
    assert!(ankens.is_empty());
}
