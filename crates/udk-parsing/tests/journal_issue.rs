//! End-to-end segmentation of a synthetic journal issue.
//!
//! The text mimics what PDF extraction yields for a Russian-language
//! proceedings volume: a title page, then articles each opened by a
//! `УДК` line, a page number, authors, abstract, keywords, body and a
//! bibliography.

use udk_parsing::fields::extract_keywords;
use udk_parsing::section::split_on_marker;
use udk_parsing::{ArticleExtractor, ParsingConfigBuilder};

fn issue_text() -> String {
    let mut text = String::from("МАТЕРИАЛЫ КОНФЕРЕНЦИИ\nТом 2\n");
    for (udk, page, kw) in [
        ("004.032.26", 17, Some("свёрточные сети, классификация")),
        ("681.5", 24, None),
        ("519.872", 31, Some("очереди, марковские процессы")),
    ] {
        text.push_str(&format!("УДК {udk}\n{page}\nИванов И.И., Петров П.П.\n"));
        text.push_str("Аннотация. Рассматривается задача.\n");
        if let Some(kw) = kw {
            text.push_str(&format!("Ключевые слова: {kw}.\n"));
        }
        text.push_str(&format!("Основной текст статьи {udk}.\n"));
        text.push_str("Литература\n1. Автор А. Книга. М., 2020.\n");
    }
    text
}

#[test]
fn splits_issue_into_preamble_and_articles() {
    let text = issue_text();
    let result = ArticleExtractor::new().extract_articles_from_text(&text, 2);

    assert_eq!(result.records.len(), 4);
    let udks: Vec<&str> = result.records.iter().map(|r| r.udk.as_str()).collect();
    assert_eq!(
        udks,
        vec!["МАТЕРИАЛЫ КОНФЕРЕНЦИИ", "004.032.26", "681.5", "519.872"]
    );
    assert_eq!(result.stats.with_keywords, 2);
    assert_eq!(result.stats.literature_trimmed, 3);
}

#[test]
fn bodies_exclude_udk_line_and_literature() {
    let text = issue_text();
    let result = ArticleExtractor::new().extract_articles_from_text(&text, 1);

    for record in &result.records[1..] {
        assert!(!record.content.starts_with(&record.udk));
        assert!(!record.content.to_lowercase().contains("литература"));
        assert!(!record.content.contains("Книга"));
        assert!(record.content.contains("Основной текст статьи"));
    }
}

#[test]
fn keyword_prefix_removed_only_where_present() {
    let text = issue_text();
    let result = ArticleExtractor::new().extract_articles_from_text(&text, 1);

    let with_kw = &result.records[1];
    assert_eq!(
        with_kw.keywords.as_deref(),
        Some("свёрточные сети, классификация")
    );
    assert_eq!(with_kw.content, "Основной текст статьи 004.032.26.");

    let without_kw = &result.records[2];
    assert!(without_kw.keywords.is_none());
    assert!(without_kw.content.starts_with("Иванов И.И."));
}

#[test]
fn rejoining_segments_recovers_issue() {
    let text = issue_text();
    let parts = split_on_marker(&text, "УДК ");
    assert_eq!(parts.len(), 4);
    assert_eq!(parts.join("УДК "), text);
}

#[test]
fn keyword_span_stable_under_reextraction() {
    let text = issue_text();
    for part in split_on_marker(&text, "УДК ") {
        if let Some(kw) = extract_keywords(part, "Ключевые слова:") {
            let rebuilt = format!("Ключевые слова: {kw}.");
            assert_eq!(extract_keywords(&rebuilt, "Ключевые слова:"), Some(kw));
        }
    }
}

#[test]
fn legacy_variant_without_keywords() -> anyhow::Result<()> {
    let config = ParsingConfigBuilder::new()
        .extract_keywords(false)
        .trim_literature(false)
        .build()?;
    let text = issue_text();
    let result = ArticleExtractor::with_config(config).extract_articles_from_text(&text, 1);

    assert!(result.records.iter().all(|r| r.keywords.is_none()));
    assert!(result.records[1].content.contains("Литература"));
    Ok(())
}
