use super::*;

#[test]
fn suggestions_need_more_than_two_characters() {
    assert!(suggest_keywords("").is_empty());
    assert!(suggest_keywords("se").is_empty());
    assert!(suggest_keywords("  se  ").is_empty());

    let hits: Vec<&str> = suggest_keywords("seo")
        .into_iter()
        .map(|suggestion| suggestion.keyword)
        .collect();
    assert_eq!(hits, vec!["SEO automation", "SEO tools"]);
}

#[test]
fn suggestions_match_case_insensitively_anywhere() {
    let hits = suggest_keywords("CONTENT");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|s| s.keyword == "automated content"));
    assert!(suggest_keywords("nothing like this").is_empty());
}

#[test]
fn difficulty_bands() {
    assert_eq!(difficulty_band(0), KeywordDifficulty::Easy);
    assert_eq!(difficulty_band(29), KeywordDifficulty::Easy);
    assert_eq!(difficulty_band(30), KeywordDifficulty::Medium);
    assert_eq!(difficulty_band(59), KeywordDifficulty::Medium);
    assert_eq!(difficulty_band(60), KeywordDifficulty::Hard);
    assert_eq!(KEYWORD_SUGGESTIONS[4].difficulty_band(), KeywordDifficulty::Medium);
}

#[test]
fn countries_and_templates_resolve_by_id() {
    assert_eq!(COUNTRIES.len(), 10);
    assert_eq!(country_by_code("gb").map(|c| c.name), Some("United Kingdom"));
    assert!(country_by_code("XX").is_none());

    assert_eq!(template_by_id("saas").map(|t| t.name), Some("SaaS Marketing"));
    assert!(template_by_id("unknown").is_none());
}

#[test]
fn sample_rankings_cover_every_trend() {
    let rankings = sample_rankings();
    assert_eq!(rankings.len(), 5);
    assert!(rankings.iter().any(|r| r.current_rank < r.previous_rank));
    assert!(rankings.iter().any(|r| r.current_rank > r.previous_rank));
    assert!(rankings.iter().any(|r| r.current_rank == r.previous_rank));
}

#[test]
fn profile_choices_label_known_values_only() {
    assert_eq!(choice_label(&TIMEZONES, "Europe/Paris"), "Paris (CET)");
    assert_eq!(choice_label(&LANGUAGES, "ja"), "Japanese");
    assert_eq!(choice_label(&TIMEZONES, "UTC"), "UTC");
}
