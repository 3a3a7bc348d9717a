//! Static reference data shown by the front-ends.

use serde::Serialize;
use shared::domain::{Country, KeywordDifficulty};

use crate::analytics::KeywordRanking;

/// Queries this short or shorter get no suggestions.
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

pub const COUNTRIES: [Country; 10] = [
    Country { code: "US", name: "United States" },
    Country { code: "GB", name: "United Kingdom" },
    Country { code: "CA", name: "Canada" },
    Country { code: "AU", name: "Australia" },
    Country { code: "DE", name: "Germany" },
    Country { code: "FR", name: "France" },
    Country { code: "ES", name: "Spain" },
    Country { code: "IT", name: "Italy" },
    Country { code: "NL", name: "Netherlands" },
    Country { code: "SE", name: "Sweden" },
];

pub fn country_by_code(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code))
}

/// Profile form choices as `(value, label)`.
pub const TIMEZONES: [(&str, &str); 8] = [
    ("America/New_York", "Eastern Time (ET)"),
    ("America/Chicago", "Central Time (CT)"),
    ("America/Denver", "Mountain Time (MT)"),
    ("America/Los_Angeles", "Pacific Time (PT)"),
    ("Europe/London", "London (GMT)"),
    ("Europe/Paris", "Paris (CET)"),
    ("Asia/Tokyo", "Tokyo (JST)"),
    ("Australia/Sydney", "Sydney (AEDT)"),
];

pub const LANGUAGES: [(&str, &str); 8] = [
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
];

/// Label for a stored choice, falling back to the raw value.
pub fn choice_label<'a>(choices: &'a [(&'a str, &'a str)], value: &'a str) -> &'a str {
    choices
        .iter()
        .find(|(code, _)| *code == value)
        .map_or(value, |(_, label)| label)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTrend {
    Up,
    Stable,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordSuggestion {
    pub keyword: &'static str,
    pub volume: u32,
    /// 0-100 competition score.
    pub difficulty: u8,
    pub trend: SearchTrend,
}

impl KeywordSuggestion {
    pub fn difficulty_band(&self) -> KeywordDifficulty {
        difficulty_band(self.difficulty)
    }
}

pub const KEYWORD_SUGGESTIONS: [KeywordSuggestion; 5] = [
    KeywordSuggestion {
        keyword: "SEO automation",
        volume: 12_000,
        difficulty: 65,
        trend: SearchTrend::Up,
    },
    KeywordSuggestion {
        keyword: "content marketing",
        volume: 45_000,
        difficulty: 72,
        trend: SearchTrend::Up,
    },
    KeywordSuggestion {
        keyword: "keyword research",
        volume: 33_000,
        difficulty: 68,
        trend: SearchTrend::Stable,
    },
    KeywordSuggestion {
        keyword: "SEO tools",
        volume: 28_000,
        difficulty: 70,
        trend: SearchTrend::Up,
    },
    KeywordSuggestion {
        keyword: "automated content",
        volume: 8_500,
        difficulty: 45,
        trend: SearchTrend::Down,
    },
];

/// Case-insensitive substring match against the seed list.
pub fn suggest_keywords(query: &str) -> Vec<&'static KeywordSuggestion> {
    let query = query.trim().to_lowercase();
    if query.chars().count() <= MIN_SUGGESTION_QUERY_CHARS {
        return Vec::new();
    }
    KEYWORD_SUGGESTIONS
        .iter()
        .filter(|suggestion| suggestion.keyword.to_lowercase().contains(&query))
        .collect()
}

pub fn difficulty_band(score: u8) -> KeywordDifficulty {
    match score {
        0..=29 => KeywordDifficulty::Easy,
        30..=59 => KeywordDifficulty::Medium,
        _ => KeywordDifficulty::Hard,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const PROJECT_TEMPLATES: [ProjectTemplate; 5] = [
    ProjectTemplate {
        id: "ecommerce",
        name: "E-commerce SEO",
        description: "Product pages, category content, reviews",
    },
    ProjectTemplate {
        id: "blog",
        name: "Blog Content",
        description: "Article series, topic clusters, editorial calendar",
    },
    ProjectTemplate {
        id: "local",
        name: "Local Business",
        description: "Location pages, service areas, local SEO",
    },
    ProjectTemplate {
        id: "saas",
        name: "SaaS Marketing",
        description: "Feature pages, use cases, comparison content",
    },
    ProjectTemplate {
        id: "custom",
        name: "Custom Setup",
        description: "Start from scratch with your own configuration",
    },
];

pub fn template_by_id(id: &str) -> Option<&'static ProjectTemplate> {
    PROJECT_TEMPLATES.iter().find(|template| template.id == id.trim())
}

pub fn sample_rankings() -> Vec<KeywordRanking> {
    [
        ("AI content marketing", 3, 5, 12_000, KeywordDifficulty::Medium, "/blog/ai-content-marketing-guide"),
        ("SEO automation tools", 1, 2, 8_500, KeywordDifficulty::Hard, "/tools/seo-automation"),
        ("content generation AI", 7, 7, 15_000, KeywordDifficulty::Medium, "/ai-content-generator"),
        ("competitor analysis", 12, 8, 22_000, KeywordDifficulty::Hard, "/features/competitor-analysis"),
        ("keyword research tool", 4, 6, 18_000, KeywordDifficulty::Medium, "/keyword-research"),
    ]
    .into_iter()
    .map(
        |(keyword, current_rank, previous_rank, search_volume, difficulty, url)| KeywordRanking {
            keyword: keyword.to_string(),
            current_rank,
            previous_rank,
            search_volume,
            difficulty,
            url: url.to_string(),
        },
    )
    .collect()
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
