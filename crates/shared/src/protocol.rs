use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ContentType, ProjectId, ProjectStatus, SubscriptionTier, Tone, UserId,
};

pub const DEFAULT_WORD_COUNT: u32 = 1000;
pub const MIN_WORD_COUNT: u32 = 300;
pub const MAX_WORD_COUNT: u32 = 5000;

/// Values collected by the content wizard. Filled in step by step, so the
/// choice fields stay optional until validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub keyword: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    pub word_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    pub include_images: bool,
    pub target_audience: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitor_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_links: Vec<String>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            location: String::new(),
            content_type: None,
            word_count: DEFAULT_WORD_COUNT,
            tone: None,
            include_images: true,
            target_audience: String::new(),
            competitor_urls: Vec::new(),
            internal_links: Vec::new(),
        }
    }
}

/// Frozen, fully validated form values handed to the submit handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBrief {
    pub keyword: String,
    pub location: String,
    pub content_type: ContentType,
    pub word_count: u32,
    pub tone: Tone,
    pub include_images: bool,
    pub target_audience: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitor_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub internal_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStage {
    KeywordResearch,
    CompetitorAnalysis,
    ContentGeneration,
    SeoOptimization,
}

impl GenerationStage {
    pub const ALL: [GenerationStage; 4] = [
        GenerationStage::KeywordResearch,
        GenerationStage::CompetitorAnalysis,
        GenerationStage::ContentGeneration,
        GenerationStage::SeoOptimization,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn id(self) -> &'static str {
        match self {
            GenerationStage::KeywordResearch => "keyword-research",
            GenerationStage::CompetitorAnalysis => "competitor-analysis",
            GenerationStage::ContentGeneration => "content-generation",
            GenerationStage::SeoOptimization => "seo-optimization",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GenerationStage::KeywordResearch => "Keyword Research",
            GenerationStage::CompetitorAnalysis => "Competitor Analysis",
            GenerationStage::ContentGeneration => "Content Generation",
            GenerationStage::SeoOptimization => "SEO Optimization",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GenerationStage::KeywordResearch => "Analyzing search volumes and competition",
            GenerationStage::CompetitorAnalysis => "Examining top-ranking content strategies",
            GenerationStage::ContentGeneration => "Creating SEO-optimized content with AI",
            GenerationStage::SeoOptimization => "Applying final optimizations and formatting",
        }
    }

    /// Display-only estimate; the simulator never times anything off it.
    pub fn estimated_secs(self) -> u32 {
        match self {
            GenerationStage::KeywordResearch => 15,
            GenerationStage::CompetitorAnalysis => 25,
            GenerationStage::ContentGeneration => 45,
            GenerationStage::SeoOptimization => 15,
        }
    }

    pub fn index(self) -> usize {
        match self {
            GenerationStage::KeywordResearch => 0,
            GenerationStage::CompetitorAnalysis => 1,
            GenerationStage::ContentGeneration => 2,
            GenerationStage::SeoOptimization => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub percent: f64,
    pub active_stage_index: usize,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::at_percent(0.0)
    }
}

impl ProgressState {
    /// Progress clamped into `[0, 100]` with the stage index derived from it.
    pub fn at_percent(percent: f64) -> Self {
        let percent = percent.clamp(0.0, 100.0);
        Self {
            percent,
            active_stage_index: stage_index_for(percent, GenerationStage::COUNT),
        }
    }

    pub fn active_stage(&self) -> GenerationStage {
        GenerationStage::from_index(self.active_stage_index)
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }

    pub fn stage_status(&self, stage: GenerationStage) -> StageStatus {
        let index = stage.index();
        if self.active_stage_index > index {
            StageStatus::Completed
        } else if self.active_stage_index == index {
            StageStatus::Active
        } else {
            StageStatus::Pending
        }
    }

    /// Percentage rounded for a progress label.
    pub fn rounded_percent(&self) -> u32 {
        self.percent.round() as u32
    }
}

/// `floor(percent / 100 * stage_count)`, clamped to `[0, stage_count - 1]`.
pub fn stage_index_for(percent: f64, stage_count: usize) -> usize {
    if stage_count == 0 {
        return 0;
    }
    let raw = (percent / 100.0 * stage_count as f64).floor();
    if raw <= 0.0 || raw.is_nan() {
        0
    } else {
        (raw as usize).min(stage_count - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub title: String,
    pub content: String,
    pub seo_score: u32,
    pub word_count: u32,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GenerationEvent {
    Progress(ProgressState),
    Completed { result: GenerationResult },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub subscription: SubscriptionTier,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    /// Absent from profiles saved before the settings form existed.
    #[serde(default)]
    pub details: ProfileDetails,
}

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fields edited on the profile settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub timezone: String,
    pub language: String,
}

impl ProfileDetails {
    /// Splits a display name at its first whitespace run.
    pub fn from_display_name(name: &str) -> Self {
        let name = name.trim();
        let (first, last) = name
            .split_once(char::is_whitespace)
            .map_or((name, ""), |(first, last)| (first, last.trim()));
        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ProfileDetails {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            company: None,
            job_title: None,
            bio: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub location: String,
    pub status: ProjectStatus,
    pub content_count: u32,
    pub content_goal: u32,
    pub timeline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
