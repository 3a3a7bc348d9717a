use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use shared::domain::KeywordDifficulty;

/// Visitors represented by one unit of `traffic_increase`.
pub const VISITORS_PER_TRAFFIC_UNIT: f64 = 1000.0;
/// Writing hours saved per generated piece.
pub const HOURS_SAVED_PER_PIECE: f64 = 2.0;

/// Monthly inputs for the ROI calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiInputs {
    pub tool_subscription: f64,
    pub time_investment_hours: f64,
    pub hourly_rate: f64,
    pub content_generated: f64,
    /// Extra monthly visitors, in thousands.
    pub traffic_increase: f64,
    /// Percent of visitors who convert.
    pub conversion_rate: f64,
    pub avg_order_value: f64,
}

impl Default for RoiInputs {
    fn default() -> Self {
        Self {
            tool_subscription: 99.0,
            time_investment_hours: 20.0,
            hourly_rate: 50.0,
            content_generated: 150.0,
            traffic_increase: 35.0,
            conversion_rate: 2.5,
            avg_order_value: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    pub total_costs: f64,
    pub revenue: f64,
    pub profit: f64,
    /// `None` when there are no costs to divide by.
    pub roi_percent: Option<f64>,
    pub additional_visitors: f64,
    pub expected_conversions: f64,
    pub hours_saved: f64,
}

impl RoiReport {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }
}

pub fn calculate_roi(inputs: &RoiInputs) -> RoiReport {
    let total_costs = inputs.tool_subscription + inputs.time_investment_hours * inputs.hourly_rate;
    let additional_visitors = inputs.traffic_increase * VISITORS_PER_TRAFFIC_UNIT;
    let expected_conversions = additional_visitors * (inputs.conversion_rate / 100.0);
    let revenue = expected_conversions * inputs.avg_order_value;
    let profit = revenue - total_costs;
    let roi_percent = (total_costs != 0.0).then(|| profit / total_costs * 100.0);

    RoiReport {
        total_costs,
        revenue,
        profit,
        roi_percent,
        additional_visitors,
        expected_conversions,
        hours_saved: inputs.content_generated * HOURS_SAVED_PER_PIECE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "positions", rename_all = "lowercase")]
pub enum RankingTrend {
    Improved(u32),
    Declined(u32),
    Unchanged,
}

impl RankingTrend {
    /// Lower rank numbers are better positions.
    pub fn between(current_rank: u32, previous_rank: u32) -> Self {
        match current_rank.cmp(&previous_rank) {
            Ordering::Less => RankingTrend::Improved(previous_rank - current_rank),
            Ordering::Greater => RankingTrend::Declined(current_rank - previous_rank),
            Ordering::Equal => RankingTrend::Unchanged,
        }
    }
}

impl fmt::Display for RankingTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingTrend::Improved(by) => write!(f, "+{by}"),
            RankingTrend::Declined(by) => write!(f, "-{by}"),
            RankingTrend::Unchanged => f.write_str("0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRanking {
    pub keyword: String,
    pub current_rank: u32,
    pub previous_rank: u32,
    pub search_volume: u32,
    pub difficulty: KeywordDifficulty,
    pub url: String,
}

impl KeywordRanking {
    pub fn trend(&self) -> RankingTrend {
        RankingTrend::between(self.current_rank, self.previous_rank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingSort {
    /// Best position first.
    CurrentRank,
    /// Highest volume first.
    SearchVolume,
}

pub fn sort_rankings(rankings: &mut [KeywordRanking], by: RankingSort) {
    match by {
        RankingSort::CurrentRank => rankings.sort_by_key(|r| r.current_rank),
        RankingSort::SearchVolume => {
            rankings.sort_by(|a, b| b.search_volume.cmp(&a.search_volume))
        }
    }
}

#[cfg(test)]
#[path = "tests/analytics_tests.rs"]
mod tests;
