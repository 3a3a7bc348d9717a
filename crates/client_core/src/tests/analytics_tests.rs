use super::*;
use crate::catalog::sample_rankings;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn default_inputs_produce_expected_report() {
    let report = calculate_roi(&RoiInputs::default());
    assert!(close(report.total_costs, 1099.0));
    assert!(close(report.additional_visitors, 35_000.0));
    assert!(close(report.expected_conversions, 875.0));
    assert!(close(report.revenue, 131_250.0));
    assert!(close(report.profit, 130_151.0));
    let roi = report.roi_percent.expect("non-zero costs");
    assert!(close(roi, 130_151.0 / 1099.0 * 100.0));
    assert!(close(report.hours_saved, 300.0));
    assert!(report.is_profitable());
}

#[test]
fn zero_costs_have_no_roi_percentage() {
    let inputs = RoiInputs {
        tool_subscription: 0.0,
        time_investment_hours: 0.0,
        ..RoiInputs::default()
    };
    let report = calculate_roi(&inputs);
    assert_eq!(report.total_costs, 0.0);
    assert!(report.roi_percent.is_none());
}

#[test]
fn losses_give_negative_roi() {
    let inputs = RoiInputs {
        traffic_increase: 0.0,
        ..RoiInputs::default()
    };
    let report = calculate_roi(&inputs);
    assert!(!report.is_profitable());
    assert!(close(report.roi_percent.expect("roi"), -100.0));
}

#[test]
fn trend_labels() {
    assert_eq!(RankingTrend::between(3, 5), RankingTrend::Improved(2));
    assert_eq!(RankingTrend::between(12, 8), RankingTrend::Declined(4));
    assert_eq!(RankingTrend::between(7, 7), RankingTrend::Unchanged);

    assert_eq!(RankingTrend::Improved(2).to_string(), "+2");
    assert_eq!(RankingTrend::Declined(4).to_string(), "-4");
    assert_eq!(RankingTrend::Unchanged.to_string(), "0");
}

#[test]
fn sorts_rankings_by_position_or_volume() {
    let mut rankings = sample_rankings();
    sort_rankings(&mut rankings, RankingSort::CurrentRank);
    let ranks: Vec<u32> = rankings.iter().map(|r| r.current_rank).collect();
    assert_eq!(ranks, vec![1, 3, 4, 7, 12]);

    sort_rankings(&mut rankings, RankingSort::SearchVolume);
    assert_eq!(rankings[0].keyword, "competitor analysis");
    assert_eq!(rankings[4].search_volume, 8_500);
}
