//! Local period summary: the same aggregation the summary endpoint returns,
//! computed from a receipt list.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::insights::{daily_average, highest, merchant_highlights};
use tally_core::time::{first_of_month, monday_of};
use tally_core::{
    CategorySlice, Comparison, DatedCategoryTotal, DatedTotal, GradientStop, MerchantStat,
    PeriodKind, PeriodSummary, PeriodWindow, Receipt, Share, build_gradient_stops, build_shares,
    period_label, resolve_window,
};
use tracing::debug;

use crate::dashboard::DashboardConfig;

/// Aggregate `receipts` for the period `offset` steps from the one holding
/// `today`, plus the previous period's total.
pub fn summarize(receipts: &[Receipt], kind: PeriodKind, offset: i32, today: NaiveDate) -> PeriodSummary {
    let window = resolve_window(kind, offset, today);
    let previous = resolve_window(kind, offset.saturating_sub(1), today);

    let in_window: Vec<&Receipt> = receipts.iter().filter(|r| window.contains(r.date)).collect();
    let total_spent: f64 = in_window.iter().map(|r| r.total_amount).sum();
    let previous_total: f64 = receipts
        .iter()
        .filter(|r| previous.contains(r.date))
        .map(|r| r.total_amount)
        .sum();

    let (by_month, by_month_category) = if kind == PeriodKind::Year {
        (bucket(&in_window, first_of_month), bucket_by_category(&in_window, first_of_month))
    } else {
        (Vec::new(), Vec::new())
    };

    let summary = PeriodSummary {
        kind,
        window: Some(window),
        total_spent,
        previous_total,
        by_category: by_category(&in_window),
        by_week: bucket(&in_window, monday_of),
        by_day: bucket(&in_window, |d| d),
        by_month,
        by_week_category: bucket_by_category(&in_window, monday_of),
        by_day_category: bucket_by_category(&in_window, |d| d),
        by_month_category,
    };

    debug!(
        kind = %kind,
        offset,
        start = %window.start,
        end = %window.end,
        receipts = in_window.len(),
        total = total_spent,
        "summarized period"
    );
    summary
}

/// Category totals, largest first; ties keep first-seen order.
fn by_category(receipts: &[&Receipt]) -> Vec<CategorySlice> {
    let mut out: Vec<CategorySlice> = Vec::new();
    for r in receipts {
        match out.iter_mut().find(|s| s.category_name == r.category_name) {
            Some(s) => {
                s.total += r.total_amount;
                s.count += 1;
            }
            None => out.push(CategorySlice::new(r.category_name.clone(), r.total_amount, 1)),
        }
    }
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}

fn bucket(receipts: &[&Receipt], key: impl Fn(NaiveDate) -> NaiveDate) -> Vec<DatedTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in receipts {
        *totals.entry(key(r.date)).or_default() += r.total_amount;
    }
    totals.into_iter().map(|(date, total)| DatedTotal { date, total }).collect()
}

fn bucket_by_category(
    receipts: &[&Receipt],
    key: impl Fn(NaiveDate) -> NaiveDate,
) -> Vec<DatedCategoryTotal> {
    let mut totals: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for r in receipts {
        *totals.entry((key(r.date), r.category_name.as_str())).or_default() += r.total_amount;
    }
    totals
        .into_iter()
        .map(|((date, category), total)| DatedCategoryTotal {
            date,
            category_name: category.to_string(),
            total,
        })
        .collect()
}

/// Totals per category for one bucket date, in the order of `order`.
pub fn bucket_slices(
    splits: &[DatedCategoryTotal],
    date: NaiveDate,
    order: &[CategorySlice],
) -> Vec<CategorySlice> {
    order
        .iter()
        .filter_map(|o| {
            let total: f64 = splits
                .iter()
                .filter(|s| s.date == date && s.category_name == o.category_name)
                .map(|s| s.total)
                .sum();
            (total > 0.0).then(|| CategorySlice::new(o.category_name.clone(), total, 0))
        })
        .collect()
}

/// The window a summary covers, or the one it should have covered.
pub fn summary_window(summary: &PeriodSummary, today: NaiveDate) -> PeriodWindow {
    summary.window.unwrap_or_else(|| resolve_window(summary.kind, 0, today))
}

/// Derived view of a summary payload fetched from the API
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryView {
    pub kind: PeriodKind,
    pub window: PeriodWindow,
    pub label: String,
    pub total_spent: f64,
    pub previous_total: f64,
    pub comparison: Option<Comparison>,
    pub daily_average: f64,
    pub shares: Vec<Share>,
    pub category_stops: Vec<GradientStop>,
    pub highest_day: Option<DatedTotal>,
    pub highest_week: Option<DatedTotal>,
    pub most_spent_store: Option<String>,
    pub most_visited_store: Option<String>,
    pub subscriptions: Vec<String>,
}

impl SummaryView {
    pub fn build(
        summary: &PeriodSummary,
        merchants: &[MerchantStat],
        today: NaiveDate,
        config: &DashboardConfig,
    ) -> Self {
        let window = summary_window(summary, today);
        let shares = build_shares(&summary.by_category, summary.total_spent);
        let highlights = merchant_highlights(merchants);
        Self {
            kind: summary.kind,
            label: period_label(summary.kind, &window),
            total_spent: summary.total_spent,
            previous_total: summary.previous_total,
            comparison: Comparison::between(summary.total_spent, summary.previous_total),
            daily_average: daily_average(summary.total_spent, summary.kind, &window),
            category_stops: build_gradient_stops(&shares, config.category_blend),
            shares,
            highest_day: highest(&summary.by_day).copied(),
            highest_week: highest(&summary.by_week).copied(),
            most_spent_store: highlights.as_ref().map(|h| h.most_spent.store_name.clone()),
            most_visited_store: highlights.as_ref().map(|h| h.most_visited.store_name.clone()),
            subscriptions: merchants
                .iter()
                .filter(|m| m.is_subscription)
                .map(|m| m.store_name.clone())
                .collect(),
            window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn r(id: i64, date: NaiveDate, amount: f64, cat: &str) -> Receipt {
        Receipt::new(id, date, amount, Some(format!("Store {id}")), cat)
    }

    fn sample() -> Vec<Receipt> {
        vec![
            r(1, d(2024, 1, 2), 20.0, "Food & Drink"),
            r(2, d(2024, 1, 2), 30.0, "Travel"),
            r(3, d(2024, 1, 10), 15.0, "Food & Drink"),
            r(4, d(2024, 1, 31), 5.0, "Health"),
            r(5, d(2023, 12, 28), 40.0, "Travel"),
            r(6, d(2024, 2, 1), 99.0, "Travel"),
        ]
    }

    #[test]
    fn test_month_summary() {
        let s = summarize(&sample(), PeriodKind::Month, 0, d(2024, 1, 16));
        assert_eq!(s.window, Some(PeriodWindow { start: d(2024, 1, 1), end: d(2024, 1, 31) }));
        assert_eq!(s.total_spent, 70.0);
        assert_eq!(s.previous_total, 40.0);
        assert_eq!(s.category_total(), s.total_spent);

        let names: Vec<_> = s.by_category.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, vec!["Food & Drink", "Travel", "Health"]);
        assert_eq!(s.by_category[0].count, 2);

        let weeks: Vec<_> = s.by_week.iter().map(|w| w.date).collect();
        assert_eq!(weeks, vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 29)]);
        assert_eq!(s.by_day[0].total, 50.0);
        assert!(s.by_month.is_empty());
    }

    #[test]
    fn test_year_summary_has_months() {
        let s = summarize(&sample(), PeriodKind::Year, 0, d(2024, 6, 1));
        assert_eq!(s.total_spent, 169.0);
        assert_eq!(s.previous_total, 40.0);
        let months: Vec<_> = s.by_month.iter().map(|m| (m.date, m.total)).collect();
        assert_eq!(months, vec![(d(2024, 1, 1), 70.0), (d(2024, 2, 1), 99.0)]);
        assert!(!s.by_month_category.is_empty());
    }

    #[test]
    fn test_past_offset_and_empty_period() {
        let s = summarize(&sample(), PeriodKind::Month, -1, d(2024, 1, 16));
        assert_eq!(s.total_spent, 40.0);
        assert_eq!(s.previous_total, 0.0);

        let empty = summarize(&sample(), PeriodKind::Week, -10, d(2024, 1, 16));
        assert!(empty.is_empty());
        assert!(empty.by_category.is_empty());
    }

    #[test]
    fn test_bucket_slices_follow_category_order() {
        let s = summarize(&sample(), PeriodKind::Month, 0, d(2024, 1, 16));
        let slices = bucket_slices(&s.by_week_category, d(2024, 1, 1), &s.by_category);
        let names: Vec<_> = slices.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, vec!["Food & Drink", "Travel"]);
    }

    #[test]
    fn test_summary_view_from_payload() {
        let summary = summarize(&sample(), PeriodKind::Month, 0, d(2024, 1, 16));
        let merchants = vec![
            MerchantStat { store_name: "Delta".into(), total_spent: 30.0, visit_count: 1, is_subscription: false },
            MerchantStat { store_name: "Netflix".into(), total_spent: 15.49, visit_count: 3, is_subscription: true },
        ];
        let view = SummaryView::build(&summary, &merchants, d(2024, 1, 16), &DashboardConfig::default());
        assert_eq!(view.label, "January 2024");
        assert_eq!(view.shares.len(), 3);
        assert_eq!(view.most_spent_store.as_deref(), Some("Delta"));
        assert_eq!(view.most_visited_store.as_deref(), Some("Netflix"));
        assert_eq!(view.subscriptions, vec!["Netflix".to_string()]);
        assert!((view.daily_average - 70.0 / 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_view_keeps_payload_category_order() {
        let json = r#"{
            "total_spent": 100,
            "period": "month",
            "period_start": "2024-01-01",
            "period_end": "2024-01-31",
            "by_category": [
                {"category_name": "Health", "total": 10, "count": 1},
                {"category_name": "Travel", "total": 90, "count": 2}
            ]
        }"#;
        let summary = tally_ingest::parse_summary_json(json).unwrap();
        let view = SummaryView::build(&summary, &[], d(2024, 1, 16), &DashboardConfig::default());
        let names: Vec<_> = view.shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Health", "Travel"]);
        assert_eq!(view.category_stops.first().unwrap().position_pct, 0.0);
        assert_eq!(view.category_stops.last().unwrap().position_pct, 100.0);
    }

    #[test]
    fn test_summary_view_without_window_uses_current_period() {
        let summary = PeriodSummary { kind: PeriodKind::Week, ..Default::default() };
        let view = SummaryView::build(&summary, &[], d(2024, 1, 17), &DashboardConfig::default());
        assert_eq!(view.window.start, d(2024, 1, 15));
        assert!(view.shares.is_empty());
        assert!(view.most_spent_store.is_none());
    }
}
