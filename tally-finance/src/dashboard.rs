//! Dashboard assembly: turns receipts, budgets and goals into everything the
//! spending dashboard shows for one selected period.

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::insights::{
    daily_average, full_week, grid_ticks, highest, merchant_breakdown, merchant_highlights,
};
use tally_core::proportion::{CATEGORY_BAR_BLEND, CHART_BAR_BLEND};
use tally_core::{
    Budget, BudgetProgress, CategorySlice, Comparison, DatedCategoryTotal, DatedTotal, GoalProgress,
    GradientStop, MerchantStat, MerchantTotal, OffsetBounds, PeriodKind, PeriodNavigator,
    PeriodSelection, PeriodSummary, PeriodWindow, Receipt, Share, SpendingGoal, budget_progress,
    build_gradient_stops, build_shares, goal_progress, is_subscription_merchant, period_label,
    top_budgets,
};
use tally_ingest::receipt_date_bounds;
use tracing::{debug, warn};

use crate::summary::{bucket_slices, summarize};

/// Tunables for dashboard assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    /// Seam blend for the category bar, in percentage points
    pub category_blend: f64,
    /// Seam blend for stacked chart columns
    pub chart_blend: f64,
    /// How many budget alerts to show
    pub alert_count: usize,
    /// Target number of chart grid lines
    pub tick_count: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            category_blend: CATEGORY_BAR_BLEND,
            chart_blend: CHART_BAR_BLEND,
            alert_count: 3,
            tick_count: 4,
        }
    }
}

/// What the dashboard is built from
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub receipts: &'a [Receipt],
    pub budgets: &'a [Budget],
    pub goals: &'a [SpendingGoal],
    pub kind: PeriodKind,
    /// None opens on the newest period with data
    pub offset: Option<i32>,
}

/// One stacked column of the spending chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartColumn {
    pub date: NaiveDate,
    pub total: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetCard {
    pub budget: Budget,
    pub progress: BudgetProgress,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalCard {
    pub goal: SpendingGoal,
    pub progress: GoalProgress,
}

/// Fully derived dashboard for one period
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dashboard {
    pub selection: PeriodSelection,
    pub bounds: OffsetBounds,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub window: PeriodWindow,
    pub label: String,

    pub total_spent: f64,
    pub previous_total: f64,
    pub comparison: Option<Comparison>,
    pub daily_average: f64,

    pub shares: Vec<Share>,
    pub category_stops: Vec<GradientStop>,
    pub chart: Vec<ChartColumn>,
    pub chart_ticks: Vec<i64>,
    pub highest_day: Option<DatedTotal>,
    pub highest_week: Option<DatedTotal>,

    pub merchants: Vec<MerchantTotal>,
    pub top_merchants: Vec<MerchantStat>,
    pub most_spent_store: Option<String>,
    pub most_visited_store: Option<String>,

    /// Most consumed budgets first
    pub alerts: Vec<BudgetCard>,
    pub goals: Vec<GoalCard>,
}

impl Dashboard {
    pub fn assemble(input: DashboardInput<'_>, today: NaiveDate, config: &DashboardConfig) -> Self {
        let (oldest, newest) = receipt_date_bounds(input.receipts);
        let mut nav = PeriodNavigator::new(input.kind, oldest, newest, today);
        if let Some(offset) = input.offset {
            if !nav.bounds().contains(offset) {
                warn!(offset, bounds = ?nav.bounds(), "offset outside the data range; clamping");
            }
            nav.set_offset(offset);
        }

        let selection = nav.selection();
        let summary = summarize(input.receipts, selection.kind, selection.offset, today);
        let window = nav.window(today);

        let shares = build_shares(&summary.by_category, summary.total_spent);
        let category_stops = build_gradient_stops(&shares, config.category_blend);
        let chart = chart_columns(&summary, &window, config.chart_blend);
        let chart_max = chart.iter().map(|c| c.total).fold(0.0, f64::max);

        let period_receipts: Vec<Receipt> = input
            .receipts
            .iter()
            .filter(|r| window.contains(r.date))
            .cloned()
            .collect();
        let top_merchants = merchant_stats(&period_receipts);
        let highlights = merchant_highlights(&top_merchants);

        let period_budgets: Vec<Budget> = input
            .budgets
            .iter()
            .filter(|b| budget_overlaps(b, &window))
            .cloned()
            .collect();
        let alerts: Vec<BudgetCard> = top_budgets(&period_budgets, config.alert_count)
            .into_iter()
            .map(|b| BudgetCard { budget: b.clone(), progress: budget_progress(b, today) })
            .collect();
        let goals: Vec<GoalCard> = input
            .goals
            .iter()
            .map(|g| GoalCard { goal: g.clone(), progress: goal_progress(g) })
            .collect();

        debug!(
            kind = %selection.kind,
            offset = selection.offset,
            shares = shares.len(),
            alerts = alerts.len(),
            "assembled dashboard"
        );

        Self {
            selection,
            bounds: nav.bounds(),
            can_go_back: nav.can_go_back(),
            can_go_forward: nav.can_go_forward(),
            label: period_label(selection.kind, &window),
            total_spent: summary.total_spent,
            previous_total: summary.previous_total,
            comparison: Comparison::between(summary.total_spent, summary.previous_total),
            daily_average: daily_average(summary.total_spent, selection.kind, &window),
            shares,
            category_stops,
            chart_ticks: grid_ticks(chart_max, config.tick_count),
            chart,
            highest_day: highest(&summary.by_day).copied(),
            highest_week: highest(&summary.by_week).copied(),
            merchants: merchant_breakdown(&period_receipts),
            most_spent_store: highlights.as_ref().map(|h| h.most_spent.store_name.clone()),
            most_visited_store: highlights.as_ref().map(|h| h.most_visited.store_name.clone()),
            top_merchants,
            alerts,
            goals,
            window,
        }
    }
}

/// Day columns for a week (always seven), week columns for a month, month
/// columns for a year.
fn chart_columns(summary: &PeriodSummary, window: &PeriodWindow, blend: f64) -> Vec<ChartColumn> {
    let (points, splits): (Vec<DatedTotal>, &[DatedCategoryTotal]) = match summary.kind {
        PeriodKind::Week => (full_week(&summary.by_day, window.start), summary.by_day_category.as_slice()),
        PeriodKind::Month => (summary.by_week.clone(), summary.by_week_category.as_slice()),
        PeriodKind::Year => (summary.by_month.clone(), summary.by_month_category.as_slice()),
    };
    points
        .into_iter()
        .map(|p| {
            let slices: Vec<CategorySlice> = bucket_slices(splits, p.date, &summary.by_category);
            let shares = build_shares(&slices, p.total);
            ChartColumn { date: p.date, total: p.total, stops: build_gradient_stops(&shares, blend) }
        })
        .collect()
}

/// The budget runs during some day of `window`. A missing date leaves that
/// side of the budget open.
fn budget_overlaps(budget: &Budget, window: &PeriodWindow) -> bool {
    budget.start_date.is_none_or(|start| start <= window.end)
        && budget.end_date.is_none_or(|end| end >= window.start)
}

/// Per-store totals and visit counts, largest spend first. Receipts without
/// a store name are left out.
pub fn merchant_stats(receipts: &[Receipt]) -> Vec<MerchantStat> {
    let mut out: Vec<MerchantStat> = Vec::new();
    for r in receipts {
        let Some(name) = r.store_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        match out.iter_mut().find(|m| m.store_name == name) {
            Some(m) => {
                m.total_spent += r.total_amount;
                m.visit_count += 1;
            }
            None => out.push(MerchantStat {
                store_name: name.to_string(),
                total_spent: r.total_amount,
                visit_count: 1,
                is_subscription: is_subscription_merchant(name),
            }),
        }
    }
    out.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    out
}
