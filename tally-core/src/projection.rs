//! Budget projection and the three-way spend status shared by budgets and
//! monthly goals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::finance::{Budget, SpendingGoal};
use crate::time::{finite_or_zero, inclusive_days, round_half_up};

/// Percent at or above which spend is over the limit.
pub const OVER_BUDGET_PERCENT: i64 = 100;
/// Percent strictly above which spend is close to the limit.
pub const NEAR_LIMIT_PERCENT: i64 = 80;

/// Linear extrapolation of spend-to-date across a budget window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectionResult {
    pub projected_spend: f64,
    pub is_over_projected: bool,
    /// Days of the window that have passed, at least 1
    pub days_elapsed: i64,
    /// Inclusive length of the window, at least 1
    pub total_days: i64,
    /// Today is after the window's last day
    pub ended: bool,
    /// Whether a projection should be shown at all
    pub displayable: bool,
}

/// Project `spent` over `[start, end]` as seen on `today`.
///
/// Always returns a value; `displayable` is false unless something was spent,
/// both dates are known and the window has not closed.
pub fn project(
    spent: f64,
    limit: f64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> ProjectionResult {
    let spent = finite_or_zero(spent);
    let limit = finite_or_zero(limit);

    let ended = end.is_some_and(|end| today > end);
    let total_days = match (start, end) {
        (Some(start), Some(end)) => inclusive_days(start, end),
        _ => 1,
    };
    let days_elapsed = match start {
        Some(start) => {
            let reference = match end {
                Some(end) if ended => end,
                _ => today,
            };
            inclusive_days(start, reference)
        }
        None => 1,
    };

    let projected_spend = if spent > 0.0 {
        spent / days_elapsed as f64 * total_days as f64
    } else {
        0.0
    };

    ProjectionResult {
        projected_spend,
        is_over_projected: projected_spend > limit,
        days_elapsed,
        total_days,
        ended,
        displayable: spent > 0.0 && start.is_some() && end.is_some() && !ended,
    }
}

/// Where spend sits relative to its limit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SpendStatus {
    #[serde(rename = "on-track")]
    OnTrack,
    #[serde(rename = "near-limit")]
    NearLimit,
    #[serde(rename = "over-budget")]
    OverBudget,
}

impl SpendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SpendStatus::OnTrack => "On track",
            SpendStatus::NearLimit => "Getting close",
            SpendStatus::OverBudget => "Over budget",
        }
    }
}

/// Classify an unclamped, rounded spend percentage.
pub fn classify(percentage: i64) -> SpendStatus {
    if percentage >= OVER_BUDGET_PERCENT {
        SpendStatus::OverBudget
    } else if percentage > NEAR_LIMIT_PERCENT {
        SpendStatus::NearLimit
    } else {
        SpendStatus::OnTrack
    }
}

/// round(spent / limit * 100). A non-positive or non-finite limit counts as 1.
pub fn spend_percentage(spent: f64, limit: f64) -> i64 {
    let limit = if limit.is_finite() && limit > 0.0 { limit } else { 1.0 };
    let pct = round_half_up(finite_or_zero(spent) / limit * 100.0);
    pct.clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

/// Percentage as a progress-bar width: never above 100, never below 0.
pub fn bar_width(percentage: i64) -> u8 {
    percentage.clamp(0, OVER_BUDGET_PERCENT) as u8
}

/// Everything a budget card shows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BudgetProgress {
    pub percentage: i64,
    pub bar_width: u8,
    pub remaining: f64,
    pub status: SpendStatus,
    pub projection: ProjectionResult,
}

pub fn budget_progress(budget: &Budget, today: NaiveDate) -> BudgetProgress {
    let spent = finite_or_zero(budget.spent_amount);
    let limit = effective_limit(budget.amount);
    let percentage = spend_percentage(spent, limit);
    BudgetProgress {
        percentage,
        bar_width: bar_width(percentage),
        remaining: (finite_or_zero(budget.amount) - spent).max(0.0),
        status: classify(percentage),
        projection: project(spent, limit, budget.start_date, budget.end_date, today),
    }
}

/// Budgets with a positive limit, most consumed first, at most `n`.
pub fn top_budgets(budgets: &[Budget], n: usize) -> Vec<&Budget> {
    let mut ranked: Vec<(&Budget, f64)> = budgets
        .iter()
        .filter_map(|b| b.spend_ratio().map(|r| (b, r)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(b, _)| b).collect()
}

/// Everything a monthly goal card shows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GoalProgress {
    pub percentage: i64,
    pub bar_width: u8,
    /// Current spend has reached the target
    pub over_limit: bool,
    /// Distance to the target, either side
    pub difference: f64,
    pub status: SpendStatus,
}

pub fn goal_progress(goal: &SpendingGoal) -> GoalProgress {
    let current = finite_or_zero(goal.current_amount);
    let target = effective_limit(goal.target_amount);
    let percentage = spend_percentage(current, target);
    GoalProgress {
        percentage,
        bar_width: bar_width(percentage),
        over_limit: current >= target,
        difference: (target - current).abs(),
        status: classify(percentage),
    }
}

fn effective_limit(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 { amount } else { 1.0 }
}
