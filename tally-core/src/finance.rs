//! Finance record types as the API hands them to the analytics layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::{PeriodKind, PeriodWindow};
use crate::time::finite_or_zero;

/// Category name used when the API has none for a row.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single purchase receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    /// API identifier
    pub id: i64,
    /// Purchase date
    pub date: NaiveDate,
    /// Receipt total, positive = spend
    pub total_amount: f64,
    /// Merchant name, if one was recorded
    pub store_name: Option<String>,
    /// Category the server assigned
    pub category_name: String,
    pub store_id: Option<i64>,
}

impl Receipt {
    pub fn new(
        id: i64,
        date: NaiveDate,
        total_amount: f64,
        store_name: Option<String>,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            total_amount: finite_or_zero(total_amount),
            store_name,
            category_name: category_name.into(),
            store_id: None,
        }
    }

    /// Display name: the store, or "Receipt #<id>"
    pub fn display_name(&self) -> String {
        match &self.store_name {
            Some(s) if !s.trim().is_empty() => s.clone(),
            _ => format!("Receipt #{}", self.id),
        }
    }
}

/// A spending limit for one category over an inclusive date window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: i64,
    pub category_name: String,
    /// The limit
    pub amount: f64,
    /// Server-computed spend inside the window (snapshot)
    pub spent_amount: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notification_threshold: Option<f64>,
}

impl Budget {
    pub fn new(
        id: i64,
        category_name: impl Into<String>,
        amount: f64,
        spent_amount: f64,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            category_name: category_name.into(),
            amount: finite_or_zero(amount),
            spent_amount: finite_or_zero(spent_amount),
            start_date,
            end_date,
            notification_threshold: None,
        }
    }

    /// spent / amount, or None when the budget has no positive limit
    pub fn spend_ratio(&self) -> Option<f64> {
        if self.amount > 0.0 {
            Some(finite_or_zero(self.spent_amount) / self.amount)
        } else {
            None
        }
    }
}

/// A monthly spending target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingGoal {
    pub id: i64,
    /// Month name as stored server-side, e.g. "March"
    pub month: String,
    pub target_amount: f64,
    /// Server-computed spend for that month
    pub current_amount: f64,
}

/// One category's aggregate spend inside a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySlice {
    pub category_name: String,
    pub total: f64,
    pub count: u32,
}

impl CategorySlice {
    pub fn new(category_name: impl Into<String>, total: f64, count: u32) -> Self {
        Self {
            category_name: category_name.into(),
            total: finite_or_zero(total),
            count,
        }
    }
}

/// A total bucketed on a date (day, Monday of a week, or first of a month)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DatedTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// A per-category total bucketed on a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatedCategoryTotal {
    pub date: NaiveDate,
    pub category_name: String,
    pub total: f64,
}

/// Aggregate spend at one merchant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MerchantStat {
    pub store_name: String,
    pub total_spent: f64,
    pub visit_count: u32,
    pub is_subscription: bool,
}

/// Aggregated spend for one period window, as the summary endpoint returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PeriodSummary {
    pub kind: PeriodKind,
    /// None when the payload's window dates did not parse
    pub window: Option<PeriodWindow>,
    pub total_spent: f64,
    /// Total of the period before this one
    pub previous_total: f64,
    /// Ordered by total, largest first
    pub by_category: Vec<CategorySlice>,
    /// Keyed on the Monday of each week
    pub by_week: Vec<DatedTotal>,
    pub by_day: Vec<DatedTotal>,
    /// Keyed on the first of each month; year views only
    pub by_month: Vec<DatedTotal>,
    pub by_week_category: Vec<DatedCategoryTotal>,
    pub by_day_category: Vec<DatedCategoryTotal>,
    pub by_month_category: Vec<DatedCategoryTotal>,
}

impl PeriodSummary {
    pub fn is_empty(&self) -> bool {
        self.total_spent == 0.0
    }

    /// Sum of the category slices, which should match `total_spent`.
    pub fn category_total(&self) -> f64 {
        self.by_category.iter().map(|s| s.total).sum()
    }
}
