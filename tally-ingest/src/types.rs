use serde::Deserialize;
use serde_json::Value;

/// Receipt row as the API serializes it. Every field stays a raw JSON value
/// so the parsers decide what "missing" or "malformed" means.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReceipt {
    #[serde(alias = "receipt_id", default)]
    pub id: Value,
    #[serde(alias = "receipt_date", alias = "purchase_date", default)]
    pub date: Value,
    #[serde(alias = "amount", default)]
    pub total_amount: Value,
    #[serde(default)]
    pub store_name: Value,
    #[serde(alias = "category", default)]
    pub category_name: Value,
    #[serde(default)]
    pub store_id: Value,
}

/// Paged list endpoint or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReceiptsPayload {
    Page {
        receipts: Vec<RawReceipt>,
        #[serde(default)]
        total_pages: Value,
    },
    List(Vec<RawReceipt>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBudget {
    #[serde(alias = "budget_id", default)]
    pub id: Value,
    #[serde(alias = "category", default)]
    pub category_name: Value,
    #[serde(alias = "budget_amount", default)]
    pub amount: Value,
    #[serde(alias = "spent", default)]
    pub spent_amount: Value,
    #[serde(default)]
    pub start_date: Value,
    #[serde(default)]
    pub end_date: Value,
    #[serde(default)]
    pub notification_threshold: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BudgetsPayload {
    Wrapped { budgets: Vec<RawBudget> },
    List(Vec<RawBudget>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGoal {
    #[serde(alias = "goal_id", default)]
    pub id: Value,
    #[serde(rename = "Month", alias = "month", default)]
    pub month: Value,
    #[serde(default)]
    pub target_amount: Value,
    #[serde(default)]
    pub current_amount: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GoalsPayload {
    Wrapped { goals: Vec<RawGoal> },
    List(Vec<RawGoal>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategoryTotal {
    #[serde(alias = "category", default)]
    pub category_name: Value,
    #[serde(default)]
    pub total: Value,
    #[serde(default)]
    pub count: Value,
}

/// A bucket total; the date key depends on the series.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDatedTotal {
    #[serde(alias = "week_start", alias = "day_date", alias = "month_start", default)]
    pub date: Value,
    #[serde(default)]
    pub category_name: Value,
    #[serde(default)]
    pub total: Value,
}

/// Summary endpoint body
#[derive(Debug, Clone, Deserialize)]
pub struct RawSummary {
    #[serde(default)]
    pub total_spent: Value,
    #[serde(default)]
    pub previous_total: Value,
    #[serde(default)]
    pub period: Value,
    #[serde(default)]
    pub period_start: Value,
    #[serde(default)]
    pub period_end: Value,
    #[serde(default)]
    pub by_category: Vec<RawCategoryTotal>,
    #[serde(default)]
    pub by_week: Vec<RawDatedTotal>,
    #[serde(default)]
    pub by_week_category: Vec<RawDatedTotal>,
    #[serde(default)]
    pub by_day: Vec<RawDatedTotal>,
    #[serde(default)]
    pub by_day_category: Vec<RawDatedTotal>,
    #[serde(default)]
    pub by_month: Vec<RawDatedTotal>,
    #[serde(default)]
    pub by_month_category: Vec<RawDatedTotal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMerchant {
    #[serde(alias = "name", default)]
    pub store_name: Value,
    #[serde(default)]
    pub total_spent: Value,
    #[serde(alias = "visits", default)]
    pub visit_count: Value,
    #[serde(default)]
    pub is_subscription: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MerchantsPayload {
    Wrapped { merchants: Vec<RawMerchant> },
    List(Vec<RawMerchant>),
}
