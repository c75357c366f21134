//! Budgets endpoint: a bare array or `{"budgets": [...]}`.

use anyhow::Result;
use tally_core::{Budget, UNCATEGORIZED};
use tracing::{debug, warn};

use super::decode_body;
use crate::decode::Decoder;
use crate::types::BudgetsPayload;

/// Budgets with unreadable window dates are kept; projection is simply
/// unavailable for them.
pub fn parse_budgets_json(json: &str) -> Result<Vec<Budget>> {
    let dec = Decoder::new()?;
    let raw = match decode_body::<BudgetsPayload>(json, "budgets")? {
        BudgetsPayload::Wrapped { budgets } => budgets,
        BudgetsPayload::List(budgets) => budgets,
    };

    let budgets: Vec<Budget> = raw
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let start = dec.date(&row.start_date);
            let end = dec.date(&row.end_date);
            if start.is_none() || end.is_none() {
                warn!(row = idx, "budget window incomplete; projection disabled");
            }
            let mut budget = Budget::new(
                dec.id(&row.id).unwrap_or(-(idx as i64) - 1),
                dec.text(&row.category_name).unwrap_or_else(|| UNCATEGORIZED.to_string()),
                dec.amount(&row.amount),
                dec.amount(&row.spent_amount),
                start,
                end,
            );
            budget.notification_threshold = dec.opt_amount(&row.notification_threshold);
            budget
        })
        .collect();

    debug!(count = budgets.len(), "parsed budgets");
    Ok(budgets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_budgets() {
        let json = r#"[
            {"budget_id": 3, "category_name": "Food & Drink", "amount": "200.00", "spent_amount": "100.00",
             "start_date": "2024-01-01", "end_date": "Wed, 31 Jan 2024 00:00:00 GMT",
             "notification_threshold": 80},
            {"budget_id": 4, "category_name": "Travel", "amount": 500, "spent_amount": null,
             "start_date": null, "end_date": "2024-02-29"}
        ]"#;
        let budgets = parse_budgets_json(json).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].id, 3);
        assert_eq!(budgets[0].amount, 200.0);
        assert_eq!(budgets[0].spent_amount, 100.0);
        assert_eq!(budgets[0].end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(budgets[0].notification_threshold, Some(80.0));
        assert_eq!(budgets[1].spent_amount, 0.0);
        assert_eq!(budgets[1].start_date, None);
        assert_eq!(budgets[1].notification_threshold, None);
    }

    #[test]
    fn test_wrapped_budgets() {
        let json = r#"{"budgets": [{"id": 1, "category_name": "Health", "amount": 50}]}"#;
        let budgets = parse_budgets_json(json).unwrap();
        assert_eq!(budgets[0].category_name, "Health");
    }
}
