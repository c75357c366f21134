//! Spending goals endpoint. The month column is named "Month" server-side.

use anyhow::Result;
use tally_core::SpendingGoal;
use tracing::debug;

use super::decode_body;
use crate::decode::Decoder;
use crate::types::GoalsPayload;

pub fn parse_goals_json(json: &str) -> Result<Vec<SpendingGoal>> {
    let dec = Decoder::new()?;
    let raw = match decode_body::<GoalsPayload>(json, "goals")? {
        GoalsPayload::Wrapped { goals } => goals,
        GoalsPayload::List(goals) => goals,
    };

    let goals: Vec<SpendingGoal> = raw
        .iter()
        .enumerate()
        .map(|(idx, row)| SpendingGoal {
            id: dec.id(&row.id).unwrap_or(-(idx as i64) - 1),
            month: dec.text(&row.month).unwrap_or_default(),
            target_amount: dec.amount(&row.target_amount),
            current_amount: dec.amount(&row.current_amount),
        })
        .collect();

    debug!(count = goals.len(), "parsed goals");
    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_goals() {
        let json = r#"[
            {"goal_id": 9, "Month": "March", "target_amount": "400.00", "current_amount": 410.5},
            {"goal_id": 10, "month": "April", "target_amount": 300}
        ]"#;
        let goals = parse_goals_json(json).unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals[0].month, "March");
        assert_eq!(goals[0].target_amount, 400.0);
        assert_eq!(goals[0].current_amount, 410.5);
        assert_eq!(goals[1].month, "April");
        assert_eq!(goals[1].current_amount, 0.0);
    }
}
