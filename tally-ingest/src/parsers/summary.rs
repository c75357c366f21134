//! Period summary endpoint.
//!
//!   {"total_spent": "120.50", "previous_total": 80, "period": "month",
//!    "period_start": "Mon, 01 Jan 2024 00:00:00 GMT", "period_end": "...",
//!    "by_category": [{"category_name": "Travel", "total": 70, "count": 2}],
//!    "by_week": [{"week_start": "...", "total": 20}], "by_day": [...], ...}

use anyhow::Result;
use tally_core::{
    CategorySlice, DatedCategoryTotal, DatedTotal, PeriodKind, PeriodSummary, PeriodWindow,
    UNCATEGORIZED,
};
use tracing::{debug, warn};

use super::decode_body;
use crate::decode::Decoder;
use crate::types::{RawDatedTotal, RawSummary};

pub fn parse_summary_json(json: &str) -> Result<PeriodSummary> {
    let dec = Decoder::new()?;
    let raw: RawSummary = decode_body(json, "summary")?;

    let kind = match dec.text(&raw.period) {
        Some(p) => p.parse::<PeriodKind>().unwrap_or_else(|e| {
            warn!(error = %e, "unknown summary period; assuming month");
            PeriodKind::Month
        }),
        None => PeriodKind::default(),
    };

    let window = match (dec.date(&raw.period_start), dec.date(&raw.period_end)) {
        (Some(start), Some(end)) if start <= end => Some(PeriodWindow { start, end }),
        _ => {
            warn!("summary window dates missing or unreadable");
            None
        }
    };

    // Payload order is the display order.
    let by_category: Vec<CategorySlice> = raw
        .by_category
        .iter()
        .map(|c| {
            CategorySlice::new(
                dec.text(&c.category_name).unwrap_or_else(|| UNCATEGORIZED.to_string()),
                dec.amount(&c.total),
                dec.count(&c.count),
            )
        })
        .collect();

    let summary = PeriodSummary {
        kind,
        window,
        total_spent: dec.amount(&raw.total_spent),
        previous_total: dec.amount(&raw.previous_total),
        by_category,
        by_week: dated(&dec, &raw.by_week),
        by_day: dated(&dec, &raw.by_day),
        by_month: dated(&dec, &raw.by_month),
        by_week_category: dated_by_category(&dec, &raw.by_week_category),
        by_day_category: dated_by_category(&dec, &raw.by_day_category),
        by_month_category: dated_by_category(&dec, &raw.by_month_category),
    };
    debug!(kind = %summary.kind, total = summary.total_spent, "parsed summary");
    Ok(summary)
}

/// Buckets with unreadable dates are dropped.
fn dated(dec: &Decoder, rows: &[RawDatedTotal]) -> Vec<DatedTotal> {
    let mut out: Vec<DatedTotal> = rows
        .iter()
        .filter_map(|r| Some(DatedTotal { date: dec.date(&r.date)?, total: dec.amount(&r.total) }))
        .collect();
    out.sort_by_key(|p| p.date);
    out
}

fn dated_by_category(dec: &Decoder, rows: &[RawDatedTotal]) -> Vec<DatedCategoryTotal> {
    let mut out: Vec<DatedCategoryTotal> = rows
        .iter()
        .filter_map(|r| {
            Some(DatedCategoryTotal {
                date: dec.date(&r.date)?,
                category_name: dec.text(&r.category_name).unwrap_or_else(|| UNCATEGORIZED.to_string()),
                total: dec.amount(&r.total),
            })
        })
        .collect();
    out.sort_by_key(|p| p.date);
    out
}
