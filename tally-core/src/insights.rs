//! Spending insights derived from a period summary: comparison with the
//! previous period, daily average, peak day/week, merchant breakdowns and
//! chart axis helpers.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::finance::{DatedTotal, MerchantStat, Receipt};
use crate::period::{PeriodKind, PeriodWindow};
use crate::time::finite_or_zero;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "more")]
    More,
    #[serde(rename = "less")]
    Less,
}

/// Spend in this period against the previous one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub difference: f64,
    pub direction: Direction,
}

impl Comparison {
    /// None when there is nothing to compare against.
    pub fn between(current: f64, previous: f64) -> Option<Self> {
        let previous = finite_or_zero(previous);
        if previous == 0.0 {
            return None;
        }
        let diff = finite_or_zero(current) - previous;
        Some(Self {
            difference: diff.abs(),
            direction: if diff > 0.0 { Direction::More } else { Direction::Less },
        })
    }

    /// "You spent $12.50 more than last month"
    pub fn sentence(&self, kind: PeriodKind) -> String {
        let word = match self.direction {
            Direction::More => "more",
            Direction::Less => "less",
        };
        format!("You spent ${:.2} {} than last {}", self.difference, word, kind)
    }
}

/// Average spend per day of the period.
pub fn daily_average(total: f64, kind: PeriodKind, window: &PeriodWindow) -> f64 {
    let days = match kind {
        PeriodKind::Week => 7,
        PeriodKind::Year => 365,
        PeriodKind::Month => window.days(),
    };
    finite_or_zero(total) / days as f64
}

/// The first point whose total beats every earlier one (and zero).
pub fn highest(points: &[DatedTotal]) -> Option<&DatedTotal> {
    let mut best: Option<&DatedTotal> = None;
    for p in points {
        let bar = best.map_or(0.0, |b| b.total);
        if p.total > bar {
            best = Some(p);
        }
    }
    best
}

/// Spend at one merchant inside a drill-down
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MerchantTotal {
    /// None for receipts without a merchant name
    pub name: Option<String>,
    pub total: f64,
}

impl MerchantTotal {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unlisted merchant")
    }
}

/// Totals per store, biggest first; ties keep first-seen order.
pub fn merchant_breakdown(receipts: &[Receipt]) -> Vec<MerchantTotal> {
    let mut out: Vec<MerchantTotal> = Vec::new();
    for r in receipts {
        let name = r
            .store_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        match out.iter_mut().find(|m| m.name == name) {
            Some(m) => m.total += finite_or_zero(r.total_amount),
            None => out.push(MerchantTotal { name, total: finite_or_zero(r.total_amount) }),
        }
    }
    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}

/// Most-spent and most-visited stores from a top-merchants list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MerchantHighlights<'a> {
    pub most_spent: &'a MerchantStat,
    pub most_visited: &'a MerchantStat,
}

impl MerchantHighlights<'_> {
    pub fn same_store(&self) -> bool {
        self.most_spent.store_name == self.most_visited.store_name
    }
}

/// `merchants` is expected in total-spent order, as the API returns it.
pub fn merchant_highlights(merchants: &[MerchantStat]) -> Option<MerchantHighlights<'_>> {
    let most_spent = merchants.first()?;
    let most_visited = merchants
        .iter()
        .fold(most_spent, |top, m| if m.visit_count > top.visit_count { m } else { top });
    Some(MerchantHighlights { most_spent, most_visited })
}

/// Seven daily totals starting at `monday`, zero where there was no spend.
pub fn full_week(daily: &[DatedTotal], monday: NaiveDate) -> Vec<DatedTotal> {
    (0..7)
        .map(|i| {
            let date = monday + Duration::days(i);
            let total = daily
                .iter()
                .find(|d| d.date == date)
                .map_or(0.0, |d| finite_or_zero(d.total));
            DatedTotal { date, total }
        })
        .collect()
}

/// Round axis ticks (steps of 1, 2 or 5 times a power of ten) from 0 up to
/// at least `max_value`.
pub fn grid_ticks(max_value: f64, target_count: u32) -> Vec<i64> {
    if !max_value.is_finite() || max_value <= 0.0 || target_count == 0 {
        return vec![0];
    }
    let raw_step = max_value / f64::from(target_count);
    // Ticks are whole dollars, so steps never go below 1.
    let magnitude = 10f64.powi(raw_step.log10().floor() as i32).max(1.0);
    let normalized = raw_step / magnitude;
    let nice_step = if normalized <= 1.0 {
        magnitude
    } else if normalized <= 2.0 {
        2.0 * magnitude
    } else if normalized <= 5.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    };

    let mut ticks = Vec::new();
    let mut v = 0.0;
    while v <= max_value + nice_step * 0.01 {
        ticks.push(v.round() as i64);
        v += nice_step;
    }
    if let Some(&last) = ticks.last() {
        if (last as f64) < max_value {
            ticks.push(last + nice_step.round() as i64);
        }
    }
    ticks
}

/// Axis label: "$950", "$1.5k", "$2k".
pub fn compact_dollars(value: i64) -> String {
    if value >= 1000 {
        if value % 1000 == 0 {
            format!("${}k", value / 1000)
        } else {
            format!("${:.1}k", value as f64 / 1000.0)
        }
    } else {
        format!("${value}")
    }
}
