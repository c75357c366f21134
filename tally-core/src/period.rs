//! Period windows: week/month/year granularity, signed offsets from the
//! current period, and navigation bounded by the oldest/newest receipt.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::{first_of_month, inclusive_days, monday_of};

/// Calendar granularity for analytics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PeriodKind {
    #[serde(rename = "week")]
    Week,
    #[default]
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 3] = [PeriodKind::Week, PeriodKind::Month, PeriodKind::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
            PeriodKind::Year => "year",
        }
    }

    fn index(&self) -> usize {
        match self {
            PeriodKind::Week => 0,
            PeriodKind::Month => 1,
            PeriodKind::Year => 2,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "w" => Ok(PeriodKind::Week),
            "month" | "monthly" | "m" => Ok(PeriodKind::Month),
            "year" | "yearly" | "y" => Ok(PeriodKind::Year),
            other => Err(format!("unknown period: {other} (expected week, month or year)")),
        }
    }
}

/// Inclusive calendar window `[start, end]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Window for `offset` periods away from the one containing `today`.
///
/// Falls back to the current period when the shifted window would leave
/// chrono's representable range.
pub fn resolve_window(kind: PeriodKind, offset: i32, today: NaiveDate) -> PeriodWindow {
    shifted_window(kind, offset, today).unwrap_or_else(|| {
        tracing::warn!(%kind, offset, "period offset out of calendar range; using current period");
        current_window(kind, today)
    })
}

fn current_window(kind: PeriodKind, today: NaiveDate) -> PeriodWindow {
    match shifted_window(kind, 0, today) {
        Some(w) => w,
        None => PeriodWindow { start: today, end: today },
    }
}

fn shifted_window(kind: PeriodKind, offset: i32, today: NaiveDate) -> Option<PeriodWindow> {
    match kind {
        PeriodKind::Week => {
            let start = monday_of(today).checked_add_signed(Duration::weeks(i64::from(offset)))?;
            let end = start.checked_add_signed(Duration::days(6))?;
            Some(PeriodWindow { start, end })
        }
        PeriodKind::Month => {
            let first = first_of_month(today);
            let months = Months::new(offset.unsigned_abs());
            let start = if offset >= 0 {
                first.checked_add_months(months)?
            } else {
                first.checked_sub_months(months)?
            };
            let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
            Some(PeriodWindow { start, end })
        }
        PeriodKind::Year => {
            let year = today.year().checked_add(offset)?;
            let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
            let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
            Some(PeriodWindow { start, end })
        }
    }
}

/// Signed number of periods from the one containing `today` to the one
/// containing `date` (negative when `date` is in the past).
pub fn period_offset(kind: PeriodKind, date: NaiveDate, today: NaiveDate) -> i32 {
    let raw: i64 = match kind {
        PeriodKind::Week => (monday_of(date) - monday_of(today)).num_weeks(),
        PeriodKind::Month => {
            i64::from(date.year() - today.year()) * 12 + i64::from(date.month()) - i64::from(today.month())
        }
        PeriodKind::Year => i64::from(date.year()) - i64::from(today.year()),
    };
    raw.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Inclusive range of navigable offsets for one period kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OffsetBounds {
    pub min_offset: i32,
    pub max_offset: i32,
}

impl OffsetBounds {
    /// Bounds when there is no data: only the current period.
    pub const ZERO: OffsetBounds = OffsetBounds { min_offset: 0, max_offset: 0 };

    pub fn clamp(&self, offset: i32) -> i32 {
        offset.clamp(self.min_offset, self.max_offset)
    }

    pub fn contains(&self, offset: i32) -> bool {
        self.min_offset <= offset && offset <= self.max_offset
    }
}

/// Offset bounds derived from the oldest and newest receipt dates.
///
/// Either date missing means "no data" and both bounds collapse to 0.
pub fn compute_offset_bounds(
    kind: PeriodKind,
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
    today: NaiveDate,
) -> OffsetBounds {
    match (oldest, newest) {
        (Some(oldest), Some(newest)) => {
            let a = period_offset(kind, oldest, today);
            let b = period_offset(kind, newest, today);
            OffsetBounds { min_offset: a.min(b), max_offset: a.max(b) }
        }
        _ => OffsetBounds::ZERO,
    }
}

/// The period currently shown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PeriodSelection {
    pub kind: PeriodKind,
    pub offset: i32,
}

impl PeriodSelection {
    pub fn new(kind: PeriodKind, offset: i32) -> Self {
        Self { kind, offset }
    }

    pub fn window(&self, today: NaiveDate) -> PeriodWindow {
        resolve_window(self.kind, self.offset, today)
    }

    /// The period immediately before this one, used for comparisons.
    pub fn previous(&self) -> PeriodSelection {
        Self { kind: self.kind, offset: self.offset.saturating_sub(1) }
    }
}

/// Holds the current selection and the per-kind bounds, which are computed
/// once and reused for the navigator's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodNavigator {
    selection: PeriodSelection,
    bounds: [OffsetBounds; 3],
}

impl PeriodNavigator {
    /// Start on `kind`, positioned at its latest data.
    pub fn new(
        kind: PeriodKind,
        oldest: Option<NaiveDate>,
        newest: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let bounds = PeriodKind::ALL.map(|k| compute_offset_bounds(k, oldest, newest, today));
        let selection = PeriodSelection::new(kind, bounds[kind.index()].max_offset);
        Self { selection, bounds }
    }

    pub fn selection(&self) -> PeriodSelection {
        self.selection
    }

    pub fn bounds(&self) -> OffsetBounds {
        self.bounds_for(self.selection.kind)
    }

    pub fn bounds_for(&self, kind: PeriodKind) -> OffsetBounds {
        self.bounds[kind.index()]
    }

    /// Switch granularity and jump to that kind's latest data.
    pub fn set_kind(&mut self, kind: PeriodKind) {
        self.selection = PeriodSelection::new(kind, self.bounds_for(kind).max_offset);
    }

    /// Move to `offset`, clamped into bounds. Returns whether the offset changed.
    pub fn set_offset(&mut self, offset: i32) -> bool {
        let next = self.bounds().clamp(offset);
        let moved = next != self.selection.offset;
        self.selection.offset = next;
        moved
    }

    pub fn can_go_back(&self) -> bool {
        self.selection.offset > self.bounds().min_offset
    }

    pub fn can_go_forward(&self) -> bool {
        self.selection.offset < self.bounds().max_offset
    }

    /// One period earlier; no-op at the lower bound.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.selection.offset -= 1;
        true
    }

    /// One period later; no-op at the upper bound.
    pub fn go_forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.selection.offset += 1;
        true
    }

    pub fn window(&self, today: NaiveDate) -> PeriodWindow {
        self.selection.window(today)
    }
}

/// Human label for a window: "Jan 1 - Jan 7, 2024", "January 2024", "2024".
pub fn period_label(kind: PeriodKind, window: &PeriodWindow) -> String {
    match kind {
        PeriodKind::Week => format!(
            "{} - {}",
            window.start.format("%b %-d"),
            window.end.format("%b %-d, %Y")
        ),
        PeriodKind::Month => window.start.format("%B %Y").to_string(),
        PeriodKind::Year => window.start.year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::days_in_month;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_window() {
        let today = d(2024, 3, 15);
        let w = resolve_window(PeriodKind::Month, 0, today);
        assert_eq!(w, PeriodWindow { start: d(2024, 3, 1), end: d(2024, 3, 31) });

        let prev = resolve_window(PeriodKind::Month, -1, today);
        assert_eq!(prev, PeriodWindow { start: d(2024, 2, 1), end: d(2024, 2, 29) });

        let wrap = resolve_window(PeriodKind::Month, -3, today);
        assert_eq!(wrap, PeriodWindow { start: d(2023, 12, 1), end: d(2023, 12, 31) });

        let next = resolve_window(PeriodKind::Month, 10, today);
        assert_eq!(next.start, d(2025, 1, 1));
    }

    #[test]
    fn test_month_window_from_month_end() {
        // Shifting from the 31st must not skip short months
        let today = d(2024, 1, 31);
        let w = resolve_window(PeriodKind::Month, 1, today);
        assert_eq!(w, PeriodWindow { start: d(2024, 2, 1), end: d(2024, 2, 29) });
    }

    #[test]
    fn test_week_window_is_monday_aligned() {
        let today = d(2024, 1, 17); // Wednesday
        let w = resolve_window(PeriodKind::Week, 0, today);
        assert_eq!(w, PeriodWindow { start: d(2024, 1, 15), end: d(2024, 1, 21) });

        let back = resolve_window(PeriodKind::Week, -3, today);
        assert_eq!(back.start, d(2023, 12, 25));
        assert_eq!(back.days(), 7);
    }

    #[test]
    fn test_year_window() {
        let w = resolve_window(PeriodKind::Year, -1, d(2024, 6, 1));
        assert_eq!(w, PeriodWindow { start: d(2023, 1, 1), end: d(2023, 12, 31) });
        assert_eq!(w.days(), 365);
        assert_eq!(resolve_window(PeriodKind::Year, 0, d(2024, 6, 1)).days(), 366);
    }

    #[test]
    fn test_window_lengths_across_offsets() {
        let today = d(2024, 5, 9);
        for offset in -30..=30 {
            let w = resolve_window(PeriodKind::Week, offset, today);
            assert!(w.start <= w.end);
            assert_eq!(w.days(), 7);

            let m = resolve_window(PeriodKind::Month, offset, today);
            assert!(m.start <= m.end);
            assert_eq!(m.days(), i64::from(days_in_month(m.start.year(), m.start.month())));

            let y = resolve_window(PeriodKind::Year, offset, today);
            let expected = if NaiveDate::from_ymd_opt(y.start.year(), 2, 29).is_some() { 366 } else { 365 };
            assert_eq!(y.days(), expected);
        }
    }

    #[test]
    fn test_out_of_range_offset_falls_back() {
        let today = d(2024, 5, 9);
        let w = resolve_window(PeriodKind::Year, i32::MAX, today);
        assert_eq!(w, resolve_window(PeriodKind::Year, 0, today));
    }

    #[test]
    fn test_offset_bounds() {
        let today = d(2024, 3, 15);
        let oldest = Some(d(2023, 11, 20));
        let newest = Some(d(2024, 2, 3));

        let month = compute_offset_bounds(PeriodKind::Month, oldest, newest, today);
        assert_eq!(month, OffsetBounds { min_offset: -4, max_offset: -1 });

        let year = compute_offset_bounds(PeriodKind::Year, oldest, newest, today);
        assert_eq!(year, OffsetBounds { min_offset: -1, max_offset: 0 });

        // Mondays: today's week starts 2024-03-11, newest's week 2024-01-29
        let week = compute_offset_bounds(PeriodKind::Week, oldest, newest, today);
        assert_eq!(week.max_offset, -6);
        assert_eq!(week.min_offset, -16);
    }

    #[test]
    fn test_no_data_collapses_bounds() {
        let today = d(2024, 3, 15);
        for kind in PeriodKind::ALL {
            assert_eq!(compute_offset_bounds(kind, None, None, today), OffsetBounds::ZERO);
            assert_eq!(compute_offset_bounds(kind, None, Some(today), today), OffsetBounds::ZERO);
        }
        let nav = PeriodNavigator::new(PeriodKind::Month, None, None, today);
        assert_eq!(nav.selection().offset, 0);
        assert!(!nav.can_go_back());
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn test_switching_kind_jumps_to_latest() {
        let today = d(2024, 3, 15);
        let mut nav = PeriodNavigator::new(
            PeriodKind::Month,
            Some(d(2022, 7, 4)),
            Some(d(2023, 10, 2)),
            today,
        );
        assert_eq!(nav.selection().offset, -5);

        for kind in [PeriodKind::Year, PeriodKind::Week, PeriodKind::Month] {
            nav.go_back();
            nav.set_kind(kind);
            assert_eq!(nav.selection().kind, kind);
            assert_eq!(nav.selection().offset, nav.bounds_for(kind).max_offset);
        }
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let today = d(2024, 3, 15);
        let mut nav = PeriodNavigator::new(
            PeriodKind::Month,
            Some(d(2024, 1, 10)),
            Some(d(2024, 3, 1)),
            today,
        );
        assert_eq!(nav.bounds(), OffsetBounds { min_offset: -2, max_offset: 0 });
        assert!(!nav.can_go_forward());
        assert!(!nav.go_forward());
        assert_eq!(nav.selection().offset, 0);

        assert!(nav.go_back());
        assert!(nav.go_back());
        assert!(!nav.go_back());
        assert_eq!(nav.selection().offset, -2);

        assert!(nav.set_offset(40));
        assert_eq!(nav.selection().offset, 0);
        assert!(!nav.set_offset(0));
    }

    #[test]
    fn test_previous_selection() {
        let sel = PeriodSelection::new(PeriodKind::Week, -2);
        assert_eq!(sel.previous(), PeriodSelection::new(PeriodKind::Week, -3));
    }

    #[test]
    fn test_period_labels() {
        let today = d(2024, 1, 3);
        let week = resolve_window(PeriodKind::Week, 0, today);
        assert_eq!(period_label(PeriodKind::Week, &week), "Jan 1 - Jan 7, 2024");
        let month = resolve_window(PeriodKind::Month, 0, today);
        assert_eq!(period_label(PeriodKind::Month, &month), "January 2024");
        let year = resolve_window(PeriodKind::Year, 0, today);
        assert_eq!(period_label(PeriodKind::Year, &year), "2024");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Week".parse::<PeriodKind>().unwrap(), PeriodKind::Week);
        assert_eq!(" year ".parse::<PeriodKind>().unwrap(), PeriodKind::Year);
        assert!("quarter".parse::<PeriodKind>().is_err());
    }
}
