//! Category proportions for the stacked spending bar: cumulative percentage
//! shares, feathered gradient stops, and pointer hit-testing.

use serde::{Deserialize, Serialize};

use crate::finance::CategorySlice;
use crate::palette::category_color;
use crate::time::round_half_up;

/// Seam blend for the horizontal category bar, in percentage points.
pub const CATEGORY_BAR_BLEND: f64 = 3.0;
/// Seam blend for stacked chart columns.
pub const CHART_BAR_BLEND: f64 = 2.0;

/// One category's segment of the bar, in percent of the total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Share {
    pub category: String,
    pub pct: f64,
    pub start_pct: f64,
    pub end_pct: f64,
    pub total: f64,
    pub count: u32,
}

impl Share {
    /// Whole-number percent for labels.
    pub fn display_pct(&self) -> i64 {
        round_half_up(self.pct) as i64
    }
}

/// Lay slices out left to right in the order given.
///
/// Returns nothing when `total` is not a positive finite number or there are
/// no slices.
pub fn build_shares(slices: &[CategorySlice], total: f64) -> Vec<Share> {
    if slices.is_empty() || !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }

    let mut cursor = 0.0;
    slices
        .iter()
        .map(|slice| {
            let amount = if slice.total.is_finite() { slice.total } else { 0.0 };
            let pct = amount * 100.0 / total;
            let start_pct = cursor;
            let end_pct = cursor + pct;
            cursor = end_pct;
            Share {
                category: slice.category_name.clone(),
                pct,
                start_pct,
                end_pct,
                total: amount,
                count: slice.count,
            }
        })
        .collect()
}

/// A colour stop: the category whose colour applies, and where
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradientStop {
    pub color_key: String,
    pub position_pct: f64,
}

/// Two stops per segment, pulled `blend_width` inward at every inner seam so
/// neighbouring colours feather. The outer edges sit at 0 and 100.
pub fn build_gradient_stops(shares: &[Share], blend_width: f64) -> Vec<GradientStop> {
    let blend = if blend_width.is_finite() { blend_width.max(0.0) } else { 0.0 };
    let last = shares.len().saturating_sub(1);
    let mut stops = Vec::with_capacity(shares.len() * 2);

    for (i, share) in shares.iter().enumerate() {
        let lead = if i == 0 {
            0.0
        } else {
            (share.start_pct + blend).min(share.end_pct)
        };
        let trail = if i == last {
            100.0
        } else {
            (share.end_pct - blend).max(share.start_pct)
        };
        stops.push(GradientStop { color_key: share.category.clone(), position_pct: lead });
        stops.push(GradientStop { color_key: share.category.clone(), position_pct: trail.max(lead) });
    }

    stops
}

/// The segment under `position_pct`: `[start, end)`, with the last segment
/// closed at 100.
pub fn share_at(shares: &[Share], position_pct: f64) -> Option<&Share> {
    if !(0.0..=100.0).contains(&position_pct) {
        return None;
    }
    let (last, rest) = shares.split_last()?;
    rest.iter()
        .find(|s| s.start_pct <= position_pct && position_pct < s.end_pct)
        .or_else(|| (position_pct >= last.start_pct).then_some(last))
}

/// Horizontal anchor for a segment's tooltip, kept off the bar's ends.
pub fn tooltip_anchor(share: &Share) -> f64 {
    (share.start_pct + share.pct / 2.0).clamp(10.0, 90.0)
}

/// Gradient direction for CSS output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    ToRight,
    ToTop,
}

impl GradientDirection {
    fn as_css(&self) -> &'static str {
        match self {
            GradientDirection::ToRight => "to right",
            GradientDirection::ToTop => "to top",
        }
    }
}

/// Render stops as a CSS `linear-gradient(...)`, or None for an empty track.
pub fn css_linear_gradient(stops: &[GradientStop], direction: GradientDirection) -> Option<String> {
    if stops.is_empty() {
        return None;
    }
    let parts: Vec<String> = stops
        .iter()
        .map(|s| format!("{} {:.1}%", category_color(&s.color_key).hex, s.position_pct))
        .collect();
    Some(format!("linear-gradient({}, {})", direction.as_css(), parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices(totals: &[(&str, f64)]) -> Vec<CategorySlice> {
        totals.iter().map(|(n, t)| CategorySlice::new(*n, *t, 1)).collect()
    }

    #[test]
    fn test_two_way_split() {
        let shares = build_shares(&slices(&[("Shopping", 30.0), ("Travel", 70.0)]), 100.0);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].start_pct, 0.0);
        assert_eq!(shares[0].end_pct, 30.0);
        assert_eq!(shares[1].start_pct, 30.0);
        assert_eq!(shares[1].end_pct, 100.0);
        let sum: f64 = shares.iter().map(|s| s.pct).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_input_order_preserved() {
        let shares = build_shares(&slices(&[("Small", 5.0), ("Big", 90.0), ("Mid", 5.0)]), 100.0);
        let names: Vec<_> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Small", "Big", "Mid"]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(build_shares(&[], 0.0).is_empty());
        assert!(build_shares(&slices(&[("A", 10.0)]), 0.0).is_empty());
        assert!(build_shares(&slices(&[("A", 10.0)]), -5.0).is_empty());
        assert!(build_shares(&slices(&[("A", 10.0)]), f64::NAN).is_empty());
        assert!(build_gradient_stops(&[], CATEGORY_BAR_BLEND).is_empty());
        assert_eq!(css_linear_gradient(&[], GradientDirection::ToRight), None);
    }

    #[test]
    fn test_gradient_seams_are_feathered() {
        let shares = build_shares(
            &slices(&[("Shopping", 30.0), ("Travel", 50.0), ("Health", 20.0)]),
            100.0,
        );
        let stops = build_gradient_stops(&shares, 3.0);
        let positions: Vec<f64> = stops.iter().map(|s| s.position_pct).collect();
        assert_eq!(positions, vec![0.0, 27.0, 33.0, 77.0, 83.0, 100.0]);
        assert_eq!(stops[0].color_key, "Shopping");
        assert_eq!(stops[5].color_key, "Health");
        // stops never go backwards
        for w in positions.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_blend_clamped_inside_narrow_segment() {
        let shares = build_shares(&slices(&[("A", 49.0), ("B", 2.0), ("C", 49.0)]), 100.0);
        let stops = build_gradient_stops(&shares, 3.0);
        // B spans [49, 51]; both its stops stay inside that segment
        assert!((stops[2].position_pct - 51.0).abs() < 1e-9);
        assert!((stops[3].position_pct - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_segment_spans_track() {
        let shares = build_shares(&slices(&[("Travel", 12.0)]), 12.0);
        let stops = build_gradient_stops(&shares, 3.0);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].position_pct, 0.0);
        assert_eq!(stops[1].position_pct, 100.0);
    }

    #[test]
    fn test_hit_testing() {
        let shares = build_shares(&slices(&[("Shopping", 30.0), ("Travel", 70.0)]), 100.0);
        assert_eq!(share_at(&shares, 0.0).unwrap().category, "Shopping");
        assert_eq!(share_at(&shares, 29.99).unwrap().category, "Shopping");
        assert_eq!(share_at(&shares, 30.0).unwrap().category, "Travel");
        assert_eq!(share_at(&shares, 100.0).unwrap().category, "Travel");
        assert!(share_at(&shares, 100.5).is_none());
        assert!(share_at(&shares, -1.0).is_none());
        assert!(share_at(&[], 50.0).is_none());
    }

    #[test]
    fn test_tooltip_anchor() {
        let shares = build_shares(&slices(&[("A", 4.0), ("B", 40.0), ("C", 56.0)]), 100.0);
        assert_eq!(tooltip_anchor(&shares[0]), 10.0);
        assert_eq!(tooltip_anchor(&shares[1]), 24.0);
        assert_eq!(tooltip_anchor(&shares[2]), 72.0);
    }

    #[test]
    fn test_css_output() {
        let shares = build_shares(&slices(&[("Shopping", 50.0), ("Travel", 50.0)]), 100.0);
        let css = css_linear_gradient(&build_gradient_stops(&shares, 3.0), GradientDirection::ToRight).unwrap();
        assert_eq!(
            css,
            "linear-gradient(to right, #ee6c4d 0.0%, #ee6c4d 47.0%, #FC913A 53.0%, #FC913A 100.0%)"
        );
    }

    #[test]
    fn test_shares_are_pure() {
        let input = slices(&[("A", 1.0 / 3.0), ("B", 2.0 / 3.0)]);
        let a = build_shares(&input, 1.0);
        let b = build_shares(&input, 1.0);
        assert_eq!(a, b);
        assert_eq!(build_gradient_stops(&a, 2.0), build_gradient_stops(&b, 2.0));
    }
}
