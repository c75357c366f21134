//! Lenient field decoding shared by the payload parsers.
//!
//! The API hands back amounts as numbers or numeric strings (MySQL DECIMAL
//! columns serialize as strings) and dates in several shapes depending on the
//! column type:
//!   2024-01-15
//!   2024-01-15T09:30:00Z / 2024-01-15 09:30:00
//!   Mon, 15 Jan 2024 00:00:00 GMT
//!   01/15/2024

use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;

/// Holds the compiled patterns; build once per payload.
pub struct Decoder {
    iso_prefix: Regex,
    us_date: Regex,
}

impl Decoder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            iso_prefix: Regex::new(r"^\s*(?P<y>\d{4})-(?P<m>\d{1,2})-(?P<d>\d{1,2})(?:$|[T\s])")?,
            us_date: Regex::new(r"^\s*(?P<m>\d{1,2})/(?P<d>\d{1,2})/(?P<y>\d{4})\s*$")?,
        })
    }

    /// Amount from a number, numeric string, or null. Anything else, or a
    /// non-finite value, is 0.
    pub fn amount(&self, v: &Value) -> f64 {
        let x = match v {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
            _ => 0.0,
        };
        if x.is_finite() { x } else { 0.0 }
    }

    /// Like `amount`, but keeps "absent" distinct from 0.
    pub fn opt_amount(&self, v: &Value) -> Option<f64> {
        match v {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            other => Some(self.amount(other)),
        }
    }

    /// Non-negative whole count, saturating.
    pub fn count(&self, v: &Value) -> u32 {
        let x = self.amount(v);
        if x <= 0.0 { 0 } else { x.min(f64::from(u32::MAX)) as u32 }
    }

    /// Integer id from a number or numeric string.
    pub fn id(&self, v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Truthy flag: true, 1, "1", "true".
    pub fn flag(&self, v: &Value) -> bool {
        match v {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
            Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
            _ => false,
        }
    }

    /// Trimmed non-empty string.
    pub fn text(&self, v: &Value) -> Option<String> {
        match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Calendar date from any of the shapes the API emits; None if it
    /// cannot be read.
    pub fn date(&self, v: &Value) -> Option<NaiveDate> {
        match v {
            Value::String(s) => self.parse_date(s),
            _ => None,
        }
    }

    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        if let Some(caps) = self.iso_prefix.captures(raw) {
            return ymd(&caps["y"], &caps["m"], &caps["d"]);
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw.trim()) {
            return Some(dt.date_naive());
        }
        if let Some(caps) = self.us_date.captures(raw) {
            return ymd(&caps["y"], &caps["m"], &caps["d"]);
        }
        None
    }
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}
