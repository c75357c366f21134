use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tally_core::PeriodKind;
use tally_core::proportion::{CATEGORY_BAR_BLEND, CHART_BAR_BLEND};
use tally_finance::DashboardConfig;

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardSection,
    pub locale: LocaleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSection {
    /// Period the dashboard opens on
    pub default_period: PeriodKind,
    /// Seam blend of the category bar, in percentage points
    pub category_blend: f64,
    /// Seam blend of stacked chart columns
    pub chart_blend: f64,
    /// Budget alerts shown on the dashboard
    pub alert_count: usize,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            default_period: PeriodKind::Month,
            category_blend: CATEGORY_BAR_BLEND,
            chart_blend: CHART_BAR_BLEND,
            alert_count: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocaleSection {
    /// IANA zone used to decide what "today" is
    pub timezone: String,
}

impl Default for LocaleSection {
    fn default() -> Self {
        Self { timezone: "America/New_York".to_string() }
    }
}

impl Config {
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            category_blend: self.dashboard.category_blend,
            chart_blend: self.dashboard.chart_blend,
            alert_count: self.dashboard.alert_count,
            ..DashboardConfig::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    tally_core::time::parse_timezone(&cfg.locale.timezone)?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config("[dashboard]\ndefault_period = \"week\"\n").unwrap();
        assert_eq!(cfg.dashboard.default_period, PeriodKind::Week);
        assert_eq!(cfg.dashboard.alert_count, 3);
        assert_eq!(cfg.locale.timezone, "America/New_York");
    }

    #[test]
    fn test_bad_timezone_rejected() {
        assert!(parse_config("[locale]\ntimezone = \"Mars/Olympus\"\n").is_err());
    }

    #[test]
    fn test_default_roundtrips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_dashboard_config_mapping() {
        let mut cfg = Config::default();
        cfg.dashboard.alert_count = 5;
        let dc = cfg.dashboard_config();
        assert_eq!(dc.alert_count, 5);
        assert_eq!(dc.category_blend, CATEGORY_BAR_BLEND);
    }
}
