//! Dashboard configuration file support.
//!
//! Configuration is read from a `dashboard.toml` file. Every section and field
//! has a default, so an empty file (or no file at all) yields the stock
//! dashboard. A handful of settings can be overridden from the environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, DashboardResult};
use crate::routes::journey::SortDirection;
use crate::services::segmentation::ChangePoint;

/// Environment variable overriding `timeline.tick_count`.
pub const ENV_TICK_COUNT: &str = "IMPRESSION_TICK_COUNT";
/// Environment variable overriding `timeline.change_point`.
pub const ENV_CHANGE_POINT: &str = "IMPRESSION_CHANGE_POINT";
/// Environment variable overriding `query.max_days`.
pub const ENV_MAX_DAYS: &str = "IMPRESSION_MAX_DAYS";

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub daily: DailyConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub table: TableConfig,
}

/// Sparkline timeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default)]
    pub change_point: ChangePoint,
}

/// Treatment colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Fixed colours for well-known treatment labels
    #[serde(default = "default_known_colors")]
    pub known: BTreeMap<String, String>,
    /// Secondary palette handed out to other labels in first-seen order
    #[serde(default = "default_extra_colors")]
    pub extra: Vec<String>,
    /// Shared colour once `extra` is exhausted
    #[serde(default = "default_overflow_color")]
    pub overflow: String,
}

/// Daily volume chart settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConfig {
    #[serde(default = "default_daily_tick_count")]
    pub tick_count: usize,
}

/// Environment summary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_summary_colors")]
    pub colors: Vec<String>,
}

/// Journey query limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_min_key_len")]
    pub min_key_len: usize,
    #[serde(default = "default_min_days")]
    pub min_days: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

/// Initial sort of the journey table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_sort_column")]
    pub default_column: String,
    #[serde(default = "default_sort_direction")]
    pub default_direction: SortDirection,
}

fn default_tick_count() -> usize {
    5
}

fn default_known_colors() -> BTreeMap<String, String> {
    [("off", "#dc5b62"), ("on", "#8cadd3"), ("control", "#2d2c2f")]
        .into_iter()
        .map(|(label, color)| (label.to_string(), color.to_string()))
        .collect()
}

fn default_extra_colors() -> Vec<String> {
    ["#be9cc1", "#ead3ae", "#f7d000", "#ffa64f", "#f88f58"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub(crate) fn default_overflow_color() -> String {
    "#d9afca".to_string()
}

fn default_daily_tick_count() -> usize {
    7
}

fn default_top_n() -> usize {
    25
}

fn default_summary_colors() -> Vec<String> {
    [
        "#8cadd3", "#dc5b62", "#be9cc1", "#ead3ae", "#f7d000", "#ffa64f", "#f88f58", "#d9afca",
        "#2d2c2f",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_min_key_len() -> usize {
    2
}

fn default_min_days() -> u32 {
    1
}

fn default_max_days() -> u32 {
    90
}

fn default_sort_column() -> String {
    "utc".to_string()
}

fn default_sort_direction() -> SortDirection {
    SortDirection::Desc
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            tick_count: default_tick_count(),
            change_point: ChangePoint::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            known: default_known_colors(),
            extra: default_extra_colors(),
            overflow: default_overflow_color(),
        }
    }
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            tick_count: default_daily_tick_count(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            colors: default_summary_colors(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_key_len: default_min_key_len(),
            min_days: default_min_days(),
            max_days: default_max_days(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_column: default_sort_column(),
            default_direction: default_sort_direction(),
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> DashboardResult<Self> {
        let config: DashboardConfig = toml::from_str(content).map_err(|e| {
            DashboardError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DashboardError::Configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `dashboard.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists in any of them.
    pub fn from_default_location() -> DashboardResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }

        Ok(None)
    }

    /// Resolve the effective configuration: the explicit file if given, else the
    /// default location, else built-in defaults; environment overrides last.
    pub fn load(path: Option<&Path>) -> DashboardResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `IMPRESSION_*` environment overrides.
    ///
    /// # Environment Variables
    /// - `IMPRESSION_TICK_COUNT`: sparkline axis tick count
    /// - `IMPRESSION_CHANGE_POINT`: `last_sighting` | `next_impression`
    /// - `IMPRESSION_MAX_DAYS`: upper bound of the journey query timespan
    pub fn apply_env_overrides(&mut self) -> DashboardResult<()> {
        if let Ok(raw) = env::var(ENV_TICK_COUNT) {
            self.timeline.tick_count = raw.trim().parse().map_err(|_| {
                DashboardError::Configuration(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_TICK_COUNT, raw
                ))
            })?;
        }

        if let Ok(raw) = env::var(ENV_CHANGE_POINT) {
            self.timeline.change_point = raw
                .parse()
                .map_err(|e: String| DashboardError::Configuration(e))?;
        }

        if let Ok(raw) = env::var(ENV_MAX_DAYS) {
            self.query.max_days = raw.trim().parse().map_err(|_| {
                DashboardError::Configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_DAYS, raw
                ))
            })?;
        }

        self.validate()
    }

    fn validate(&self) -> DashboardResult<()> {
        if self.query.min_days > self.query.max_days {
            return Err(DashboardError::Configuration(format!(
                "query.min_days ({}) exceeds query.max_days ({})",
                self.query.min_days, self.query.max_days
            )));
        }
        if self.summary.colors.is_empty() {
            return Err(DashboardError::Configuration(
                "summary.colors must list at least one colour".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.timeline.tick_count, 5);
        assert_eq!(config.timeline.change_point, ChangePoint::LastSighting);
        assert_eq!(config.palette.extra.len(), 5);
        assert_eq!(config.palette.known["off"], "#dc5b62");
        assert_eq!(config.daily.tick_count, 7);
        assert_eq!(config.summary.top_n, 25);
        assert_eq!(config.query.max_days, 90);
        assert_eq!(config.table.default_column, "utc");
        assert_eq!(config.table.default_direction, SortDirection::Desc);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r##"
[timeline]
tick_count = 7
change_point = "next_impression"

[palette]
extra = ["#111111", "#222222"]

[query]
max_days = 30
"##;

        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timeline.tick_count, 7);
        assert_eq!(config.timeline.change_point, ChangePoint::NextImpression);
        assert_eq!(config.palette.extra, vec!["#111111", "#222222"]);
        // untouched fields keep their defaults
        assert_eq!(config.palette.overflow, "#d9afca");
        assert_eq!(config.palette.known.len(), 3);
        assert_eq!(config.query.min_days, 1);
        assert_eq!(config.query.max_days, 30);
    }

    #[test]
    fn test_known_colors_override() {
        let toml = r##"
[palette.known]
off = "#000000"
holdout = "#ffffff"
"##;

        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.palette.known.len(), 2);
        assert_eq!(config.palette.known["holdout"], "#ffffff");
        assert!(!config.palette.known.contains_key("on"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = DashboardConfig::from_toml_str("[timeline\ntick_count = ");
        assert!(matches!(result, Err(DashboardError::Configuration(_))));
    }

    #[test]
    fn test_invalid_change_point() {
        let toml = r#"
[timeline]
change_point = "sometimes"
"#;
        assert!(DashboardConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_inverted_day_limits_rejected() {
        let toml = r#"
[query]
min_days = 10
max_days = 5
"#;
        let err = DashboardConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("min_days"));
    }

    #[test]
    fn test_missing_file() {
        let result = DashboardConfig::from_file("/nonexistent/dashboard.toml");
        assert!(matches!(result, Err(DashboardError::Configuration(_))));
    }
}
