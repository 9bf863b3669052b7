//! Insight engine configuration
//!
//! Thresholds for the insight rules are config-driven.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for an override file (explicit path, else
//!    ~/.local/share/fintrack/config/insights.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Resolved thresholds used by the insight rules
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Category increase (%) above which an anomaly is a warning
    pub anomaly_warning_percent: f64,
    /// Category increase (%) above which an anomaly is critical
    pub anomaly_critical_percent: f64,
    pub savings_critical_rate: f64,
    pub savings_target_rate: f64,
    pub savings_healthy_rate: f64,
    /// Share (%) of monthly expenses that makes a category dominant
    pub dominant_category_share: f64,
    /// Lower-cased substrings marking recurring bills
    pub recurring_keywords: Vec<String>,
    pub goal_savings_multiple: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            anomaly_warning_percent: 50.0,
            anomaly_critical_percent: 100.0,
            savings_critical_rate: 10.0,
            savings_target_rate: 20.0,
            savings_healthy_rate: 30.0,
            dominant_category_share: 40.0,
            recurring_keywords: [
                "subscription",
                "monthly",
                "rent",
                "insurance",
                "emi",
                "netflix",
                "spotify",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            goal_savings_multiple: 2.0,
        }
    }
}

impl InsightConfig {
    /// Load from the default override location, falling back to defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load with an explicit override path (missing file means defaults)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document, layering it over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content, Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.anomaly_warning_percent > self.anomaly_critical_percent {
            return Err(Error::Config(format!(
                "spending_anomaly.warning_percent ({}) exceeds critical_percent ({})",
                self.anomaly_warning_percent, self.anomaly_critical_percent
            )));
        }
        if !(self.savings_critical_rate <= self.savings_target_rate
            && self.savings_target_rate <= self.savings_healthy_rate)
        {
            return Err(Error::Config(
                "savings rates must satisfy critical_rate <= target_rate <= healthy_rate"
                    .to_string(),
            ));
        }
        if self.goal_savings_multiple < 0.0 {
            return Err(Error::Config(
                "goal_recommendation.savings_multiple must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fintrack").join("config").join("insights.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<InsightConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let defaults = parse_config(DEFAULT_CONFIG, InsightConfig::default())?;

    match path {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            tracing::debug!(path = %path.display(), "Loaded insight config override");
            parse_config(&content, defaults)
        }
        _ => Ok(defaults),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    spending_anomaly: Option<RawAnomaly>,
    savings: Option<RawSavings>,
    category_trend: Option<RawCategoryTrend>,
    recurring_bills: Option<RawRecurring>,
    goal_recommendation: Option<RawGoal>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    warning_percent: Option<f64>,
    critical_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSavings {
    critical_rate: Option<f64>,
    target_rate: Option<f64>,
    healthy_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCategoryTrend {
    dominant_share: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecurring {
    keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawGoal {
    savings_multiple: Option<f64>,
}

fn parse_config(content: &str, base: InsightConfig) -> Result<InsightConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Failed to parse insight config: {}", e)))?;

    let mut config = base;

    if let Some(a) = raw.spending_anomaly {
        if let Some(v) = a.warning_percent {
            config.anomaly_warning_percent = v;
        }
        if let Some(v) = a.critical_percent {
            config.anomaly_critical_percent = v;
        }
    }

    if let Some(s) = raw.savings {
        if let Some(v) = s.critical_rate {
            config.savings_critical_rate = v;
        }
        if let Some(v) = s.target_rate {
            config.savings_target_rate = v;
        }
        if let Some(v) = s.healthy_rate {
            config.savings_healthy_rate = v;
        }
    }

    if let Some(v) = raw.category_trend.and_then(|c| c.dominant_share) {
        config.dominant_category_share = v;
    }

    if let Some(keywords) = raw.recurring_bills.and_then(|r| r.keywords) {
        config.recurring_keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
    }

    if let Some(v) = raw.goal_recommendation.and_then(|g| g.savings_multiple) {
        config.goal_savings_multiple = v;
    }

    config.validate()?;
    Ok(config)
}
