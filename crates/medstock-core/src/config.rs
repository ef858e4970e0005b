//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::classifier::DEFAULT_CRITICAL_STOCK_RATIO;
use crate::error::{EngineError, EngineResult};

/// Default look-ahead for "expiring soon".
pub const DEFAULT_EXPIRY_WINDOW_DAYS: u32 = 30;

/// Longest accepted "expiring soon" window (ten years).
pub const MAX_EXPIRY_WINDOW_DAYS: u32 = 3650;

/// Default length of the dashboard alert list.
pub const DEFAULT_TOP_ALERTS: usize = 10;

/// Default lifetime of cached dashboard snapshots (30 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

/// Tunable thresholds for classification and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Days ahead counted as "expiring soon"
    pub expiry_window_days: u32,
    /// Number of alerts kept on the dashboard
    pub top_alerts: usize,
    /// Fraction of the reorder point below which stock is critical
    pub stock_critical_ratio: f64,
    /// Cache lifetime for dashboard snapshots
    pub cache_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            top_alerts: DEFAULT_TOP_ALERTS,
            stock_critical_ratio: DEFAULT_CRITICAL_STOCK_RATIO,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidArgument(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `MEDSTOCK_*` environment variables over the defaults.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("MEDSTOCK_EXPIRY_WINDOW_DAYS") {
            config.expiry_window_days = parse_var("MEDSTOCK_EXPIRY_WINDOW_DAYS", &v)?;
        }
        if let Some(v) = lookup("MEDSTOCK_TOP_ALERTS") {
            config.top_alerts = parse_var("MEDSTOCK_TOP_ALERTS", &v)?;
        }
        if let Some(v) = lookup("MEDSTOCK_STOCK_CRITICAL_RATIO") {
            config.stock_critical_ratio = parse_var("MEDSTOCK_STOCK_CRITICAL_RATIO", &v)?;
        }
        if let Some(v) = lookup("MEDSTOCK_CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_var("MEDSTOCK_CACHE_TTL_SECS", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if !(1..=MAX_EXPIRY_WINDOW_DAYS).contains(&self.expiry_window_days) {
            return Err(EngineError::InvalidArgument(format!(
                "expiry_window_days must be in 1..={}, got {}",
                MAX_EXPIRY_WINDOW_DAYS, self.expiry_window_days
            )));
        }
        if !self.stock_critical_ratio.is_finite()
            || self.stock_critical_ratio <= 0.0
            || self.stock_critical_ratio > 1.0
        {
            return Err(EngineError::InvalidArgument(format!(
                "stock_critical_ratio must be in (0, 1], got {}",
                self.stock_critical_ratio
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> EngineResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidArgument(format!("{} has invalid value {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.expiry_window_days, 30);
        assert_eq!(config.top_alerts, 10);
        assert_eq!(config.stock_critical_ratio, 0.5);
        assert_eq!(config.cache_ttl_secs, 1800);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(r#"{"top_alerts": 5}"#).unwrap();
        assert_eq!(config.top_alerts, 5);
        assert_eq!(config.expiry_window_days, 30);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let err = EngineConfig::from_json(r#"{"stock_critical_ratio": 0}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[test]
    fn test_window_bounds() {
        for json in [r#"{"expiry_window_days": 0}"#, r#"{"expiry_window_days": 100000000}"#] {
            assert!(
                matches!(EngineConfig::from_json(json), Err(EngineError::InvalidArgument(_))),
                "accepted {}",
                json
            );
        }
        let config = EngineConfig::from_json(r#"{"expiry_window_days": 3650}"#).unwrap();
        assert_eq!(config.expiry_window_days, MAX_EXPIRY_WINDOW_DAYS);
    }

    #[test]
    fn test_env_lookup() {
        let vars: HashMap<&str, &str> = [
            ("MEDSTOCK_EXPIRY_WINDOW_DAYS", "60"),
            ("MEDSTOCK_STOCK_CRITICAL_RATIO", "0.25"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.expiry_window_days, 60);
        assert_eq!(config.stock_critical_ratio, 0.25);
        assert_eq!(config.top_alerts, 10);
    }

    #[test]
    fn test_env_bad_number() {
        let result = EngineConfig::from_lookup(|k| {
            (k == "MEDSTOCK_TOP_ALERTS").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }
}
