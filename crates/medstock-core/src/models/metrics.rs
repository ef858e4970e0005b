//! Dashboard metrics and consumption trend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::alert::Alert;

/// Aggregate inventory metrics for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    /// Number of medicines scanned
    pub total: usize,
    /// Expiring within the window (already-expired excluded)
    pub expiring_soon: usize,
    /// Below reorder point
    pub low_stock: usize,
    /// Past expiration
    pub expired: usize,
    /// Σ unit_price × quantity_on_hand, rounded to cents
    pub total_value: f64,
    /// Highest-priority alerts
    pub top_alerts: Vec<Alert>,
}

/// Direction of consumption between two consecutive windows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Flat => "flat",
        }
    }
}

/// Units consumed in the trailing window compared with the window before it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionTrend {
    pub window_days: u32,
    pub current_units: u64,
    pub previous_units: u64,
    /// None when nothing was consumed in the previous window
    pub change_percent: Option<f64>,
    pub direction: TrendDirection,
}

/// Everything the dashboard shows for one reference date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub reference_date: NaiveDate,
    pub metrics: DashboardMetrics,
    pub trend: ConsumptionTrend,
}
