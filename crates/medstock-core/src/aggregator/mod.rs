//! Inventory-wide aggregation.
//!
//! Pipeline: Medicines → Classifier (per item) → ranked alerts + metrics

mod alerts;
mod metrics;
mod trend;

pub use alerts::*;
pub use metrics::*;
pub use trend::*;

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::models::{Alert, DashboardMetrics, DashboardSnapshot, Medicine, StockMovement};

/// Aggregator bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: EngineConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked alerts for the whole inventory.
    pub fn alerts(&self, medicines: &[Medicine], reference: NaiveDate) -> Vec<Alert> {
        build_alerts_with(medicines, reference, self.config.stock_critical_ratio)
    }

    /// Dashboard metrics using the configured window and alert count.
    pub fn metrics(&self, medicines: &[Medicine], reference: NaiveDate) -> DashboardMetrics {
        compute_metrics_with(
            medicines,
            reference,
            self.config.expiry_window_days,
            self.config.top_alerts,
            self.config.stock_critical_ratio,
        )
    }

    /// Metrics plus consumption trend for one reference date.
    pub fn snapshot(
        &self,
        medicines: &[Medicine],
        movements: &[StockMovement],
        reference: NaiveDate,
    ) -> DashboardSnapshot {
        DashboardSnapshot {
            reference_date: reference,
            metrics: self.metrics(medicines, reference),
            trend: consumption_trend(movements, reference, self.config.expiry_window_days),
        }
    }
}
