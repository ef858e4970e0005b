//! Dashboard metrics.

use chrono::NaiveDate;

use crate::classifier::{days_until, DEFAULT_CRITICAL_STOCK_RATIO};
use crate::config::{DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_TOP_ALERTS};
use crate::models::{DashboardMetrics, Medicine};

use super::build_alerts_with;

/// Compute metrics with the default window, alert count and stock ratio.
pub fn compute_metrics_default(medicines: &[Medicine], reference: NaiveDate) -> DashboardMetrics {
    compute_metrics(
        medicines,
        reference,
        DEFAULT_EXPIRY_WINDOW_DAYS,
        DEFAULT_TOP_ALERTS,
    )
}

/// Compute dashboard metrics.
///
/// Every count is evaluated independently per medicine, so one item can be
/// both expiring soon and low on stock.
pub fn compute_metrics(
    medicines: &[Medicine],
    reference: NaiveDate,
    window_days: u32,
    top_n: usize,
) -> DashboardMetrics {
    compute_metrics_with(
        medicines,
        reference,
        window_days,
        top_n,
        DEFAULT_CRITICAL_STOCK_RATIO,
    )
}

pub(crate) fn compute_metrics_with(
    medicines: &[Medicine],
    reference: NaiveDate,
    window_days: u32,
    top_n: usize,
    critical_ratio: f64,
) -> DashboardMetrics {
    let window = i64::from(window_days);
    let mut metrics = DashboardMetrics {
        total: medicines.len(),
        ..Default::default()
    };
    let mut value = 0.0;

    for med in medicines {
        let days = days_until(med.expiration_date, reference);
        if days > 0 && days <= window {
            metrics.expiring_soon += 1;
        }
        if days < 0 {
            metrics.expired += 1;
        }
        if med.is_below_reorder_point() {
            metrics.low_stock += 1;
        }
        value += med.stock_value();
    }

    metrics.total_value = round_cents(value);

    let mut alerts = build_alerts_with(medicines, reference, critical_ratio);
    alerts.truncate(top_n);
    metrics.top_alerts = alerts;

    metrics
}

/// Round to two decimal places.
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
