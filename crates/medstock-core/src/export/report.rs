//! Dashboard report export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregator::{trend_horizon, Aggregator};
use crate::db::{Database, DbResult};
use crate::inventory::RejectedRecord;
use crate::models::{Alert, ConsumptionTrend, DashboardMetrics, DashboardSnapshot};

/// Full dashboard report for one reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Export timestamp
    pub generated_at: String,
    /// Date all relative calculations used
    pub reference_date: NaiveDate,
    /// Summary metrics (top alerts only)
    pub metrics: DashboardMetrics,
    /// Consumption over the trailing window
    pub trend: ConsumptionTrend,
    /// Every alert, ranked
    pub alerts: Vec<Alert>,
    /// Stored records that could not be classified
    pub rejected: Vec<RejectedRecord>,
}

impl DashboardReport {
    /// Assemble a report from a snapshot and the full alert list.
    pub fn new(snapshot: DashboardSnapshot, alerts: Vec<Alert>, rejected: Vec<RejectedRecord>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            reference_date: snapshot.reference_date,
            metrics: snapshot.metrics,
            trend: snapshot.trend,
            alerts,
            rejected,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export alerts to CSV, one row per alert.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("reference_date,priority,kind,level,medicine_id,medicine_name,days_until_expiry,message,recommended_action\n");

        let reference = self.reference_date.format("%Y-%m-%d").to_string();
        for alert in &self.alerts {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                reference,
                alert.priority(),
                alert.kind(),
                alert.level(),
                escape_csv(alert.medicine_id()),
                escape_csv(alert.medicine_name()),
                alert.days_until_expiry().map(|d| d.to_string()).unwrap_or_default(),
                escape_csv(alert.message()),
                escape_csv(alert.recommended_action().unwrap_or("")),
            ));
        }

        csv
    }
}

/// Builds reports from the medicine store.
pub struct ReportExporter<'a> {
    db: &'a Database,
    aggregator: &'a Aggregator,
}

impl<'a> ReportExporter<'a> {
    /// Create a new report exporter.
    pub fn new(db: &'a Database, aggregator: &'a Aggregator) -> Self {
        Self { db, aggregator }
    }

    /// Export the dashboard as of `reference`.
    pub fn export(&self, reference: NaiveDate) -> DbResult<DashboardReport> {
        let load = self.db.list_medicines()?;
        let since = trend_horizon(reference, self.aggregator.config().expiry_window_days);
        let movements = self.db.list_movements_since(since)?;

        let snapshot = self.aggregator.snapshot(&load.medicines, &movements, reference);
        let alerts = self.aggregator.alerts(&load.medicines, reference);

        tracing::info!(
            reference = %reference,
            medicines = load.medicines.len(),
            alerts = alerts.len(),
            rejected = load.rejected.len(),
            "exported dashboard report"
        );

        Ok(DashboardReport::new(snapshot, alerts, load.rejected))
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
