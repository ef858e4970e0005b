//! MedStock Core Library
//!
//! Expiry and stock alert engine for medicine inventories.
//!
//! # Architecture
//!
//! ```text
//! legacy JSON / SQLite rows
//!          │  normalize once (aliases, 0-defaults, strict dates)
//!          ▼
//!   canonical Medicine ──► Classifier ──► Aggregator ──► DashboardMetrics
//!                                              │
//!   StockMovement rows ──► consumption trend ──┘
//!                                              │
//!                    ┌─────────────────────────┼──────────────────┐
//!                    ▼                         ▼                  ▼
//!             FFI facade (+cache)       Report export       Notification
//!                                       (JSON / CSV)          selection
//! ```
//!
//! # Core Principle
//!
//! **The engine is pure.** Classification and aggregation do no I/O, keep no
//! state and never log; every call recomputes from its inputs.
//!
//! # Modules
//!
//! - [`classifier`]: per-medicine expiry and stock classification
//! - [`aggregator`]: ranked alerts, dashboard metrics, consumption trend
//! - [`models`]: Domain types (Medicine, Alert, DashboardMetrics, etc.)
//! - [`inventory`]: datastore boundary and record normalization
//! - [`db`]: SQLite medicine store
//! - [`cache`]: injectable TTL cache for computed snapshots
//! - [`export`]: JSON and CSV dashboard reports
//! - [`config`]: tunable thresholds

pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod inventory;
pub mod models;

// Re-export commonly used types
pub use aggregator::{build_alerts, compute_metrics, consumption_trend, Aggregator};
pub use cache::{Cache, TtlCache};
pub use classifier::{classify_expiry, classify_stock};
pub use config::EngineConfig;
pub use db::Database;
pub use error::{EngineError, EngineResult};
pub use inventory::{parse_inventory_json, InventoryLoad, MedicineSource, RejectedRecord};
pub use models::{
    Alert, ConsumptionTrend, DashboardMetrics, DashboardSnapshot, ExpiryLevel, ExpiryStatus,
    Medicine, MovementKind, StockLevel, StockMovement, StockStatus,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedStockError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<EngineError> for MedStockError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidArgument(msg) => MedStockError::InvalidInput(msg),
            EngineError::InvalidDate(msg) => MedStockError::InvalidDate(msg),
        }
    }
}

impl From<db::DbError> for MedStockError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => MedStockError::NotFound(what),
            db::DbError::InvalidRecord(inner) => inner.into(),
            other => MedStockError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for MedStockError {
    fn from(e: serde_json::Error) -> Self {
        MedStockError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedStockError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedStockError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// `config_json` overrides the default thresholds; missing fields keep
/// their defaults.
#[uniffi::export]
pub fn open_database(
    path: String,
    config_json: Option<String>,
) -> Result<Arc<MedStockCore>, MedStockError> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json)?,
        None => EngineConfig::default(),
    };
    let db = Database::open(&path)?;
    Ok(Arc::new(MedStockCore::with_parts(
        db,
        config,
        Arc::new(TtlCache::<DashboardSnapshot>::new()),
    )))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MedStockCore>, MedStockError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MedStockCore::with_parts(
        db,
        EngineConfig::default(),
        Arc::new(TtlCache::<DashboardSnapshot>::new()),
    )))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe inventory facade for FFI hosts.
#[derive(uniffi::Object)]
pub struct MedStockCore {
    db: Arc<Mutex<Database>>,
    aggregator: Aggregator,
    cache: Arc<dyn Cache<DashboardSnapshot>>,
}

impl MedStockCore {
    /// Assemble a facade from its parts; lets Rust hosts inject their own cache.
    pub fn with_parts(
        db: Database,
        config: EngineConfig,
        cache: Arc<dyn Cache<DashboardSnapshot>>,
    ) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            aggregator: Aggregator::new(config),
            cache,
        }
    }

    fn snapshot(&self, reference: NaiveDate) -> Result<DashboardSnapshot, MedStockError> {
        let db = self.db.lock()?;
        let load = db.list_medicines()?;
        let since = aggregator::trend_horizon(reference, self.aggregator.config().expiry_window_days);
        let movements = db.list_movements_since(since)?;

        let key = cache::snapshot_key(&load.medicines, &movements, reference, self.aggregator.config());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(reference = %reference, "dashboard cache hit");
            return Ok(hit);
        }

        let snapshot = self.aggregator.snapshot(&load.medicines, &movements, reference);
        let ttl = Duration::from_secs(self.aggregator.config().cache_ttl_secs);
        self.cache.set(&key, snapshot.clone(), ttl);
        tracing::debug!(reference = %reference, medicines = load.medicines.len(), "dashboard computed");
        Ok(snapshot)
    }
}

#[uniffi::export]
impl MedStockCore {
    // =========================================================================
    // Medicine Operations
    // =========================================================================

    /// Add or update a medicine.
    pub fn upsert_medicine(&self, medicine: FfiMedicine) -> Result<(), MedStockError> {
        let medicine = Medicine::try_from(medicine)?;
        let db = self.db.lock()?;
        db.upsert_medicine(&medicine)?;
        Ok(())
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: String) -> Result<Option<FfiMedicine>, MedStockError> {
        let db = self.db.lock()?;
        let medicine = db.get_medicine(&id)?;
        Ok(medicine.map(|m| m.into()))
    }

    /// List all medicines that load cleanly.
    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, MedStockError> {
        let db = self.db.lock()?;
        let load = db.list_medicines()?;
        Ok(load.medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Delete a medicine. Returns false if it did not exist.
    pub fn delete_medicine(&self, id: String) -> Result<bool, MedStockError> {
        let db = self.db.lock()?;
        Ok(db.delete_medicine(&id)?)
    }

    /// Import a JSON inventory (array or `{"medicines": [...]}`), including
    /// records in older field layouts.
    pub fn import_inventory_json(&self, json: String) -> Result<FfiImportSummary, MedStockError> {
        let load = parse_inventory_json(&json)?;
        let db = self.db.lock()?;
        for medicine in &load.medicines {
            db.upsert_medicine(medicine)?;
        }

        tracing::info!(
            imported = load.medicines.len(),
            rejected = load.rejected.len(),
            "imported inventory"
        );

        Ok(FfiImportSummary {
            imported: saturating_u32(load.medicines.len()),
            rejected: load.rejected.into_iter().map(|r| r.into()).collect(),
        })
    }

    /// Record a stock movement ("consumed", "received" or "adjusted").
    /// Returns the new quantity on hand.
    pub fn record_movement(
        &self,
        medicine_id: String,
        kind: String,
        quantity: u32,
        occurred_on: Option<String>,
    ) -> Result<u32, MedStockError> {
        let kind = MovementKind::parse(&kind)
            .ok_or_else(|| MedStockError::InvalidInput(format!("unknown movement kind: {}", kind)))?;
        let movement = StockMovement {
            medicine_id,
            kind,
            quantity,
            occurred_on: resolve_reference(occurred_on)?,
        };
        let db = self.db.lock()?;
        Ok(db.apply_movement(&movement)?)
    }

    // =========================================================================
    // Dashboard Operations
    // =========================================================================

    /// All alerts, ranked by priority. `reference_date` defaults to today.
    pub fn get_alerts(&self, reference_date: Option<String>) -> Result<Vec<FfiAlert>, MedStockError> {
        let reference = resolve_reference(reference_date)?;
        let db = self.db.lock()?;
        let load = db.list_medicines()?;
        let alerts = self.aggregator.alerts(&load.medicines, reference);
        Ok(alerts.into_iter().map(|a| a.into()).collect())
    }

    /// Dashboard metrics and consumption trend. `reference_date` defaults to today.
    pub fn get_dashboard(&self, reference_date: Option<String>) -> Result<FfiDashboard, MedStockError> {
        let reference = resolve_reference(reference_date)?;
        Ok(self.snapshot(reference)?.into())
    }

    /// Dashboard snapshot as JSON.
    pub fn get_dashboard_json(&self, reference_date: Option<String>) -> Result<String, MedStockError> {
        let reference = resolve_reference(reference_date)?;
        let snapshot = self.snapshot(reference)?;
        Ok(serde_json::to_string(&snapshot)?)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the full dashboard report as JSON.
    pub fn export_report_json(&self, reference_date: Option<String>) -> Result<String, MedStockError> {
        let reference = resolve_reference(reference_date)?;
        let db = self.db.lock()?;
        let report = export::ReportExporter::new(&db, &self.aggregator).export(reference)?;
        Ok(report.to_json()?)
    }

    /// Export all alerts as CSV.
    pub fn export_report_csv(&self, reference_date: Option<String>) -> Result<String, MedStockError> {
        let reference = resolve_reference(reference_date)?;
        let db = self.db.lock()?;
        let report = export::ReportExporter::new(&db, &self.aggregator).export(reference)?;
        Ok(report.to_csv())
    }
}

/// Parse an optional reference date; None means today.
fn resolve_reference(date: Option<String>) -> Result<NaiveDate, MedStockError> {
    match date {
        Some(raw) => Ok(classifier::parse_expiry_date(&raw)?),
        None => Ok(classifier::today()),
    }
}

/// Counts cross the FFI as u32; larger values saturate.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub quantity_on_hand: u32,
    pub reorder_point: u32,
    /// YYYY-MM-DD
    pub expiration_date: String,
    pub unit_price: f64,
    pub category: Option<String>,
    pub form: Option<String>,
    pub location: Option<String>,
}

impl From<Medicine> for FfiMedicine {
    fn from(med: Medicine) -> Self {
        Self {
            id: med.id,
            name: med.name,
            quantity_on_hand: med.quantity_on_hand,
            reorder_point: med.reorder_point,
            expiration_date: med.expiration_date.format("%Y-%m-%d").to_string(),
            unit_price: med.unit_price,
            category: med.category,
            form: med.form,
            location: med.location,
        }
    }
}

impl TryFrom<FfiMedicine> for Medicine {
    type Error = MedStockError;

    fn try_from(med: FfiMedicine) -> Result<Self, Self::Error> {
        if !med.unit_price.is_finite() || med.unit_price < 0.0 {
            return Err(MedStockError::InvalidInput(format!(
                "unit_price must be a non-negative number, got {}",
                med.unit_price
            )));
        }
        Ok(Medicine {
            expiration_date: classifier::parse_expiry_date(&med.expiration_date)?,
            id: med.id,
            name: med.name,
            quantity_on_hand: med.quantity_on_hand,
            reorder_point: med.reorder_point,
            unit_price: med.unit_price,
            category: med.category,
            form: med.form,
            location: med.location,
        })
    }
}

/// FFI-safe alert.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAlert {
    /// "expiry" or "stock"
    pub kind: String,
    pub medicine_id: String,
    pub medicine_name: String,
    pub level: String,
    pub message: String,
    pub recommended_action: Option<String>,
    pub priority: u32,
    pub days_until_expiry: Option<i64>,
}

impl From<Alert> for FfiAlert {
    fn from(alert: Alert) -> Self {
        Self {
            kind: alert.kind().to_string(),
            level: alert.level().to_string(),
            message: alert.message().to_string(),
            recommended_action: alert.recommended_action().map(str::to_string),
            priority: alert.priority(),
            days_until_expiry: alert.days_until_expiry(),
            medicine_id: alert.medicine_id().to_string(),
            medicine_name: alert.medicine_name().to_string(),
        }
    }
}

/// FFI-safe dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboard {
    pub reference_date: String,
    pub total: u32,
    pub expiring_soon: u32,
    pub low_stock: u32,
    pub expired: u32,
    pub total_value: f64,
    pub top_alerts: Vec<FfiAlert>,
    pub consumed_current_window: u64,
    pub consumed_previous_window: u64,
    pub consumption_change_percent: Option<f64>,
    /// "up", "down" or "flat"
    pub consumption_direction: String,
}

impl From<DashboardSnapshot> for FfiDashboard {
    fn from(snapshot: DashboardSnapshot) -> Self {
        let metrics = snapshot.metrics;
        Self {
            reference_date: snapshot.reference_date.format("%Y-%m-%d").to_string(),
            total: saturating_u32(metrics.total),
            expiring_soon: saturating_u32(metrics.expiring_soon),
            low_stock: saturating_u32(metrics.low_stock),
            expired: saturating_u32(metrics.expired),
            total_value: metrics.total_value,
            top_alerts: metrics.top_alerts.into_iter().map(|a| a.into()).collect(),
            consumed_current_window: snapshot.trend.current_units,
            consumed_previous_window: snapshot.trend.previous_units,
            consumption_change_percent: snapshot.trend.change_percent,
            consumption_direction: snapshot.trend.direction.as_str().to_string(),
        }
    }
}

/// FFI-safe rejected import record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRejectedRecord {
    pub index: u32,
    pub id: Option<String>,
    pub reason: String,
}

impl From<RejectedRecord> for FfiRejectedRecord {
    fn from(record: RejectedRecord) -> Self {
        Self {
            index: saturating_u32(record.index),
            id: record.id,
            reason: record.reason,
        }
    }
}

/// FFI-safe import summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportSummary {
    pub imported: u32,
    pub rejected: Vec<FfiRejectedRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_medicine(id: &str, qty: u32, reorder: u32, expires: &str) -> FfiMedicine {
        FfiMedicine {
            id: id.into(),
            name: format!("Medicine {}", id),
            quantity_on_hand: qty,
            reorder_point: reorder,
            expiration_date: expires.into(),
            unit_price: 2.0,
            category: None,
            form: Some("tablet".into()),
            location: None,
        }
    }

    #[test]
    fn test_medicine_round_trip_through_facade() {
        let core = open_database_in_memory().unwrap();
        core.upsert_medicine(ffi_medicine("m1", 3, 10, "2024-06-11")).unwrap();

        let fetched = core.get_medicine("m1".into()).unwrap().unwrap();
        assert_eq!(fetched.expiration_date, "2024-06-11");
        assert_eq!(core.list_medicines().unwrap().len(), 1);
        assert!(core.delete_medicine("m1".into()).unwrap());
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let core = open_database_in_memory().unwrap();
        let result = core.upsert_medicine(ffi_medicine("m1", 3, 10, "31/02/2024"));
        assert!(matches!(result, Err(MedStockError::InvalidDate(_))));

        let result = core.get_alerts(Some("yesterday".into()));
        assert!(matches!(result, Err(MedStockError::InvalidDate(_))));
    }

    #[test]
    fn test_dashboard_and_alerts() {
        let core = open_database_in_memory().unwrap();
        core.upsert_medicine(ffi_medicine("m1", 3, 10, "2024-06-11")).unwrap();
        core.upsert_medicine(ffi_medicine("m2", 0, 5, "2024-05-27")).unwrap();

        let dashboard = core.get_dashboard(Some("2024-06-01".into())).unwrap();
        assert_eq!(dashboard.total, 2);
        assert_eq!(dashboard.expiring_soon, 1);
        assert_eq!(dashboard.low_stock, 2);
        assert_eq!(dashboard.expired, 1);
        assert_eq!(dashboard.total_value, 6.0);

        let alerts = core.get_alerts(Some("2024-06-01".into())).unwrap();
        let ranked: Vec<(&str, &str)> = alerts
            .iter()
            .map(|a| (a.kind.as_str(), a.level.as_str()))
            .collect();
        assert_eq!(
            ranked,
            vec![
                ("expiry", "expired"),
                ("stock", "out_of_stock"),
                ("stock", "critical"),
                ("expiry", "critical"),
            ]
        );
    }

    #[test]
    fn test_dashboard_reflects_writes() {
        let core = open_database_in_memory().unwrap();
        core.upsert_medicine(ffi_medicine("m1", 20, 10, "2030-01-01")).unwrap();
        let before = core.get_dashboard(Some("2024-06-01".into())).unwrap();
        assert_eq!(before.low_stock, 0);

        let stock = core
            .record_movement("m1".into(), "consumed".into(), 15, Some("2024-05-31".into()))
            .unwrap();
        assert_eq!(stock, 5);

        let after = core.get_dashboard(Some("2024-06-01".into())).unwrap();
        assert_eq!(after.low_stock, 1);
        assert_eq!(after.consumed_current_window, 15);
        assert_eq!(after.consumption_direction, "up");
    }

    #[test]
    fn test_unknown_movement_kind() {
        let core = open_database_in_memory().unwrap();
        let result = core.record_movement("m1".into(), "lost".into(), 1, None);
        assert!(matches!(result, Err(MedStockError::InvalidInput(_))));

        let result = core.record_movement("m1".into(), "consumed".into(), 1, None);
        assert!(matches!(result, Err(MedStockError::NotFound(_))));
    }

    #[test]
    fn test_import_with_rejections() {
        let core = open_database_in_memory().unwrap();
        let summary = core
            .import_inventory_json(
                r#"[{"id": 1, "nombre": "Ibuprofeno", "stock_actual": 4, "fecha_vencimiento": "2025-01-01"},
                    {"id": 2, "nombre": "Sin fecha"}]"#
                    .into(),
            )
            .unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].id.as_deref(), Some("2"));

        let result = core.import_inventory_json("null".into());
        assert!(matches!(result, Err(MedStockError::InvalidInput(_))));
    }

    #[test]
    fn test_counts_saturate_at_u32_max() {
        assert_eq!(saturating_u32(7), 7);
        assert_eq!(saturating_u32(u32::MAX as usize), u32::MAX);
        if let Some(big) = (u32::MAX as usize).checked_add(1) {
            assert_eq!(saturating_u32(big), u32::MAX);
        }

        let summary: FfiRejectedRecord = RejectedRecord {
            index: usize::MAX,
            id: None,
            reason: "bad".into(),
        }
        .into();
        assert_eq!(summary.index, u32::MAX);
    }

    #[test]
    fn test_exports() {
        let core = open_database_in_memory().unwrap();
        core.upsert_medicine(ffi_medicine("m1", 0, 10, "2024-06-11")).unwrap();

        let csv = core.export_report_csv(Some("2024-06-01".into())).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let json = core.export_report_json(Some("2024-06-01".into())).unwrap();
        assert!(json.contains("\"total\": 1"));
    }
}
