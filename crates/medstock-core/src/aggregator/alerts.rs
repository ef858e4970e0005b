//! Alert generation across an inventory.

use chrono::NaiveDate;

use crate::classifier::{classify_expiry_date, classify_stock_with, DEFAULT_CRITICAL_STOCK_RATIO};
use crate::models::{Alert, ExpiryLevel, Medicine, StockLevel};

/// Build the ranked alert list using the default stock ratio.
pub fn build_alerts(medicines: &[Medicine], reference: NaiveDate) -> Vec<Alert> {
    build_alerts_with(medicines, reference, DEFAULT_CRITICAL_STOCK_RATIO)
}

/// Build the ranked alert list.
///
/// Each medicine contributes an expiry alert and/or a stock alert when the
/// respective level is not `Ok`. The result is sorted by priority; equal
/// priorities keep input order.
pub fn build_alerts_with(
    medicines: &[Medicine],
    reference: NaiveDate,
    critical_ratio: f64,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for med in medicines {
        let expiry = classify_expiry_date(med.expiration_date, reference);
        if expiry.level != ExpiryLevel::Ok {
            alerts.push(Alert::Expiry {
                medicine_id: med.id.clone(),
                medicine_name: med.name.clone(),
                status: expiry,
            });
        }

        let stock = classify_stock_with(med.quantity_on_hand, med.reorder_point, critical_ratio);
        if stock.level != StockLevel::Ok {
            alerts.push(Alert::Stock {
                medicine_id: med.id.clone(),
                medicine_name: med.name.clone(),
                status: stock,
            });
        }
    }

    // sort_by_key is stable
    alerts.sort_by_key(Alert::priority);
    alerts
}
