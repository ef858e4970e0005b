//! Toast text templates.

use medstock_core::models::{Alert, ExpiryLevel, StockLevel};

/// Title for an expired (or expiring today) medicine.
pub const TITLE_EXPIRED: &str = "Expired medicine";

/// Title for a medicine expiring within the urgent or critical window.
pub const TITLE_EXPIRING: &str = "Medicine expiring soon";

/// Title for a medicine with nothing left.
pub const TITLE_OUT_OF_STOCK: &str = "Out of stock";

/// Title for a medicine that needs restocking.
pub const TITLE_LOW_STOCK: &str = "Stock running low";

/// Generic title for anything else.
pub const TITLE_GENERIC: &str = "Inventory alert";

/// Toast title for an alert.
pub fn toast_title(alert: &Alert) -> &'static str {
    match alert {
        Alert::Expiry { status, .. } => match status.level {
            ExpiryLevel::Expired | ExpiryLevel::ExpiredToday => TITLE_EXPIRED,
            ExpiryLevel::Urgent | ExpiryLevel::Critical => TITLE_EXPIRING,
            ExpiryLevel::Warning | ExpiryLevel::Ok => TITLE_GENERIC,
        },
        Alert::Stock { status, .. } => match status.level {
            StockLevel::OutOfStock => TITLE_OUT_OF_STOCK,
            StockLevel::Critical | StockLevel::Low => TITLE_LOW_STOCK,
            StockLevel::Ok => TITLE_GENERIC,
        },
    }
}

/// Toast body: "<name>: <message>. <action>."
pub fn toast_body(alert: &Alert) -> String {
    match alert.recommended_action() {
        Some(action) => format!("{}: {}. {}.", alert.medicine_name(), alert.message(), action),
        None => format!("{}: {}.", alert.medicine_name(), alert.message()),
    }
}

/// One-line digest of an alert list, e.g. "2 expired, 1 out of stock".
///
/// Returns None when there is nothing to report.
pub fn summary_line(alerts: &[Alert]) -> Option<String> {
    let mut expired = 0;
    let mut expiring = 0;
    let mut out_of_stock = 0;
    let mut low_stock = 0;

    for alert in alerts {
        match alert {
            Alert::Expiry { status, .. } => match status.level {
                ExpiryLevel::Expired | ExpiryLevel::ExpiredToday => expired += 1,
                ExpiryLevel::Ok => {}
                _ => expiring += 1,
            },
            Alert::Stock { status, .. } => match status.level {
                StockLevel::OutOfStock => out_of_stock += 1,
                StockLevel::Ok => {}
                _ => low_stock += 1,
            },
        }
    }

    let parts: Vec<String> = [
        (expired, "expired"),
        (expiring, "expiring soon"),
        (out_of_stock, "out of stock"),
        (low_stock, "low on stock"),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {}", count, label))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::classifier::{classify_expiry_days, classify_stock};

    fn expiry(name: &str, days: i64) -> Alert {
        Alert::Expiry {
            medicine_id: name.to_lowercase(),
            medicine_name: name.into(),
            status: classify_expiry_days(days),
        }
    }

    fn stock(name: &str, qty: u32, reorder: u32) -> Alert {
        Alert::Stock {
            medicine_id: name.to_lowercase(),
            medicine_name: name.into(),
            status: classify_stock(qty, reorder),
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(toast_title(&expiry("Insulin", -2)), TITLE_EXPIRED);
        assert_eq!(toast_title(&expiry("Insulin", 0)), TITLE_EXPIRED);
        assert_eq!(toast_title(&expiry("Insulin", 5)), TITLE_EXPIRING);
        assert_eq!(toast_title(&stock("Insulin", 0, 5)), TITLE_OUT_OF_STOCK);
        assert_eq!(toast_title(&stock("Insulin", 4, 5)), TITLE_LOW_STOCK);
    }

    #[test]
    fn test_body() {
        assert_eq!(
            toast_body(&expiry("Insulin", -2)),
            "Insulin: Expired 2 days ago. Remove from inventory."
        );
        assert_eq!(
            toast_body(&stock("Insulin", 0, 5)),
            "Insulin: Out of stock: 0 of 5 units. Purchase urgently."
        );
    }

    #[test]
    fn test_summary_line() {
        let alerts = vec![
            expiry("A", -1),
            expiry("B", 0),
            stock("C", 0, 5),
            stock("D", 4, 5),
            expiry("E", 60),
        ];
        assert_eq!(
            summary_line(&alerts).as_deref(),
            Some("2 expired, 1 expiring soon, 1 out of stock, 1 low on stock")
        );
        assert_eq!(summary_line(&[]), None);
    }
}
