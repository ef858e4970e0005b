//! Alert selection and dispatch.

use std::collections::HashSet;

use medstock_core::models::Alert;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::templates::{toast_body, toast_title};

/// Notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

fn default_max_priority() -> u32 {
    1
}

fn default_max_notifications() -> usize {
    3
}

fn default_one_per_medicine() -> bool {
    true
}

/// Which alerts become user-facing notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    /// Highest (least urgent) priority that still notifies.
    #[serde(default = "default_max_priority")]
    pub max_priority: u32,
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
    /// Skip further alerts for a medicine that already produced one.
    #[serde(default = "default_one_per_medicine")]
    pub one_per_medicine: bool,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            max_priority: default_max_priority(),
            max_notifications: default_max_notifications(),
            one_per_medicine: default_one_per_medicine(),
        }
    }
}

impl NotificationPolicy {
    pub fn validate(&self) -> NotifyResult<()> {
        if self.max_priority == 0 {
            return Err(NotifyError::InvalidPolicy(
                "max_priority must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a policy from JSON. Missing fields take their defaults.
pub fn parse_policy(json: &str) -> NotifyResult<NotificationPolicy> {
    let policy: NotificationPolicy = serde_json::from_str(json)?;
    policy.validate()?;
    Ok(policy)
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn from_priority(priority: u32) -> Self {
        match priority {
            0 | 1 => Severity::Error,
            2 | 3 => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A notification ready to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub medicine_id: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub priority: u32,
}

impl Notification {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            medicine_id: alert.medicine_id().to_string(),
            title: toast_title(alert).to_string(),
            body: toast_body(alert),
            severity: Severity::from_priority(alert.priority()),
            priority: alert.priority(),
        }
    }
}

/// Pick notifications from a priority-sorted alert list.
///
/// Input order is preserved.
pub fn select_notifications(alerts: &[Alert], policy: &NotificationPolicy) -> Vec<Notification> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected = Vec::new();

    for alert in alerts {
        if selected.len() >= policy.max_notifications {
            break;
        }
        if alert.priority() > policy.max_priority {
            continue;
        }
        if policy.one_per_medicine && !seen.insert(alert.medicine_id()) {
            continue;
        }
        selected.push(Notification::from_alert(alert));
    }

    selected
}

/// Delivers notifications to the host (toast, push, log, ...).
pub trait Notifier {
    fn notify(&mut self, notification: &Notification) -> NotifyResult<()>;
}

/// Select and deliver notifications. Returns the number delivered.
///
/// Stops at the first delivery failure.
pub fn dispatch<N: Notifier + ?Sized>(
    alerts: &[Alert],
    policy: &NotificationPolicy,
    notifier: &mut N,
) -> NotifyResult<usize> {
    let selected = select_notifications(alerts, policy);
    debug!(
        alerts = alerts.len(),
        selected = selected.len(),
        "selected notifications"
    );

    for (delivered, notification) in selected.iter().enumerate() {
        if let Err(e) = notifier.notify(notification) {
            warn!(
                medicine_id = %notification.medicine_id,
                delivered,
                error = %e,
                "notification delivery failed"
            );
            return Err(e);
        }
    }

    info!(count = selected.len(), "notifications dispatched");
    Ok(selected.len())
}

/// Notifier that keeps everything it receives. Useful for hosts without a
/// toast surface and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub delivered: Vec<Notification>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notification: &Notification) -> NotifyResult<()> {
        self.delivered.push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::classifier::{classify_expiry_days, classify_stock};

    fn expiry(id: &str, days: i64) -> Alert {
        Alert::Expiry {
            medicine_id: id.into(),
            medicine_name: format!("Medicine {}", id),
            status: classify_expiry_days(days),
        }
    }

    fn stock(id: &str, qty: u32, reorder: u32) -> Alert {
        Alert::Stock {
            medicine_id: id.into(),
            medicine_name: format!("Medicine {}", id),
            status: classify_stock(qty, reorder),
        }
    }

    struct FailingNotifier {
        fail_after: usize,
        calls: usize,
    }

    impl Notifier for FailingNotifier {
        fn notify(&mut self, _notification: &Notification) -> NotifyResult<()> {
            if self.calls == self.fail_after {
                return Err(NotifyError::Delivery("toast surface unavailable".into()));
            }
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = NotificationPolicy::default();
        assert_eq!(policy.max_priority, 1);
        assert_eq!(policy.max_notifications, 3);
        assert!(policy.one_per_medicine);
    }

    #[test]
    fn test_parse_policy_defaults_missing_fields() {
        let policy = parse_policy(r#"{"max_priority": 3}"#).unwrap();
        assert_eq!(policy.max_priority, 3);
        assert_eq!(policy.max_notifications, 3);
        assert!(policy.one_per_medicine);

        assert_eq!(parse_policy("{}").unwrap(), NotificationPolicy::default());
    }

    #[test]
    fn test_parse_policy_rejects_invalid() {
        assert!(matches!(
            parse_policy(r#"{"max_priority": 0}"#),
            Err(NotifyError::InvalidPolicy(_))
        ));
        assert!(matches!(parse_policy("not json"), Err(NotifyError::Json(_))));
    }

    #[test]
    fn test_severity_from_priority() {
        assert_eq!(Severity::from_priority(1), Severity::Error);
        assert_eq!(Severity::from_priority(2), Severity::Warning);
        assert_eq!(Severity::from_priority(3), Severity::Warning);
        assert_eq!(Severity::from_priority(4), Severity::Info);
        assert_eq!(Severity::from_priority(5), Severity::Info);
    }

    #[test]
    fn test_select_one_per_medicine() {
        // m1 is expired and out of stock: only the first alert notifies.
        let alerts = vec![expiry("m1", -5), stock("m1", 0, 5), expiry("m2", 0)];
        let selected = select_notifications(&alerts, &NotificationPolicy::default());

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].medicine_id, "m1");
        assert_eq!(selected[0].title, "Expired medicine");
        assert_eq!(selected[1].medicine_id, "m2");
        assert!(selected.iter().all(|n| n.severity == Severity::Error));
    }

    #[test]
    fn test_select_respects_priority_and_cap() {
        let alerts = vec![
            expiry("m1", -1),
            stock("m2", 0, 5),
            expiry("m3", -3),
            expiry("m4", -4),
            expiry("m5", 5),
        ];
        let selected = select_notifications(&alerts, &NotificationPolicy::default());
        let ids: Vec<&str> = selected.iter().map(|n| n.medicine_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);

        let policy = NotificationPolicy {
            max_priority: 2,
            max_notifications: 10,
            one_per_medicine: false,
        };
        let selected = select_notifications(&alerts, &policy);
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[4].severity, Severity::Warning);
    }

    #[test]
    fn test_dispatch_records() {
        let alerts = vec![expiry("m1", -5), stock("m1", 0, 5), expiry("m2", 0)];
        let mut notifier = RecordingNotifier::default();

        let count = dispatch(&alerts, &NotificationPolicy::default(), &mut notifier).unwrap();
        assert_eq!(count, 2);
        assert_eq!(notifier.delivered.len(), 2);
        assert_eq!(
            notifier.delivered[1].body,
            "Medicine m2: Expires today. Use today or remove from inventory."
        );
    }

    #[test]
    fn test_dispatch_stops_on_failure() {
        let alerts = vec![expiry("m1", -5), expiry("m2", -1), expiry("m3", 0)];
        let mut notifier = FailingNotifier {
            fail_after: 1,
            calls: 0,
        };

        let result = dispatch(&alerts, &NotificationPolicy::default(), &mut notifier);
        assert!(matches!(result, Err(NotifyError::Delivery(_))));
        assert_eq!(notifier.calls, 1);
    }
}
