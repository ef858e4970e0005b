//! Alerts produced by the aggregator.

use serde::{Deserialize, Serialize};

use super::status::{ExpiryStatus, StockStatus};

/// A prioritized alert about one medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// Expiry-based alert
    Expiry {
        medicine_id: String,
        medicine_name: String,
        status: ExpiryStatus,
    },
    /// Stock-level alert
    Stock {
        medicine_id: String,
        medicine_name: String,
        status: StockStatus,
    },
}

impl Alert {
    pub fn priority(&self) -> u32 {
        match self {
            Alert::Expiry { status, .. } => status.priority,
            Alert::Stock { status, .. } => status.priority,
        }
    }

    pub fn medicine_id(&self) -> &str {
        match self {
            Alert::Expiry { medicine_id, .. } | Alert::Stock { medicine_id, .. } => medicine_id,
        }
    }

    pub fn medicine_name(&self) -> &str {
        match self {
            Alert::Expiry { medicine_name, .. } | Alert::Stock { medicine_name, .. } => {
                medicine_name
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Alert::Expiry { status, .. } => &status.message,
            Alert::Stock { status, .. } => &status.message,
        }
    }

    pub fn recommended_action(&self) -> Option<&str> {
        match self {
            Alert::Expiry { status, .. } => status.recommended_action.as_deref(),
            Alert::Stock { status, .. } => status.recommended_action.as_deref(),
        }
    }

    /// Tag of the alert variant ("expiry" or "stock").
    pub fn kind(&self) -> &'static str {
        match self {
            Alert::Expiry { .. } => "expiry",
            Alert::Stock { .. } => "stock",
        }
    }

    /// Severity bucket name of the underlying status.
    pub fn level(&self) -> &'static str {
        match self {
            Alert::Expiry { status, .. } => status.level.as_str(),
            Alert::Stock { status, .. } => status.level.as_str(),
        }
    }

    /// Days until expiry, for expiry alerts.
    pub fn days_until_expiry(&self) -> Option<i64> {
        match self {
            Alert::Expiry { status, .. } => Some(status.days_until_expiry),
            Alert::Stock { .. } => None,
        }
    }
}
