//! Stock movement records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What happened to the stock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Dispensed or used
    Consumed,
    /// Delivered from a supplier
    Received,
    /// Manual stock correction
    Adjusted,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Consumed => "consumed",
            MovementKind::Received => "received",
            MovementKind::Adjusted => "adjusted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consumed" => Some(MovementKind::Consumed),
            "received" => Some(MovementKind::Received),
            "adjusted" => Some(MovementKind::Adjusted),
            _ => None,
        }
    }
}

/// A single stock movement for a medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    pub medicine_id: String,
    pub kind: MovementKind,
    /// Units moved (always non-negative; direction comes from `kind`)
    pub quantity: u32,
    pub occurred_on: NaiveDate,
}

impl StockMovement {
    pub fn consumed(medicine_id: impl Into<String>, quantity: u32, occurred_on: NaiveDate) -> Self {
        Self {
            medicine_id: medicine_id.into(),
            kind: MovementKind::Consumed,
            quantity,
            occurred_on,
        }
    }
}
