//! Derived expiry and stock statuses.

use serde::{Deserialize, Serialize};

/// Expiry severity bucket, most severe first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryLevel {
    Expired,
    ExpiredToday,
    Urgent,
    Critical,
    Warning,
    Ok,
}

impl ExpiryLevel {
    /// Sort rank, 1 = most severe.
    pub fn priority(self) -> u32 {
        match self {
            ExpiryLevel::Expired | ExpiryLevel::ExpiredToday => 1,
            ExpiryLevel::Urgent => 2,
            ExpiryLevel::Critical => 3,
            ExpiryLevel::Warning => 4,
            ExpiryLevel::Ok => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExpiryLevel::Expired => "expired",
            ExpiryLevel::ExpiredToday => "expired_today",
            ExpiryLevel::Urgent => "urgent",
            ExpiryLevel::Critical => "critical",
            ExpiryLevel::Warning => "warning",
            ExpiryLevel::Ok => "ok",
        }
    }
}

/// Stock severity bucket, most severe first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Critical,
    Low,
    Ok,
}

impl StockLevel {
    /// Sort rank, 1 = most severe.
    pub fn priority(self) -> u32 {
        match self {
            StockLevel::OutOfStock => 1,
            StockLevel::Critical => 2,
            StockLevel::Low => 3,
            StockLevel::Ok => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "out_of_stock",
            StockLevel::Critical => "critical",
            StockLevel::Low => "low",
            StockLevel::Ok => "ok",
        }
    }
}

/// Expiry classification of a single medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryStatus {
    pub level: ExpiryLevel,
    /// Whole calendar days until expiry (negative = already expired)
    pub days_until_expiry: i64,
    pub message: String,
    /// None only when the level is `Ok`
    pub recommended_action: Option<String>,
    pub priority: u32,
}

/// Stock classification of a single medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockStatus {
    pub level: StockLevel,
    pub message: String,
    /// None only when the level is `Ok`
    pub recommended_action: Option<String>,
    pub priority: u32,
}
