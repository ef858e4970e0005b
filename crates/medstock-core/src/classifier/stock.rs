//! Stock level classification.

use crate::models::{StockLevel, StockStatus};

/// Fraction of the reorder point below which stock is critical.
pub const DEFAULT_CRITICAL_STOCK_RATIO: f64 = 0.5;

/// Classify stock using the default critical ratio.
pub fn classify_stock(quantity_on_hand: u32, reorder_point: u32) -> StockStatus {
    classify_stock_with(quantity_on_hand, reorder_point, DEFAULT_CRITICAL_STOCK_RATIO)
}

/// Classify stock against a reorder point.
///
/// A reorder point of 0 means the item is never restocked proactively, so any
/// positive quantity is `Ok`. `critical_ratio` is clamped to [0, 1]; a
/// non-finite ratio falls back to the default.
pub fn classify_stock_with(
    quantity_on_hand: u32,
    reorder_point: u32,
    critical_ratio: f64,
) -> StockStatus {
    let critical_ratio = if critical_ratio.is_finite() {
        critical_ratio.clamp(0.0, 1.0)
    } else {
        DEFAULT_CRITICAL_STOCK_RATIO
    };

    let (level, message, action) = if quantity_on_hand == 0 {
        (
            StockLevel::OutOfStock,
            format!("Out of stock: 0 of {} units", reorder_point),
            Some("Purchase urgently"),
        )
    } else if reorder_point == 0 {
        (
            StockLevel::Ok,
            format!("In stock: {} units", quantity_on_hand),
            None,
        )
    } else if f64::from(quantity_on_hand) / f64::from(reorder_point.max(1)) < critical_ratio {
        (
            StockLevel::Critical,
            format!("Critical stock: {} of {} units", quantity_on_hand, reorder_point),
            Some("Restock soon"),
        )
    } else if quantity_on_hand < reorder_point {
        (
            StockLevel::Low,
            format!("Low stock: {} of {} units", quantity_on_hand, reorder_point),
            Some("Restock"),
        )
    } else {
        (
            StockLevel::Ok,
            format!("In stock: {} units", quantity_on_hand),
            None,
        )
    };

    StockStatus {
        level,
        message,
        recommended_action: action.map(str::to_string),
        priority: level.priority(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_stock() {
        let status = classify_stock(0, 10);
        assert_eq!(status.level, StockLevel::OutOfStock);
        assert_eq!(status.priority, 1);
        assert_eq!(status.recommended_action.as_deref(), Some("Purchase urgently"));
    }

    #[test]
    fn test_zero_reorder_point() {
        assert_eq!(classify_stock(5, 0).level, StockLevel::Ok);
        assert_eq!(classify_stock(0, 0).level, StockLevel::OutOfStock);
        // Even an aggressive ratio cannot make an unmanaged item critical.
        assert_eq!(classify_stock_with(1, 0, 2.0).level, StockLevel::Ok);
    }

    #[test]
    fn test_out_of_range_ratio_is_clamped() {
        assert_eq!(classify_stock_with(15, 10, 2.0).level, StockLevel::Ok);
        assert_eq!(classify_stock_with(10, 10, 2.0).level, StockLevel::Ok);
        assert_eq!(classify_stock_with(9, 10, 2.0).level, StockLevel::Critical);
        assert_eq!(classify_stock_with(1, 10, -1.0).level, StockLevel::Low);
        assert_eq!(classify_stock_with(4, 10, f64::NAN).level, StockLevel::Critical);
    }

    #[test]
    fn test_critical_below_half() {
        let status = classify_stock(4, 10);
        assert_eq!(status.level, StockLevel::Critical);
        assert_eq!(status.priority, 2);
        assert_eq!(status.message, "Critical stock: 4 of 10 units");
    }

    #[test]
    fn test_exactly_half_is_low() {
        let status = classify_stock(5, 10);
        assert_eq!(status.level, StockLevel::Low);
        assert_eq!(status.priority, 3);
        assert_eq!(status.message, "Low stock: 5 of 10 units");
    }

    #[test]
    fn test_exactly_at_reorder_point_is_ok() {
        let status = classify_stock(10, 10);
        assert_eq!(status.level, StockLevel::Ok);
        assert_eq!(status.priority, 5);
        assert!(status.recommended_action.is_none());
    }

    #[test]
    fn test_custom_ratio() {
        assert_eq!(classify_stock_with(5, 10, 0.6).level, StockLevel::Critical);
        assert_eq!(classify_stock_with(3, 10, 0.25).level, StockLevel::Low);
    }
}
