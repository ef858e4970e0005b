//! Consumption trend over consecutive windows.

use chrono::{Duration, NaiveDate};

use crate::classifier::days_until;
use crate::models::{ConsumptionTrend, MovementKind, StockMovement, TrendDirection};

/// Earliest movement date that can affect a trend over `window_days`.
///
/// Clamps to `NaiveDate::MIN` instead of overflowing.
pub fn trend_horizon(reference: NaiveDate, window_days: u32) -> NaiveDate {
    reference
        .checked_sub_signed(Duration::days(2 * i64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Compare units consumed in `(reference - window, reference]` with the
/// window immediately before it.
pub fn consumption_trend(
    movements: &[StockMovement],
    reference: NaiveDate,
    window_days: u32,
) -> ConsumptionTrend {
    let window = i64::from(window_days);
    let mut current_units: u64 = 0;
    let mut previous_units: u64 = 0;

    for movement in movements.iter().filter(|m| m.kind == MovementKind::Consumed) {
        let age = days_until(reference, movement.occurred_on);
        if age < 0 {
            continue; // after the reference date
        }
        if age < window {
            current_units += u64::from(movement.quantity);
        } else if age < 2 * window {
            previous_units += u64::from(movement.quantity);
        }
    }

    let change_percent = (previous_units > 0).then(|| {
        let change = (current_units as f64 - previous_units as f64) / previous_units as f64;
        (change * 1000.0).round() / 10.0
    });

    let direction = match current_units.cmp(&previous_units) {
        std::cmp::Ordering::Greater => TrendDirection::Up,
        std::cmp::Ordering::Less => TrendDirection::Down,
        std::cmp::Ordering::Equal => TrendDirection::Flat,
    };

    ConsumptionTrend {
        window_days,
        current_units,
        previous_units,
        change_percent,
        direction,
    }
}
