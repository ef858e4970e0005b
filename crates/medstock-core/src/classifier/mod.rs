//! Per-medicine classification.
//!
//! Pure functions mapping a medicine's expiry date and stock levels to typed
//! statuses. No I/O, no logging.

mod expiry;
mod stock;

pub use expiry::*;
pub use stock::*;
