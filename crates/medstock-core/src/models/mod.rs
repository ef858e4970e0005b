//! Domain models for the medstock system.

mod alert;
mod medicine;
mod metrics;
mod movement;
mod status;

pub use alert::*;
pub use medicine::*;
pub use metrics::*;
pub use movement::*;
pub use status::*;
