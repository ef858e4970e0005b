//! Toast notifications for inventory alerts.
//!
//! This crate turns the priority-sorted alert list produced by
//! `medstock-core` into a short list of user-facing notifications and hands
//! them to a host-provided [`Notifier`].

pub mod selection;
pub mod templates;

pub use selection::*;
pub use templates::*;
