//! Snapshot models for the dashboard-data payload.

mod period;
mod snapshot;

pub use period::Period;
pub use snapshot::{DashboardSnapshot, Metric, Transaction, Window};
