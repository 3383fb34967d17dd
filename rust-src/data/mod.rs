//! Data access layer for the dashboard-data endpoint.

mod client;
mod error;

pub use client::{HttpSnapshotSource, SnapshotSource};
pub use error::FetchError;
