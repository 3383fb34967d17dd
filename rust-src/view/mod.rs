//! Dashboard view layer: page targets, chart slots, and the refresh logic.

pub mod chart;
mod dashboard;
pub mod page;

pub use chart::{ChartEngine, ChartHandle, ChartKind, ChartSpec, RetainedEngine, Rgba};
pub use dashboard::{DashboardView, RefreshOutcome, RefreshTicket, CHART_PLAN};
pub use page::{Page, Trigger};
