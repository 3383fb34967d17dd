//! One-shot text dashboard.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::data::HttpSnapshotSource;
use crate::models::Period;
use crate::view::{DashboardView, Page, RetainedEngine};
use crate::visualization::render_dashboard;


/// Run the print command.
///
/// A failed fetch is logged and the empty dashboard is still printed.
pub async fn run(settings: &Settings, period: Option<Period>) -> Result<()> {
    let source = Arc::new(HttpSnapshotSource::new(&settings.endpoint)?);
    let page = Page::from_layout(&settings.layout);
    let mut view = DashboardView::new(source, RetainedEngine::default(), page);

    let period = match period {
        Some(period) => {
            view.fetch_dashboard_data(period.clone()).await;
            period
        }
        None => {
            view.initialize().await;
            Period::default()
        }
    };

    tracing::debug!(
        live = view.engine().live_charts(),
        constructed = view.engine().constructed(),
        "Charts ready"
    );

    print!("{}", render_dashboard(view.page(), view.charts(), &period));
    Ok(())
}
