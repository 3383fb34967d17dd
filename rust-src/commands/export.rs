//! Export command: write every rendered chart to an image file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::config::Settings;
use crate::data::HttpSnapshotSource;
use crate::models::Period;
use crate::view::{DashboardView, Page, CHART_PLAN};
use crate::visualization::{export_chart_png, export_chart_svg, open_file, SvgEngine};


const DEFAULT_OUTPUT_DIR: &str = "fraudboard-charts";


/// Run the export command.
pub async fn run(
    settings: &Settings,
    period: Option<Period>,
    svg: bool,
    output: Option<PathBuf>,
    should_open: bool,
) -> Result<()> {
    let source = Arc::new(HttpSnapshotSource::new(&settings.endpoint)?);
    let page = Page::from_layout(&settings.layout);
    let mut view = DashboardView::new(source, SvgEngine::default(), page);

    match period {
        Some(period) => {
            println!("Loading dashboard data for period {}...", period);
            view.fetch_dashboard_data(period).await;
        }
        None => {
            println!("Loading dashboard data...");
            view.initialize().await;
        }
    }

    if view.charts().is_empty() {
        bail!("No charts were rendered, nothing to export");
    }

    let output_dir = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let format_type = if svg { "svg" } else { "png" };
    println!("Exporting {} charts to {}...", view.charts().len(), format_type.to_uppercase());

    for plan in &CHART_PLAN {
        let Some(chart) = view.charts().get(plan.canvas_id) else { continue };
        let output_path = output_dir.join(format!("{}.{}", plan.canvas_id, format_type));

        if svg {
            export_chart_svg(chart, &output_path)?;
        } else {
            export_chart_png(chart, &output_path)?;
        }

        println!("\x1b[32m+ Exported to: {}\x1b[0m", output_path.display());
    }

    tracing::info!(
        charts = view.engine().rendered(),
        dir = %output_dir.display(),
        "Export finished"
    );

    if should_open {
        println!("Opening {}...", output_dir.display());
        open_file(&output_dir)?;
    }

    Ok(())
}
