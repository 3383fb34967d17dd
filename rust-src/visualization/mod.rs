//! Visualization layer: live terminal dashboard, text output, and chart files.

mod export;
mod terminal;
mod text;

pub use export::{export_chart_png, export_chart_svg, open_file, SvgEngine};
pub use terminal::{draw, trigger_key, Screen};
pub use text::render_dashboard;
