//! Export of rendered charts as SVG or PNG files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::view::chart::spline_control_points;
use crate::view::{ChartEngine, ChartHandle, ChartKind, ChartSpec, Rgba};


// Page colours
const PAGE_BG: &str = "#FFFFFF";
const TEXT: &str = "#333333";
const TEXT_SECONDARY: &str = "#666666";
const GRID: &str = "#E5E5E5";

// Chart geometry (scaled for sharp output)
const SCALE_FACTOR: f64 = 2.0;
const WIDTH: f64 = 480.0 * SCALE_FACTOR;
const HEIGHT: f64 = 280.0 * SCALE_FACTOR;
const MARGIN_LEFT: f64 = 56.0 * SCALE_FACTOR;
const MARGIN_RIGHT: f64 = 16.0 * SCALE_FACTOR;
const MARGIN_TOP: f64 = 44.0 * SCALE_FACTOR;
const MARGIN_BOTTOM: f64 = 36.0 * SCALE_FACTOR;
const GRID_LINES: usize = 5;
const MAX_X_LABELS: usize = 8;


/// Engine that renders every constructed chart straight to SVG markup.
#[derive(Debug, Default)]
pub struct SvgEngine {
    rendered: usize,
}


impl SvgEngine {
    /// Number of charts rendered so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }
}


impl ChartEngine for SvgEngine {
    type Chart = SvgChart;

    fn construct(&mut self, canvas_id: &str, spec: ChartSpec) -> SvgChart {
        self.rendered += 1;
        tracing::debug!(canvas = canvas_id, "Rendering chart to SVG");

        let svg = generate_chart_svg(&spec);
        SvgChart { spec, svg }
    }
}


/// A chart rendered to an SVG document.
#[derive(Debug)]
pub struct SvgChart {
    spec: ChartSpec,
    svg: String,
}


impl SvgChart {
    pub fn svg(&self) -> &str {
        &self.svg
    }
}


impl ChartHandle for SvgChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn destroy(self) {}
}


/// Write a rendered chart as SVG.
pub fn export_chart_svg(chart: &SvgChart, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, chart.svg())
        .with_context(|| format!("Failed to write SVG to {}", output_path.display()))?;

    Ok(())
}


/// Rasterize a rendered chart and write it as PNG.
pub fn export_chart_png(chart: &SvgChart, output_path: &Path) -> Result<()> {
    // Labels are dropped unless system fonts are loaded
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = resvg::usvg::Tree::from_str(chart.svg(), &options)
        .context("Failed to parse SVG")?;

    let size = tree.size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width() as u32, size.height() as u32)
        .context("Failed to create pixmap")?;

    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap.save_png(output_path)
        .with_context(|| format!("Failed to save PNG to {}", output_path.display()))?;

    Ok(())
}


/// Generate a standalone SVG document for one chart.
pub fn generate_chart_svg(spec: &ChartSpec) -> String {
    let plot = PlotArea::new(spec);
    let accent = spec.accent();

    let mut svg_parts = vec![
        format!(
            r#"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"#,
            WIDTH, HEIGHT, WIDTH, HEIGHT
        ),
        "<style>".to_string(),
        format!("  .legend {{ fill: {}; font: {}px sans-serif; }}", TEXT, 12.0 * SCALE_FACTOR),
        format!("  .tick {{ fill: {}; font: {}px sans-serif; }}", TEXT_SECONDARY, 10.0 * SCALE_FACTOR),
        "</style>".to_string(),
        format!(r#"<rect width="{}" height="{}" fill="{}"/>"#, WIDTH, HEIGHT, PAGE_BG),
    ];

    svg_parts.push(legend(spec.title(), accent));
    svg_parts.extend(value_axis(&plot));
    svg_parts.extend(category_axis(spec, &plot));

    match spec.kind {
        ChartKind::Line => svg_parts.extend(line_series(spec, &plot)),
        ChartKind::Bar => svg_parts.extend(bar_series(spec, &plot)),
    }

    svg_parts.push("</svg>".to_string());
    svg_parts.join("\n")
}


/// Mapping from data space to pixel space.
struct PlotArea {
    min: f64,
    max: f64,
    count: usize,
    kind: ChartKind,
}


impl PlotArea {
    fn new(spec: &ChartSpec) -> Self {
        let (min, max) = spec.value_range();
        Self {
            min,
            max,
            count: spec.points().count(),
            kind: spec.kind,
        }
    }

    fn left(&self) -> f64 {
        MARGIN_LEFT
    }

    fn right(&self) -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    fn top(&self) -> f64 {
        MARGIN_TOP
    }

    fn bottom(&self) -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    /// Width of one category slot.
    fn slot_width(&self) -> f64 {
        let slots = match self.kind {
            ChartKind::Bar => self.count,
            ChartKind::Line => self.count.saturating_sub(1),
        };
        (self.right() - self.left()) / slots.max(1) as f64
    }

    /// Horizontal centre of category `index`.
    fn x(&self, index: usize) -> f64 {
        match self.kind {
            ChartKind::Bar => self.left() + self.slot_width() * (index as f64 + 0.5),
            ChartKind::Line if self.count <= 1 => (self.left() + self.right()) / 2.0,
            ChartKind::Line => self.left() + self.slot_width() * index as f64,
        }
    }

    fn y(&self, value: f64) -> f64 {
        let ratio = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        self.bottom() - ratio * (self.bottom() - self.top())
    }
}


/// Legend swatch and dataset label above the plot.
fn legend(title: &str, accent: Rgba) -> String {
    let swatch = 12.0 * SCALE_FACTOR;
    let text_width = title.chars().count() as f64 * 6.5 * SCALE_FACTOR;
    let x = (WIDTH - swatch - 6.0 * SCALE_FACTOR - text_width) / 2.0;
    let y = 14.0 * SCALE_FACTOR;

    format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{}" height="{}" fill="{}" fill-opacity="{}"/><text x="{:.1}" y="{:.1}" class="legend">{}</text>"#,
        x,
        y,
        swatch,
        swatch,
        accent.hex(),
        accent.a,
        x + swatch + 6.0 * SCALE_FACTOR,
        y + swatch - 2.0 * SCALE_FACTOR,
        escape_xml(title)
    )
}


/// Horizontal gridlines with value ticks.
fn value_axis(plot: &PlotArea) -> Vec<String> {
    (0..=GRID_LINES)
        .map(|step| {
            let value = plot.min + (plot.max - plot.min) * step as f64 / GRID_LINES as f64;
            let y = plot.y(value);
            format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1"/><text x="{:.1}" y="{:.1}" class="tick" text-anchor="end">{}</text>"#,
                plot.left(),
                y,
                plot.right(),
                y,
                GRID,
                plot.left() - 6.0 * SCALE_FACTOR,
                y + 4.0 * SCALE_FACTOR,
                tick_label(value)
            )
        })
        .collect()
}


/// Category labels, thinned so at most [`MAX_X_LABELS`] are drawn.
fn category_axis(spec: &ChartSpec, plot: &PlotArea) -> Vec<String> {
    let stride = plot.count.div_ceil(MAX_X_LABELS).max(1);
    let y = plot.bottom() + 16.0 * SCALE_FACTOR;

    spec.points()
        .enumerate()
        .filter(|(i, _)| i % stride == 0)
        .map(|(i, (label, _))| {
            format!(
                r#"<text x="{:.1}" y="{:.1}" class="tick" text-anchor="middle">{}</text>"#,
                plot.x(i),
                y,
                escape_xml(label)
            )
        })
        .collect()
}


/// Smoothed stroke plus translucent area fill down to the baseline.
fn line_series(spec: &ChartSpec, plot: &PlotArea) -> Vec<String> {
    let points: Vec<(f64, f64)> = spec
        .points()
        .enumerate()
        .filter(|(_, (_, value))| value.is_finite())
        .map(|(i, (_, value))| (plot.x(i), plot.y(value)))
        .collect();

    let Some(&(first_x, _)) = points.first() else {
        return Vec::new();
    };
    let last_x = points[points.len() - 1].0;

    let path = curve_path(&points, spec.dataset.tension);
    let baseline = plot.y(plot.min.max(0.0).min(plot.max));
    let border = spec.accent();
    let fill = spec.dataset.background_color;

    let mut parts = Vec::new();
    if spec.dataset.fill {
        parts.push(format!(
            r#"<path d="{} L {:.1} {:.1} L {:.1} {:.1} Z" fill="{}" fill-opacity="{}" stroke="none"/>"#,
            path,
            last_x,
            baseline,
            first_x,
            baseline,
            fill.hex(),
            fill.a
        ));
    }
    parts.push(format!(
        r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}"/>"#,
        path,
        border.hex(),
        border.a,
        2.0 * SCALE_FACTOR
    ));

    parts
}


/// Cubic Bézier path through `points`, straight segments without tension.
fn curve_path(points: &[(f64, f64)], tension: f64) -> String {
    let mut path = format!("M {:.1} {:.1}", points[0].0, points[0].1);

    if points.len() < 3 || tension <= 0.0 {
        for &(x, y) in &points[1..] {
            path.push_str(&format!(" L {:.1} {:.1}", x, y));
        }
        return path;
    }

    let controls = spline_control_points(points, tension);
    for i in 0..points.len() - 1 {
        let (c1, c2, end) = (controls[i].1, controls[i + 1].0, points[i + 1]);
        path.push_str(&format!(
            " C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}",
            c1.0, c1.1, c2.0, c2.1, end.0, end.1
        ));
    }

    path
}


/// One bar per category, rising from the baseline.
fn bar_series(spec: &ChartSpec, plot: &PlotArea) -> Vec<String> {
    let color = spec.dataset.background_color;
    let bar_width = plot.slot_width() * 0.8 * 0.9;
    let baseline = plot.y(0.0);

    spec.points()
        .enumerate()
        .filter(|(_, (_, value))| value.is_finite())
        .map(|(i, (label, value))| {
            let top = plot.y(value);
            format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" fill-opacity="{}"><title>{}: {}</title></rect>"#,
                plot.x(i) - bar_width / 2.0,
                top.min(baseline),
                bar_width,
                (baseline - top).abs(),
                color.hex(),
                color.a,
                escape_xml(label),
                tick_label(value)
            )
        })
        .collect()
}


/// Axis tick text: whole numbers stay whole.
fn tick_label(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}


/// Escape text for use inside SVG markup.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}


/// Open file with default application.
pub fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.to_string_lossy()])
            .spawn()
            .context("Failed to open file")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .context("Failed to open file")?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|d| format!("2024-01-{:02}", d)).collect()
    }

    fn render(spec: ChartSpec) -> SvgChart {
        SvgEngine::default().construct("spendingChart7d", spec)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Rent & <bills>"), "Rent &amp; &lt;bills&gt;");
        assert_eq!(escape_xml("\"a\" 'b'"), "&quot;a&quot; &apos;b&apos;");
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(40.0), "40");
        assert_eq!(tick_label(2.5), "2.5");
    }

    #[test]
    fn test_line_chart_svg() {
        let color = Rgba::new(255, 0, 0, 1.0);
        let chart = render(ChartSpec::line(&labels(4), &[1.0, 4.0, 2.0, 3.0], "Spending (7 days)", color));
        let svg = chart.svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Spending (7 days)"));
        assert!(svg.contains(" C "));
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.2""##));
        assert!(svg.contains(r##"stroke="#ff0000""##));
    }

    #[test]
    fn test_bar_chart_svg() {
        let color = Rgba::new(0, 128, 128, 0.7);
        let chart = render(ChartSpec::bar(&labels(3), &[2.0, 0.0, 5.0], "Fraud Amount (All time)", color));
        let svg = chart.svg();

        assert_eq!(svg.matches("<title>").count(), 3);
        assert!(svg.contains(r##"fill="#008080" fill-opacity="0.7""##));
        assert!(svg.contains("2024-01-03: 5"));
    }

    #[test]
    fn test_x_labels_are_thinned() {
        let color = Rgba::new(0, 0, 255, 1.0);
        let spec = ChartSpec::bar(&labels(30), &[1.0; 30], "Fraud Count (30 days)", color);
        let svg = generate_chart_svg(&spec);

        let drawn = svg.matches(r#"text-anchor="middle""#).count();
        assert!(drawn <= MAX_X_LABELS);
        assert!(drawn > 0);
    }

    #[test]
    fn test_empty_chart_still_renders() {
        let spec = ChartSpec::line(&[], &[], "Spending (All time)", Rgba::new(0, 0, 255, 1.0));
        let svg = generate_chart_svg(&spec);

        assert!(svg.contains("Spending (All time)"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_engine_counts_renders() {
        let mut engine = SvgEngine::default();
        let spec = ChartSpec::bar(&labels(1), &[1.0], "t", Rgba::new(0, 0, 0, 0.7));
        engine.construct("a", spec.clone()).destroy();
        engine.construct("b", spec);

        assert_eq!(engine.rendered(), 2);
    }

    #[test]
    fn test_export_svg_and_png() {
        let temp_dir = TempDir::new().unwrap();
        let chart = render(ChartSpec::line(&labels(3), &[1.0, 2.0, 3.0], "Spending (7 days)", Rgba::new(255, 0, 0, 1.0)));

        let svg_path = temp_dir.path().join("spendingChart7d.svg");
        export_chart_svg(&chart, &svg_path).unwrap();
        assert_eq!(std::fs::read_to_string(&svg_path).unwrap(), chart.svg());

        let png_path = temp_dir.path().join("spendingChart7d.png");
        export_chart_png(&chart, &png_path).unwrap();
        let bytes = std::fs::read(&png_path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
