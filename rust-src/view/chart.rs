//! Chart descriptions, the engine seam, and the per-view slot registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;


/// Alpha of the area fill under a line chart.
pub const FILL_ALPHA: f32 = 0.2;

/// Curve smoothing applied to line charts.
pub const LINE_TENSION: f64 = 0.3;


/// Accent colour with alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}


impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour at fill transparency.
    pub fn translucent(self) -> Self {
        Self { a: FILL_ALPHA, ..self }
    }

    /// Composite over an opaque background, for surfaces without alpha.
    pub fn blend_over(self, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let alpha = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
        (
            mix(self.r, background.0),
            mix(self.g, background.1),
            mix(self.b, background.2),
        )
    }

    /// `#rrggbb` without alpha.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}


impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}


/// Single series drawn by a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Option<Rgba>,
    pub background_color: Rgba,
    pub fill: bool,
    pub tension: f64,
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub begin_at_zero: bool,
    pub legend_top: bool,
}


impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            begin_at_zero: true,
            legend_top: true,
        }
    }
}


/// Engine-independent description of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
    pub options: ChartOptions,
}


impl ChartSpec {
    /// Smoothed line with a translucent area fill.
    pub fn line(labels: &[String], data: &[f64], title: &str, color: Rgba) -> Self {
        Self {
            kind: ChartKind::Line,
            labels: labels.to_vec(),
            dataset: Dataset {
                label: title.to_string(),
                data: data.to_vec(),
                border_color: Some(color),
                background_color: color.translucent(),
                fill: true,
                tension: LINE_TENSION,
            },
            options: ChartOptions::default(),
        }
    }

    /// Solid bars in the accent colour.
    pub fn bar(labels: &[String], data: &[f64], title: &str, color: Rgba) -> Self {
        Self {
            kind: ChartKind::Bar,
            labels: labels.to_vec(),
            dataset: Dataset {
                label: title.to_string(),
                data: data.to_vec(),
                border_color: None,
                background_color: color,
                fill: false,
                tension: 0.0,
            },
            options: ChartOptions::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.dataset.label
    }

    /// Colour the chart is recognised by: the line stroke or the bar fill.
    pub fn accent(&self) -> Rgba {
        self.dataset.border_color.unwrap_or(self.dataset.background_color)
    }

    /// Label/value pairs over the common prefix of labels and data.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.dataset.data.iter().copied())
    }

    /// Lower and upper bound of the value axis.
    pub fn value_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (_, value) in self.points().filter(|(_, v)| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }

        if !min.is_finite() {
            return (0.0, 1.0);
        }
        if self.options.begin_at_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        if max <= min {
            max = min + 1.0;
        }

        (min, max)
    }
}


/// Bézier control points for smoothing a polyline.
///
/// Returns `(before, after)` control points for every input point.
pub fn spline_control_points(points: &[(f64, f64)], tension: f64) -> Vec<((f64, f64), (f64, f64))> {
    let last = points.len().saturating_sub(1);

    points
        .iter()
        .enumerate()
        .map(|(i, &current)| {
            let previous = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];

            let d01 = distance(previous, current);
            let d12 = distance(current, next);
            let total = d01 + d12;
            let (s01, s12) = if total > 0.0 { (d01 / total, d12 / total) } else { (0.0, 0.0) };

            let fa = tension * s01;
            let fb = tension * s12;
            let dx = next.0 - previous.0;
            let dy = next.1 - previous.1;

            (
                (current.0 - fa * dx, current.1 - fa * dy),
                (current.0 + fb * dx, current.1 + fb * dy),
            )
        })
        .collect()
}


/// Sample a smoothed curve through `points` with `steps` samples per segment.
pub fn smooth_polyline(points: &[(f64, f64)], tension: f64, steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || tension <= 0.0 || steps == 0 {
        return points.to_vec();
    }

    let controls = spline_control_points(points, tension);
    let mut sampled = Vec::with_capacity((points.len() - 1) * steps + 1);
    sampled.push(points[0]);

    for i in 0..points.len() - 1 {
        let (p0, p3) = (points[i], points[i + 1]);
        let (p1, p2) = (controls[i].1, controls[i + 1].0);

        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let u = 1.0 - t;
            let x = u * u * u * p0.0 + 3.0 * u * u * t * p1.0 + 3.0 * u * t * t * p2.0 + t * t * t * p3.0;
            let y = u * u * u * p0.1 + 3.0 * u * u * t * p1.1 + 3.0 * u * t * t * p2.1 + t * t * t * p3.1;
            sampled.push((x, y));
        }
    }

    sampled
}


fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}


/// A live chart bound to a canvas.
pub trait ChartHandle {
    fn spec(&self) -> &ChartSpec;

    /// Release the chart and whatever drawing resources it holds.
    fn destroy(self);
}


/// External graphing capability.
pub trait ChartEngine {
    type Chart: ChartHandle;

    fn construct(&mut self, canvas_id: &str, spec: ChartSpec) -> Self::Chart;
}


/// Live charts keyed by canvas id, owned by one view.
pub struct ChartSlots<C: ChartHandle> {
    live: HashMap<String, C>,
}


impl<C: ChartHandle> ChartSlots<C> {
    pub fn new() -> Self {
        Self { live: HashMap::new() }
    }

    pub fn get(&self, canvas_id: &str) -> Option<&C> {
        self.live.get(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Destroy the chart occupying `canvas_id`. Returns whether there was one.
    pub fn dispose(&mut self, canvas_id: &str) -> bool {
        match self.live.remove(canvas_id) {
            Some(chart) => {
                chart.destroy();
                true
            }
            None => false,
        }
    }

    /// Bind `chart` to `canvas_id`, destroying any previous occupant first.
    pub fn install(&mut self, canvas_id: &str, chart: C) {
        self.dispose(canvas_id);
        self.live.insert(canvas_id.to_string(), chart);
    }
}


impl<C: ChartHandle> Default for ChartSlots<C> {
    fn default() -> Self {
        Self::new()
    }
}


impl<C: ChartHandle> Drop for ChartSlots<C> {
    fn drop(&mut self) {
        for (_, chart) in self.live.drain() {
            chart.destroy();
        }
    }
}


/// Engine that keeps chart descriptions for later drawing.
///
/// Used by the terminal and text renderers, which draw from the retained
/// spec on every frame.
#[derive(Debug, Default)]
pub struct RetainedEngine {
    live: Arc<AtomicUsize>,
    constructed: usize,
}


impl RetainedEngine {
    /// Charts constructed and not yet destroyed.
    pub fn live_charts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Charts constructed over the engine's lifetime.
    pub fn constructed(&self) -> usize {
        self.constructed
    }
}


impl ChartEngine for RetainedEngine {
    type Chart = RetainedChart;

    fn construct(&mut self, canvas_id: &str, spec: ChartSpec) -> RetainedChart {
        self.constructed += 1;
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(canvas = canvas_id, live, "Constructed chart");

        RetainedChart {
            spec,
            live: Arc::clone(&self.live),
        }
    }
}


#[derive(Debug)]
pub struct RetainedChart {
    spec: ChartSpec,
    live: Arc<AtomicUsize>,
}


impl ChartHandle for RetainedChart {
    fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn destroy(self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
