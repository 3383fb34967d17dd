//! One-shot dashboard rendering as ANSI terminal text.

use std::fmt::Write;

use crate::models::Period;
use crate::view::chart::{ChartHandle, ChartSlots};
use crate::view::page::{ItemStyle, Page, SummaryCards, ALERTS, RECENT_TRANSACTIONS, SUGGESTIONS};
use crate::view::{ChartKind, ChartSpec, Rgba, CHART_PLAN};


// Constants
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 12;
const MAX_BAR_ROWS: usize = 14;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BOX_WIDTH: usize = 78;


/// Format an amount with rupee sign and a K/M suffix.
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();

    if abs >= 1_000_000.0 {
        format!("{}₹{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}₹{:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}₹{:.2}", sign, abs)
    }
}


/// Format a chart value: whole numbers without decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}


/// ANSI foreground escape for an accent colour.
fn ansi_color(color: Rgba) -> String {
    // Charts are designed for a light page; composite over white like the browser would
    let (r, g, b) = color.blend_over((255, 255, 255));
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}


/// Create a simple text bar for visualization.
fn create_bar(value: f64, max_value: f64, width: usize, color: &str) -> String {
    if max_value <= 0.0 {
        return format!("{}{}{}", DIM, "░".repeat(width), RESET);
    }

    let filled = ((value.max(0.0) / max_value) * width as f64) as usize;
    let filled = filled.min(width);

    format!(
        "{}{}{}{}{}",
        color,
        "█".repeat(filled),
        RESET,
        DIM,
        "░".repeat(width - filled),
    ) + RESET
}


/// Sparkline of the values, scaled from zero to the chart maximum.
fn sparkline(spec: &ChartSpec) -> String {
    let (min, max) = spec.value_range();
    let span = max - min;

    spec.points()
        .map(|(_, value)| {
            let ratio = ((value - min) / span).clamp(0.0, 1.0);
            let level = (ratio * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level]
        })
        .collect()
}


/// Truncate to at most `width` characters.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}


/// Render the complete dashboard to a string.
pub fn render_dashboard<C: ChartHandle>(page: &Page, charts: &ChartSlots<C>, period: &Period) -> String {
    let mut out = String::new();

    render_header(&mut out, period);

    if let Some(cards) = page.summary() {
        render_kpi_section(&mut out, cards);
        out.push('\n');
    }

    render_lists(&mut out, page);

    for plan in &CHART_PLAN {
        if let Some(chart) = charts.get(plan.canvas_id) {
            render_chart(&mut out, chart.spec());
            out.push('\n');
        }
    }

    render_footer(&mut out);
    out
}


fn render_header(out: &mut String, period: &Period) {
    let title = format!("Fraudboard · period {}", period);
    let _ = writeln!(out, "┌{}┐", "─".repeat(BOX_WIDTH - 2));
    let _ = writeln!(out, "│{}{:^76}{}│", BOLD, title, RESET);
    let _ = writeln!(out, "└{}┘", "─".repeat(BOX_WIDTH - 2));
    out.push('\n');
}


/// Render the KPI cards section.
fn render_kpi_section(out: &mut String, cards: &SummaryCards) {
    let width = 26;
    let border = "─".repeat(width - 2);
    let savings_color = if cards.savings < 0.0 { "\x1b[31m" } else { GREEN };

    let _ = writeln!(out, "┌{}┐  ┌{}┐  ┌{}┐", border, border, border);
    let _ = writeln!(out, "│{:^24}│  │{:^24}│  │{:^24}│", "Income", "Spending", "Savings");
    let _ = writeln!(
        out,
        "│{}{:^24}{}│  │{}{:^24}{}│  │{}{}{:^24}{}│",
        BOLD,
        format_amount(cards.income),
        RESET,
        BOLD,
        format_amount(cards.spending),
        RESET,
        BOLD,
        savings_color,
        format_amount(cards.savings),
        RESET,
    );
    let _ = writeln!(out, "└{}┘  └{}┘  └{}┘", border, border, border);
}


fn render_lists(out: &mut String, page: &Page) {
    let titled = [
        (SUGGESTIONS, "Smart Suggestions"),
        (ALERTS, "Alerts"),
        (RECENT_TRANSACTIONS, "Recent Transactions"),
    ];

    for (id, title) in titled {
        let Some(list) = page.list(id) else { continue };

        let _ = writeln!(out, "{}{}{}", BOLD, title, RESET);
        let _ = writeln!(out, "{}", "─".repeat(BOX_WIDTH));

        if list.is_empty() {
            let _ = writeln!(out, "  {}Nothing to show{}", DIM, RESET);
        }
        for item in list.items() {
            match item.style {
                ItemStyle::Success => {
                    let _ = writeln!(out, "  {}{}{}", GREEN, item.text, RESET);
                }
                ItemStyle::GroupItem | ItemStyle::Plain => {
                    let _ = writeln!(out, "  {}", item.text);
                }
            }
        }
        out.push('\n');
    }
}


/// Render one chart as a sparkline (line) or horizontal bars (bar).
fn render_chart(out: &mut String, spec: &ChartSpec) {
    let color = ansi_color(spec.accent());
    let _ = writeln!(out, "{}■{} {}{}{}", color, RESET, BOLD, spec.title(), RESET);

    let points: Vec<(&str, f64)> = spec.points().collect();
    if points.is_empty() {
        let _ = writeln!(out, "  {}No data{}", DIM, RESET);
        return;
    }

    let (_, max) = spec.value_range();

    match spec.kind {
        ChartKind::Line => {
            let (first, _) = points[0];
            let (last, last_value) = points[points.len() - 1];
            let _ = writeln!(out, "  {}{}{}", color, sparkline(spec), RESET);
            let _ = writeln!(
                out,
                "  {}{} → {}  max {}  latest {}{}",
                DIM,
                first,
                last,
                format_value(max),
                format_value(last_value),
                RESET
            );
        }
        ChartKind::Bar => {
            let skipped = points.len().saturating_sub(MAX_BAR_ROWS);
            if skipped > 0 {
                let _ = writeln!(out, "  {}… {} earlier{}", DIM, skipped, RESET);
            }
            for (label, value) in &points[skipped..] {
                let _ = writeln!(
                    out,
                    "  {:width$} {} {}{:>10}{}",
                    fit(label, LABEL_WIDTH),
                    create_bar(*value, max, BAR_WIDTH, &color),
                    CYAN,
                    format_value(*value),
                    RESET,
                    width = LABEL_WIDTH,
                );
            }
        }
    }
}


/// Render the footer with tips.
fn render_footer(out: &mut String) {
    let _ = writeln!(
        out,
        "{}Tip: live dashboard with {}{}fraudboard watch{}",
        DIM, RESET, CYAN, RESET
    );
}
