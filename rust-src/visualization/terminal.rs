//! Interactive dashboard rendering with ratatui.

use chrono::{DateTime, Local};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, LegendPosition, List,
    ListItem as ListRow, Paragraph,
};
use ratatui::Frame;

use crate::models::{Metric, Period, Window};
use crate::view::chart::{smooth_polyline, ChartHandle, ChartSlots};
use crate::view::page::{
    ItemStyle, Page, SummaryCards, Trigger, ALERTS, RECENT_TRANSACTIONS, SUGGESTIONS,
};
use crate::view::{ChartKind, ChartSpec, Rgba, CHART_PLAN};

use super::text::format_amount;


/// Background the accent colours are designed against.
const PAGE_BACKGROUND: (u8, u8, u8) = (255, 255, 255);
const SMOOTHING_STEPS: usize = 6;


/// Everything one frame needs.
pub struct Screen<'a, C: ChartHandle> {
    pub page: &'a Page,
    pub charts: &'a ChartSlots<C>,
    pub period: &'a Period,
    pub last_refresh: Option<DateTime<Local>>,
    pub loading: bool,
}


/// Key bound to a trigger.
pub fn trigger_key(trigger: Trigger) -> char {
    match trigger {
        Trigger::Filter7 => '7',
        Trigger::Filter30 => '3',
        Trigger::FilterAll => 'a',
    }
}


fn terminal_color(color: Rgba) -> Color {
    let (r, g, b) = color.blend_over(PAGE_BACKGROUND);
    Color::Rgb(r, g, b)
}


/// Draw the whole dashboard.
pub fn draw<C: ChartHandle>(frame: &mut Frame, screen: &Screen<'_, C>) {
    let summary_height = if screen.page.has_summary() { 4 } else { 0 };

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(summary_height),
        Constraint::Percentage(30),
        Constraint::Min(9),
        Constraint::Length(1),
    ])
    .split(frame.area());

    draw_header(frame, rows[0], screen);
    if let Some(cards) = screen.page.summary() {
        draw_summary(frame, rows[1], cards);
    }
    draw_lists(frame, rows[2], screen.page);
    draw_charts(frame, rows[3], screen);
    draw_footer(frame, rows[4]);
}


fn draw_header<C: ChartHandle>(frame: &mut Frame, area: Rect, screen: &Screen<'_, C>) {
    let active = screen.period.window();

    let mut spans = vec![Span::styled(
        " fraudboard ",
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    )];

    for trigger in Trigger::ALL {
        if !screen.page.has_trigger(trigger) {
            continue;
        }
        let window = trigger.period().window();
        let style = if window.is_some() && window == active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let caption = window.map(|w| w.caption()).unwrap_or("");
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("[{}] {}", trigger_key(trigger), caption), style));
    }

    spans.push(Span::styled(
        format!("   period {}", screen.period),
        Style::default().fg(Color::DarkGray),
    ));

    if let Some(at) = screen.last_refresh {
        spans.push(Span::styled(
            format!("  updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if screen.loading {
        spans.push(Span::styled("  loading…", Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}


fn draw_summary(frame: &mut Frame, area: Rect, cards: &SummaryCards) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    let savings_color = if cards.savings < 0.0 { Color::Red } else { Color::Green };

    let kpis = [
        ("Income", cards.income, Color::White),
        ("Spending", cards.spending, Color::White),
        ("Savings", cards.savings, savings_color),
    ];

    for ((title, value, color), area) in kpis.into_iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format_amount(value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::bordered().title(title));
        frame.render_widget(paragraph, *area);
    }
}


fn draw_lists(frame: &mut Frame, area: Rect, page: &Page) {
    let titled: Vec<(&str, &str)> = [
        (SUGGESTIONS, "Smart Suggestions"),
        (ALERTS, "Alerts"),
        (RECENT_TRANSACTIONS, "Recent Transactions"),
    ]
    .into_iter()
    .filter(|(id, _)| page.list(id).is_some())
    .collect();

    if titled.is_empty() {
        return;
    }

    let count = titled.len() as u32;
    let columns = Layout::horizontal(vec![Constraint::Ratio(1, count); titled.len()]).split(area);

    for ((id, title), area) in titled.into_iter().zip(columns.iter()) {
        let Some(list) = page.list(id) else { continue };

        let rows: Vec<ListRow> = list
            .items()
            .iter()
            .map(|item| {
                let style = match item.style {
                    ItemStyle::Success => Style::default().fg(Color::Green),
                    ItemStyle::GroupItem | ItemStyle::Plain => Style::default(),
                };
                ListRow::new(Line::from(Span::styled(item.text.clone(), style)))
            })
            .collect();

        frame.render_widget(List::new(rows).block(Block::bordered().title(title)), *area);
    }
}


fn draw_charts<C: ChartHandle>(frame: &mut Frame, area: Rect, screen: &Screen<'_, C>) {
    let rows = Layout::vertical([Constraint::Ratio(1, 3); 3]).split(area);

    for (row, metric) in Metric::ALL.into_iter().enumerate() {
        let cells = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(rows[row]);

        for (column, window) in Window::ALL.into_iter().enumerate() {
            let Some(plan) = CHART_PLAN.iter().find(|p| p.metric == metric && p.window == window) else {
                continue;
            };
            if !screen.page.has_canvas(plan.canvas_id) {
                continue;
            }

            let cell = cells[column];
            match screen.charts.get(plan.canvas_id) {
                Some(chart) => draw_chart(frame, cell, chart.spec()),
                None => {
                    let placeholder = Paragraph::new("waiting for data")
                        .style(Style::default().fg(Color::DarkGray))
                        .block(Block::bordered().title(plan.title()));
                    frame.render_widget(placeholder, cell);
                }
            }
        }
    }
}


/// Draw one chart spec into `area`.
fn draw_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec) {
    match spec.kind {
        ChartKind::Line => draw_line_chart(frame, area, spec),
        ChartKind::Bar => draw_bar_chart(frame, area, spec),
    }
}


fn draw_line_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec) {
    let values: Vec<f64> = spec.points().map(|(_, v)| v).collect();
    let labels: Vec<&str> = spec.points().map(|(l, _)| l).collect();
    let (min, max) = spec.value_range();

    let raw: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect();
    let curve = smooth_polyline(&raw, spec.dataset.tension, SMOOTHING_STEPS);

    // Braille has no alpha; approximate the area fill with dense scatter points
    let fill = if spec.dataset.fill { area_fill(&curve, min, max, area) } else { Vec::new() };

    let stroke = spec.dataset.border_color.unwrap_or(spec.dataset.background_color);
    let mut datasets = Vec::new();
    if !fill.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(terminal_color(spec.dataset.background_color)))
                .data(&fill),
        );
    }
    datasets.push(
        Dataset::default()
            .name(spec.title().to_string())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(terminal_color(stroke)))
            .data(&curve),
    );

    let x_max = (raw.len().saturating_sub(1)).max(1) as f64;
    let x_labels = match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => vec![Span::raw(first.to_string()), Span::raw(last.to_string())],
        _ => Vec::new(),
    };
    let y_labels = vec![Span::raw(axis_value(min)), Span::raw(axis_value(max))];

    let legend = if spec.options.legend_top {
        LegendPosition::Top
    } else {
        LegendPosition::Bottom
    };

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(chart_title(spec, stroke)))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([min, max]).labels(y_labels))
        .legend_position(Some(legend))
        .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));

    frame.render_widget(chart, area);
}


/// Scatter points filling the region between the value axis floor and the curve.
fn area_fill(curve: &[(f64, f64)], min: f64, max: f64, area: Rect) -> Vec<(f64, f64)> {
    // Braille gives four dots per cell vertically
    let rows = (area.height.saturating_sub(2) as usize * 4).max(1);
    let step = (max - min) / rows as f64;
    let baseline = min.max(0.0).min(max);

    let mut points = Vec::new();
    for &(x, y) in curve {
        if !y.is_finite() {
            continue;
        }
        let top = y.min(max);
        let mut level = baseline;
        while level < top {
            points.push((x, level));
            level += step;
        }
    }
    points
}


/// Block title with a colour swatch, standing in for the chart legend.
fn chart_title(spec: &ChartSpec, color: Rgba) -> Line<'static> {
    Line::from(vec![
        Span::styled("■ ", Style::default().fg(terminal_color(color))),
        Span::raw(spec.title().to_string()),
    ])
}


fn draw_bar_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec) {
    let color = terminal_color(spec.dataset.background_color);
    let block = Block::bordered().title(chart_title(spec, spec.dataset.background_color));

    let points: Vec<(&str, f64)> = spec.points().collect();
    let inner_width = area.width.saturating_sub(2) as usize;

    // Show the most recent bars that fit at one column each plus a gap
    let bar_width: u16 = if points.len() * 6 <= inner_width { 5 } else { 1 };
    let gap: u16 = 1;
    let fit = (inner_width + gap as usize) / (bar_width + gap) as usize;
    let visible = &points[points.len().saturating_sub(fit.max(1))..];

    let bars: Vec<Bar> = visible
        .iter()
        .map(|(label, value)| {
            let chars: Vec<char> = label.chars().collect();
            let short: String = chars[chars.len().saturating_sub(bar_width as usize)..].iter().collect();
            Bar::default()
                .value(value.max(0.0).round() as u64)
                .text_value(axis_value(*value))
                .label(Line::from(short))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color));

    frame.render_widget(chart, area);
}


fn axis_value(value: f64) -> String {
    if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}


fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(" quit  "),
        Span::styled(" r ", Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(" reload"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(footer, area);
}


#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::config::LayoutSettings;
    use crate::view::chart::{ChartEngine, RetainedChart, RetainedEngine};

    fn render(screen: &Screen<'_, RetainedChart>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, screen)).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|d| format!("2024-01-{:02}", d)).collect()
    }

    #[test]
    fn test_trigger_keys() {
        assert_eq!(trigger_key(Trigger::Filter7), '7');
        assert_eq!(trigger_key(Trigger::Filter30), '3');
        assert_eq!(trigger_key(Trigger::FilterAll), 'a');
    }

    #[test]
    fn test_terminal_color_composites_over_page() {
        assert_eq!(terminal_color(Rgba::new(0, 0, 0, 0.7)), Color::Rgb(77, 77, 77));
        assert_eq!(terminal_color(Rgba::new(255, 0, 0, 1.0)), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_area_fill_stays_under_curve() {
        let curve = [(0.0, 2.0), (1.0, 4.0)];
        let fill = area_fill(&curve, 0.0, 4.0, Rect::new(0, 0, 20, 6));

        assert!(!fill.is_empty());
        for (x, y) in fill {
            let top = if x == 0.0 { 2.0 } else { 4.0 };
            assert!(y < top);
            assert!(y >= 0.0);
        }
    }

    #[test]
    fn test_draw_full_dashboard() {
        let mut page = Page::from_layout(&LayoutSettings::default());
        page.set_summary(Some(SummaryCards { income: 5000.0, spending: 1200.0, savings: 3800.0 }));
        page.list_mut(SUGGESTIONS)
            .unwrap()
            .replace_with(vec![crate::view::page::ListItem::new("💡 Invest savings", ItemStyle::GroupItem)]);

        let mut engine = RetainedEngine::default();
        let mut charts = ChartSlots::new();
        let line = ChartSpec::line(&labels(7), &[1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 2.0], "Spending (7 days)", CHART_PLAN[0].color);
        charts.install("spendingChart7d", engine.construct("spendingChart7d", line));
        let bar = ChartSpec::bar(&labels(7), &[0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0], "Fraud Count (7 days)", CHART_PLAN[6].color);
        charts.install("fraudCountChart7d", engine.construct("fraudCountChart7d", bar));

        let period = Period::seven_days();
        let screen = Screen {
            page: &page,
            charts: &charts,
            period: &period,
            last_refresh: None,
            loading: false,
        };

        let output = render(&screen, 180, 60);

        assert!(output.contains("fraudboard"));
        assert!(output.contains("[7] 7 days"));
        assert!(output.contains("Income"));
        assert!(output.contains("Smart Suggestions"));
        assert!(output.contains("Invest savings"));
        assert!(output.contains("Spending (7 days)"));
        assert!(output.contains("Fraud Count (7 days)"));
        assert!(output.contains("waiting for data"));
    }

    #[test]
    fn test_draw_hides_absent_targets() {
        let layout = LayoutSettings {
            lists: vec![ALERTS.to_string()],
            canvases: vec![],
            triggers: vec!["filterAll".to_string()],
            summary: false,
        };
        let page = Page::from_layout(&layout);
        let charts: ChartSlots<RetainedChart> = ChartSlots::new();
        let period = Period::all();
        let screen = Screen {
            page: &page,
            charts: &charts,
            period: &period,
            last_refresh: None,
            loading: true,
        };

        let output = render(&screen, 120, 30);

        assert!(output.contains("Alerts"));
        assert!(output.contains("[a] All time"));
        assert!(output.contains("loading…"));
        assert!(!output.contains("[7]"));
        assert!(!output.contains("Smart Suggestions"));
        assert!(!output.contains("waiting for data"));
    }
}
