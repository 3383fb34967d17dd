//! Dashboard view: fetches a snapshot and projects it onto the page.
//!
//! A refresh is split into [`DashboardView::begin_refresh`], which stamps
//! the request with a generation, and [`DashboardView::complete_refresh`],
//! which applies the response. Event loops run the fetch in between on a
//! spawned task; [`DashboardView::fetch_dashboard_data`] does all three in
//! sequence.
//!
//! A response is applied only when its generation is newer than the last
//! applied one, so a slow response can never overwrite a newer one.

use std::sync::Arc;

use crate::data::{FetchError, SnapshotSource};
use crate::models::{DashboardSnapshot, Metric, Period, Transaction, Window};

use super::chart::{ChartEngine, ChartKind, ChartSlots, ChartSpec, Rgba};
use super::page::{
    ItemStyle, ListItem, Page, SummaryCards, Trigger, ALERTS, RECENT_TRANSACTIONS, SUGGESTIONS,
};


/// Shown in the alerts region when there are no alerts.
pub const NO_ALERTS_PLACEHOLDER: &str = "No unusual activity";


/// One chart slot of the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct ChartPlan {
    pub canvas_id: &'static str,
    pub kind: ChartKind,
    pub metric: Metric,
    pub window: Window,
    pub color: Rgba,
}


impl ChartPlan {
    pub fn title(&self) -> String {
        format!("{} ({})", self.metric.caption(), self.window.caption())
    }
}


const fn plan(
    canvas_id: &'static str,
    kind: ChartKind,
    metric: Metric,
    window: Window,
    color: Rgba,
) -> ChartPlan {
    ChartPlan { canvas_id, kind, metric, window, color }
}


/// Every chart the dashboard renders, in refresh order.
pub const CHART_PLAN: [ChartPlan; 9] = [
    plan("spendingChart7d", ChartKind::Line, Metric::Spending, Window::SevenDays, Rgba::new(255, 0, 0, 1.0)),
    plan("spendingChart30d", ChartKind::Line, Metric::Spending, Window::ThirtyDays, Rgba::new(0, 128, 0, 1.0)),
    plan("spendingChartAll", ChartKind::Line, Metric::Spending, Window::AllTime, Rgba::new(0, 0, 255, 1.0)),
    plan("fraudAmountChart7d", ChartKind::Bar, Metric::FraudAmount, Window::SevenDays, Rgba::new(255, 0, 0, 0.7)),
    plan("fraudAmountChart30d", ChartKind::Bar, Metric::FraudAmount, Window::ThirtyDays, Rgba::new(128, 0, 128, 0.7)),
    plan("fraudAmountChartAll", ChartKind::Bar, Metric::FraudAmount, Window::AllTime, Rgba::new(0, 128, 128, 0.7)),
    plan("fraudCountChart7d", ChartKind::Bar, Metric::FraudCount, Window::SevenDays, Rgba::new(255, 69, 0, 0.7)),
    plan("fraudCountChart30d", ChartKind::Bar, Metric::FraudCount, Window::ThirtyDays, Rgba::new(255, 165, 0, 0.7)),
    plan("fraudCountChartAll", ChartKind::Bar, Metric::FraudCount, Window::AllTime, Rgba::new(0, 0, 0, 0.7)),
];


/// Format a transaction as `description — ₹amount (timestamp)`.
pub fn transaction_line(transaction: &Transaction) -> String {
    format!(
        "{} — ₹{:.2} ({})",
        transaction.description,
        // -0.0 prints as "-0.00"
        transaction.amount + 0.0,
        transaction.timestamp
    )
}


fn suggestion_items(suggestions: &[String]) -> Vec<ListItem> {
    suggestions
        .iter()
        .map(|s| ListItem::new(format!("💡 {}", s), ItemStyle::GroupItem))
        .collect()
}


fn alert_items(alerts: &[String]) -> Vec<ListItem> {
    if alerts.is_empty() {
        return vec![ListItem::new(NO_ALERTS_PLACEHOLDER, ItemStyle::Success)];
    }

    alerts
        .iter()
        .map(|a| ListItem::new(format!("🔔 {}", a), ItemStyle::Plain))
        .collect()
}


fn transaction_items(transactions: &[Transaction]) -> Vec<ListItem> {
    transactions
        .iter()
        .map(|t| ListItem::new(transaction_line(t), ItemStyle::Plain))
        .collect()
}


/// A refresh request that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub period: Period,
}


/// What happened to a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced the visible state.
    Applied,
    /// Fetch failed; visible state left untouched.
    Failed,
    /// A newer response had already been applied.
    Superseded,
}


/// The dashboard: page targets, live charts, and where snapshots come from.
pub struct DashboardView<S, E: ChartEngine> {
    source: Arc<S>,
    engine: E,
    page: Page,
    charts: ChartSlots<E::Chart>,
    issued: u64,
    in_flight: u64,
    applied: u64,
}


impl<S: SnapshotSource, E: ChartEngine> DashboardView<S, E> {
    pub fn new(source: Arc<S>, engine: E, page: Page) -> Self {
        Self {
            source,
            engine,
            page,
            charts: ChartSlots::new(),
            issued: 0,
            in_flight: 0,
            applied: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn charts(&self) -> &ChartSlots<E::Chart> {
        &self.charts
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Shared handle on the snapshot source, for fetching off the UI task.
    pub fn source(&self) -> Arc<S> {
        Arc::clone(&self.source)
    }

    /// Generation of the last applied snapshot (0 before the first).
    pub fn applied_generation(&self) -> u64 {
        self.applied
    }

    /// Whether any issued refresh is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Load the default period.
    pub async fn initialize(&mut self) -> RefreshOutcome {
        self.fetch_dashboard_data(Period::all()).await
    }

    /// Fetch a snapshot for `period` and apply it.
    ///
    /// Failures are logged and swallowed; the returned outcome is
    /// informational only.
    pub async fn fetch_dashboard_data(&mut self, period: Period) -> RefreshOutcome {
        let ticket = self.begin_refresh(period);
        let result = self.source.fetch(&ticket.period).await;
        self.complete_refresh(ticket, result)
    }

    /// Stamp a new refresh request.
    pub fn begin_refresh(&mut self, period: Period) -> RefreshTicket {
        self.issued += 1;
        self.in_flight += 1;
        tracing::debug!(generation = self.issued, period = %period, "Refreshing dashboard");

        RefreshTicket {
            generation: self.issued,
            period,
        }
    }

    /// Apply the result of a refresh started with [`Self::begin_refresh`].
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<DashboardSnapshot, FetchError>,
    ) -> RefreshOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!(period = %ticket.period, "Error loading dashboard data: {err}");
                return RefreshOutcome::Failed;
            }
        };

        if ticket.generation <= self.applied {
            tracing::debug!(
                generation = ticket.generation,
                applied = self.applied,
                "Discarding superseded dashboard data"
            );
            return RefreshOutcome::Superseded;
        }

        self.apply(&snapshot);
        self.applied = ticket.generation;
        tracing::info!(period = %ticket.period, "Dashboard refreshed");

        RefreshOutcome::Applied
    }

    /// Activate a trigger. Returns `None` when the page has no such trigger.
    pub fn trigger(&mut self, trigger: Trigger) -> Option<RefreshTicket> {
        if !self.page.has_trigger(trigger) {
            tracing::debug!(trigger = trigger.element_id(), "Trigger not on page");
            return None;
        }

        Some(self.begin_refresh(trigger.period()))
    }

    /// Replace every region and chart from `snapshot`.
    pub fn apply(&mut self, snapshot: &DashboardSnapshot) {
        if let Some(list) = self.page.list_mut(SUGGESTIONS) {
            list.replace_with(suggestion_items(&snapshot.suggestions));
        }

        if let Some(list) = self.page.list_mut(ALERTS) {
            list.replace_with(alert_items(&snapshot.alerts));
        }

        if let Some(list) = self.page.list_mut(RECENT_TRANSACTIONS) {
            list.replace_with(transaction_items(&snapshot.transactions));
        }

        let cards = snapshot
            .totals()
            .map(|(income, spending, savings)| SummaryCards { income, spending, savings });
        self.page.set_summary(cards);

        for plan in &CHART_PLAN {
            let labels = snapshot.labels(plan.window);
            let series = snapshot.series(plan.metric, plan.window);
            let title = plan.title();

            match plan.kind {
                ChartKind::Line => self.render_line_chart(plan.canvas_id, labels, series, &title, plan.color),
                ChartKind::Bar => self.render_bar_chart(plan.canvas_id, labels, series, &title, plan.color),
            }
        }
    }

    /// Draw a smoothed, filled line chart into `slot_id`.
    pub fn render_line_chart(&mut self, slot_id: &str, labels: &[String], series: &[f64], title: &str, color: Rgba) {
        self.render_chart(slot_id, ChartSpec::line(labels, series, title, color));
    }

    /// Draw a solid bar chart into `slot_id`.
    pub fn render_bar_chart(&mut self, slot_id: &str, labels: &[String], series: &[f64], title: &str, color: Rgba) {
        self.render_chart(slot_id, ChartSpec::bar(labels, series, title, color));
    }

    fn render_chart(&mut self, slot_id: &str, spec: ChartSpec) {
        if !self.page.has_canvas(slot_id) {
            return;
        }

        if spec.labels.len() != spec.dataset.data.len() {
            tracing::debug!(
                canvas = slot_id,
                labels = spec.labels.len(),
                values = spec.dataset.data.len(),
                "Series length differs from labels"
            );
        }

        // Old chart must be gone before the new one claims the canvas
        self.charts.dispose(slot_id);
        let chart = self.engine.construct(slot_id, spec);
        self.charts.install(slot_id, chart);
    }
}
