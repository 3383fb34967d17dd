//! Dashboard snapshot as returned by the `/dashboard-data/` endpoint.

use serde::{Deserialize, Serialize};


/// Reporting window of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    SevenDays,
    ThirtyDays,
    AllTime,
}


impl Window {
    pub const ALL: [Window; 3] = [Window::SevenDays, Window::ThirtyDays, Window::AllTime];

    /// Human-readable caption used in chart titles.
    pub fn caption(&self) -> &'static str {
        match self {
            Self::SevenDays => "7 days",
            Self::ThirtyDays => "30 days",
            Self::AllTime => "All time",
        }
    }
}


/// Numeric series carried per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Spending,
    FraudAmount,
    FraudCount,
}


impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Spending, Metric::FraudAmount, Metric::FraudCount];

    pub fn caption(&self) -> &'static str {
        match self {
            Self::Spending => "Spending",
            Self::FraudAmount => "Fraud Amount",
            Self::FraudCount => "Fraud Count",
        }
    }
}


/// A recent, non-fraudulent transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub description: String,
    pub amount: f64,
    pub timestamp: String,
}


/// One fetched analytics payload.
///
/// Fields are not validated. Anything missing from the payload decodes as
/// empty, and series whose length differs from their labels are rendered
/// as-is over the common prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSnapshot {
    pub income: Option<f64>,
    pub spending: Option<f64>,
    pub savings: Option<f64>,

    pub suggestions: Vec<String>,
    pub alerts: Vec<String>,
    pub transactions: Vec<Transaction>,

    pub labels_7d: Vec<String>,
    pub spending_7d: Vec<f64>,
    pub fraud_7d_amount: Vec<f64>,
    pub fraud_7d_count: Vec<f64>,

    pub labels_30d: Vec<String>,
    pub spending_30d: Vec<f64>,
    pub fraud_30d_amount: Vec<f64>,
    pub fraud_30d_count: Vec<f64>,

    pub labels_all: Vec<String>,
    pub spending_all: Vec<f64>,
    pub fraud_all_amount: Vec<f64>,
    pub fraud_all_count: Vec<f64>,
}


impl DashboardSnapshot {
    /// Category labels shared by every series of a window.
    pub fn labels(&self, window: Window) -> &[String] {
        match window {
            Window::SevenDays => &self.labels_7d,
            Window::ThirtyDays => &self.labels_30d,
            Window::AllTime => &self.labels_all,
        }
    }

    /// Numeric series for a metric within a window.
    pub fn series(&self, metric: Metric, window: Window) -> &[f64] {
        match (metric, window) {
            (Metric::Spending, Window::SevenDays) => &self.spending_7d,
            (Metric::Spending, Window::ThirtyDays) => &self.spending_30d,
            (Metric::Spending, Window::AllTime) => &self.spending_all,
            (Metric::FraudAmount, Window::SevenDays) => &self.fraud_7d_amount,
            (Metric::FraudAmount, Window::ThirtyDays) => &self.fraud_30d_amount,
            (Metric::FraudAmount, Window::AllTime) => &self.fraud_all_amount,
            (Metric::FraudCount, Window::SevenDays) => &self.fraud_7d_count,
            (Metric::FraudCount, Window::ThirtyDays) => &self.fraud_30d_count,
            (Metric::FraudCount, Window::AllTime) => &self.fraud_all_count,
        }
    }

    /// Income, spending and savings totals, if the payload carried all three.
    pub fn totals(&self) -> Option<(f64, f64, f64)> {
        Some((self.income?, self.spending?, self.savings?))
    }
}
