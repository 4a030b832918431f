//! Chart rendering port trait.

use crate::domain::error::CrossgateError;

/// A named line; `None` entries are gaps (e.g. moving-average warm-up).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub points: Vec<Option<f64>>,
}

impl ChartLine {
    pub fn new(label: impl Into<String>, points: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn dense(label: impl Into<String>, values: &[f64]) -> Self {
        Self::new(label, values.iter().copied().map(Some).collect())
    }
}

/// One stacked sub-plot of a time-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub title: String,
    pub y_label: String,
    pub lines: Vec<ChartLine>,
}

/// Port for presentation output. Nothing returned here feeds back into
/// the trading decision.
pub trait ReportPort {
    fn render_histogram(
        &self,
        name: &str,
        title: &str,
        values: &[f64],
        bins: usize,
        x_label: &str,
        y_label: &str,
    ) -> Result<(), CrossgateError>;

    fn render_time_series(
        &self,
        name: &str,
        panels: &[ChartPanel],
    ) -> Result<(), CrossgateError>;
}
