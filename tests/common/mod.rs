#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use crossgate::domain::config::{BrokerConfig, Credentials, DataSource, TradingConfig};
use crossgate::domain::error::CrossgateError;
use crossgate::domain::ohlcv::{Bar, BarSeries};
use crossgate::domain::order::{Order, TimeInForce};
use crossgate::domain::timeframe::{Resolution, TimeUnit};
use crossgate::ports::data_port::DataPort;
use crossgate::ports::order_port::OrderPort;
use crossgate::ports::report_port::{ChartPanel, ReportPort};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Serves canned closes per resolution and records every request.
pub struct MockDataPort {
    pub closes: HashMap<Resolution, Vec<f64>>,
    pub errors: HashMap<Resolution, String>,
    pub requests: RefCell<Vec<(Resolution, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            closes: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_closes(mut self, resolution: Resolution, closes: Vec<f64>) -> Self {
        self.closes.insert(resolution, closes);
        self
    }

    pub fn with_error(mut self, resolution: Resolution, reason: &str) -> Self {
        self.errors.insert(resolution, reason.to_string());
        self
    }

    pub fn requested(&self) -> Vec<Resolution> {
        self.requests.borrow().iter().map(|(r, _, _)| *r).collect()
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        resolution: Resolution,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, CrossgateError> {
        self.requests.borrow_mut().push((resolution, start, end));
        if let Some(reason) = self.errors.get(&resolution) {
            return Err(CrossgateError::DataRetrieval {
                reason: reason.clone(),
            });
        }
        let closes = self.closes.get(&resolution).cloned().unwrap_or_default();
        Ok(make_series(symbol, resolution, &closes))
    }
}

/// Records submitted orders; optionally rejects every one.
#[derive(Default)]
pub struct RecordingOrderPort {
    pub orders: RefCell<Vec<Order>>,
    pub reject_with: Option<String>,
}

impl RecordingOrderPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            orders: RefCell::new(Vec::new()),
            reject_with: Some(reason.to_string()),
        }
    }

    pub fn submitted(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }
}

impl OrderPort for RecordingOrderPort {
    fn submit(&self, order: &Order) -> Result<(), CrossgateError> {
        if let Some(reason) = &self.reject_with {
            return Err(CrossgateError::OrderRejected {
                symbol: order.symbol.clone(),
                side: order.side.to_string(),
                reason: reason.clone(),
            });
        }
        self.orders.borrow_mut().push(order.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedChart {
    Histogram {
        name: String,
        title: String,
        values: usize,
        bins: usize,
    },
    TimeSeries {
        name: String,
        panels: Vec<ChartPanel>,
    },
}

#[derive(Default)]
pub struct RecordingReportPort {
    pub charts: RefCell<Vec<RenderedChart>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<RenderedChart> {
        self.charts.borrow().clone()
    }
}

impl ReportPort for RecordingReportPort {
    fn render_histogram(
        &self,
        name: &str,
        title: &str,
        values: &[f64],
        bins: usize,
        _x_label: &str,
        _y_label: &str,
    ) -> Result<(), CrossgateError> {
        self.charts.borrow_mut().push(RenderedChart::Histogram {
            name: name.to_string(),
            title: title.to_string(),
            values: values.len(),
            bins,
        });
        Ok(())
    }

    fn render_time_series(&self, name: &str, panels: &[ChartPanel]) -> Result<(), CrossgateError> {
        self.charts.borrow_mut().push(RenderedChart::TimeSeries {
            name: name.to_string(),
            panels: panels.to_vec(),
        });
        Ok(())
    }
}

pub fn intraday() -> Resolution {
    Resolution::new(10, TimeUnit::Minute)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn step(resolution: Resolution) -> Duration {
    match resolution.unit {
        TimeUnit::Minute => Duration::minutes(resolution.amount as i64),
        TimeUnit::Hour => Duration::hours(resolution.amount as i64),
        _ => Duration::days(1),
    }
}

pub fn make_series(symbol: &str, resolution: Resolution, closes: &[f64]) -> BarSeries {
    let start: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + step(resolution) * i as i32,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect();
    BarSeries::new(symbol, resolution, bars).unwrap()
}

/// `count` closes rising by `step` from `start`.
pub fn linear_closes(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

pub fn sample_config() -> TradingConfig {
    TradingConfig {
        symbol: "VOO".to_string(),
        resolution: intraday(),
        history_start: date(2024, 1, 1),
        start_date: date(2024, 2, 21),
        end_date: date(2024, 2, 21),
        short_window: 10,
        long_window: 50,
        quantity: 1,
        time_in_force: TimeInForce::Gtc,
        var_confidence: 0.95,
        histogram_bins: 25,
        source: DataSource::Csv,
        csv_dir: PathBuf::from("data"),
        output_dir: PathBuf::from("reports"),
        broker: BrokerConfig {
            credentials: Credentials {
                key_id: "PKTEST".to_string(),
                secret_key: "s3cret".to_string(),
            },
            base_url: "https://paper-api.alpaca.markets".to_string(),
            data_url: "https://data.alpaca.markets".to_string(),
            feed: None,
        },
    }
}
