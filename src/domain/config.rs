//! Immutable run configuration, built once from a [`ConfigPort`] and passed
//! into each component.

use crate::domain::config_validation::{parse_date, parse_number, validate_trading_config};
use crate::domain::error::CrossgateError;
use crate::domain::indicator::sma::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::order::TimeInForce;
use crate::domain::risk::DEFAULT_VAR_CONFIDENCE;
use crate::domain::timeframe::{Resolution, TimeUnit};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://paper-api.alpaca.markets";
pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";
pub const DEFAULT_HISTOGRAM_BINS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Alpaca,
    Csv,
}

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub key_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokerConfig {
    pub credentials: Credentials,
    pub base_url: String,
    pub data_url: String,
    pub feed: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradingConfig {
    pub symbol: String,
    pub resolution: Resolution,
    pub history_start: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub quantity: u32,
    pub time_in_force: TimeInForce,
    pub var_confidence: f64,
    pub histogram_bins: usize,
    pub source: DataSource,
    pub csv_dir: PathBuf,
    pub output_dir: PathBuf,
    pub broker: BrokerConfig,
}

impl TradingConfig {
    /// Validates `config` and resolves defaults.
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, CrossgateError> {
        validate_trading_config(config)?;

        let unit: TimeUnit = config
            .get_string("trade", "time_unit")
            .unwrap_or_else(|| "minute".to_string())
            .parse()
            .map_err(|e: String| CrossgateError::invalid("trade", "time_unit", e))?;
        let time_in_force = match config.get_string("trade", "time_in_force") {
            Some(s) => s
                .parse()
                .map_err(|e: String| CrossgateError::invalid("trade", "time_in_force", e))?,
            None => TimeInForce::default(),
        };
        let source = match config.get_string("data", "source").as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("csv") => DataSource::Csv,
            _ => DataSource::Alpaca,
        };

        Ok(Self {
            symbol: config
                .get_string("trade", "symbol")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_default(),
            resolution: Resolution::new(parse_number(config, "trade", "time_resolution", 10)?, unit),
            history_start: parse_date(config, "history_start")?,
            start_date: parse_date(config, "start_date")?,
            end_date: parse_date(config, "end_date")?,
            short_window: parse_number(config, "trade", "short_window", DEFAULT_SHORT_WINDOW)?,
            long_window: parse_number(config, "trade", "long_window", DEFAULT_LONG_WINDOW)?,
            quantity: parse_number(config, "trade", "quantity", 1)?,
            time_in_force,
            var_confidence: parse_number(config, "risk", "var_confidence", DEFAULT_VAR_CONFIDENCE)?,
            histogram_bins: parse_number(config, "risk", "histogram_bins", DEFAULT_HISTOGRAM_BINS)?,
            source,
            csv_dir: PathBuf::from(
                config
                    .get_string("data", "csv_dir")
                    .unwrap_or_else(|| "data".to_string()),
            ),
            output_dir: PathBuf::from(
                config
                    .get_string("report", "output_dir")
                    .unwrap_or_else(|| "reports".to_string()),
            ),
            broker: BrokerConfig {
                credentials: Credentials {
                    key_id: config.get_string("alpaca", "key_id").unwrap_or_default(),
                    secret_key: config.get_string("alpaca", "secret_key").unwrap_or_default(),
                },
                base_url: config
                    .get_string("alpaca", "base_url")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                data_url: config
                    .get_string("alpaca", "data_url")
                    .unwrap_or_else(|| DEFAULT_DATA_URL.to_string()),
                feed: config
                    .get_string("alpaca", "feed")
                    .filter(|s| !s.trim().is_empty()),
            },
        })
    }
}
