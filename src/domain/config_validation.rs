//! Configuration validation.
//!
//! Validates all config fields before a run touches the network.

use crate::domain::config::DEFAULT_HISTOGRAM_BINS;
use crate::domain::error::CrossgateError;
use crate::domain::indicator::sma::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::order::TimeInForce;
use crate::domain::risk::DEFAULT_VAR_CONFIDENCE;
use crate::domain::timeframe::TimeUnit;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub fn validate_trading_config(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    validate_symbol(config)?;
    validate_resolution(config)?;
    validate_dates(config)?;
    validate_windows(config)?;
    validate_order(config)?;
    validate_risk(config)?;
    validate_data_source(config)?;
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let symbol = match config.get_string("trade", "symbol") {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Err(CrossgateError::missing("trade", "symbol")),
    };
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-');
    if !symbol.trim().chars().all(allowed) {
        return Err(CrossgateError::invalid(
            "trade",
            "symbol",
            format!("'{}' contains invalid characters", symbol.trim()),
        ));
    }
    Ok(())
}

fn validate_resolution(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let unit: TimeUnit = config
        .get_string("trade", "time_unit")
        .unwrap_or_else(|| "minute".to_string())
        .parse()
        .map_err(|e: String| CrossgateError::invalid("trade", "time_unit", e))?;

    let amount = parse_number(config, "trade", "time_resolution", 10i64)?;
    let accepted = u32::try_from(amount).is_ok_and(|a| unit.accepts(a));
    if !accepted {
        return Err(CrossgateError::invalid(
            "trade",
            "time_resolution",
            format!("{} is not a valid amount for unit {:?}", amount, unit),
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let history_start = parse_date(config, "history_start")?;
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date > end_date {
        return Err(CrossgateError::invalid(
            "trade",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    if history_start > end_date {
        return Err(CrossgateError::invalid(
            "trade",
            "history_start",
            "history_start must not be after end_date",
        ));
    }
    Ok(())
}

/// A present value must parse; `get_int`/`get_double` would silently fall
/// back to the default.
pub(crate) fn parse_number<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, CrossgateError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| {
            CrossgateError::invalid(section, key, format!("'{}' is not a number", s.trim()))
        }),
    }
}

pub(crate) fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, CrossgateError> {
    match config.get_string("trade", field) {
        None => Err(CrossgateError::missing("trade", field)),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            CrossgateError::invalid(
                "trade",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    for (key, default) in [
        ("short_window", DEFAULT_SHORT_WINDOW as i64),
        ("long_window", DEFAULT_LONG_WINDOW as i64),
    ] {
        if parse_number(config, "trade", key, default)? < 1 {
            return Err(CrossgateError::invalid(
                "trade",
                key,
                format!("{} must be at least 1", key),
            ));
        }
    }
    Ok(())
}

fn validate_order(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let quantity = parse_number(config, "trade", "quantity", 1i64)?;
    if quantity < 1 || u32::try_from(quantity).is_err() {
        return Err(CrossgateError::invalid(
            "trade",
            "quantity",
            "quantity must be a positive whole number of shares",
        ));
    }
    if let Some(tif) = config.get_string("trade", "time_in_force") {
        tif.parse::<TimeInForce>()
            .map_err(|e| CrossgateError::invalid("trade", "time_in_force", e))?;
    }
    Ok(())
}

fn validate_risk(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let confidence = parse_number(config, "risk", "var_confidence", DEFAULT_VAR_CONFIDENCE)?;
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(CrossgateError::invalid(
            "risk",
            "var_confidence",
            "var_confidence must be between 0 and 1",
        ));
    }
    if parse_number(config, "risk", "histogram_bins", DEFAULT_HISTOGRAM_BINS as i64)? < 1 {
        return Err(CrossgateError::invalid(
            "risk",
            "histogram_bins",
            "histogram_bins must be at least 1",
        ));
    }
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), CrossgateError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "alpaca".to_string());
    match source.trim().to_lowercase().as_str() {
        "alpaca" => {
            validate_credential(config, "key_id")?;
            validate_credential(config, "secret_key")
        }
        "csv" => Ok(()),
        other => Err(CrossgateError::invalid(
            "data",
            "source",
            format!("unknown data source '{}', expected alpaca or csv", other),
        )),
    }
}

fn validate_credential(config: &dyn ConfigPort, key: &str) -> Result<(), CrossgateError> {
    match config.get_string("alpaca", key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CrossgateError::missing("alpaca", key)),
    }
}
