//! Technical indicator types.
//!
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values aligned to its bars

pub mod sma;

use crate::domain::error::CrossgateError;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

impl IndicatorType {
    pub fn window(&self) -> usize {
        match self {
            IndicatorType::Sma(window) => *window,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// The final value of the series, which the signal is derived from.
    ///
    /// Fails if the series is empty or still inside its warm-up window.
    pub fn latest_value(&self) -> Result<f64, CrossgateError> {
        match self.values.last() {
            Some(point) if point.valid => Ok(point.value),
            _ => Err(CrossgateError::InsufficientData {
                series: self.indicator_type.to_string(),
                bars: self.values.len(),
                minimum: self.indicator_type.window().max(1),
            }),
        }
    }

    /// Values with warm-up positions as `None`, for charting.
    pub fn as_options(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| if p.valid { Some(p.value) } else { None })
            .collect()
    }
}
