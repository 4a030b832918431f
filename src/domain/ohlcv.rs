//! OHLCV bar and bar series representation.

use crate::domain::error::CrossgateError;
use crate::domain::timeframe::Resolution;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bars for one symbol at one resolution, strictly ordered by timestamp.
#[derive(Debug, Clone)]
pub struct BarSeries {
    symbol: String,
    resolution: Resolution,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Sorts `bars` by timestamp and rejects duplicate timestamps.
    pub fn new(
        symbol: impl Into<String>,
        resolution: Resolution,
        mut bars: Vec<Bar>,
    ) -> Result<Self, CrossgateError> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.timestamp);

        if let Some(pair) = bars.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(CrossgateError::DataRetrieval {
                reason: format!(
                    "duplicate bar for {} at {}",
                    symbol,
                    pair[1].timestamp.to_rfc3339()
                ),
            });
        }

        Ok(Self {
            symbol,
            resolution,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.bars.last().map(|b| b.timestamp)
    }
}
