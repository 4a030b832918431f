//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::BarSeries;
use chrono::{DateTime, Utc};

pub const DEFAULT_SHORT_WINDOW: usize = 10;
pub const DEFAULT_LONG_WINDOW: usize = 50;

/// Short and long moving averages over the same closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverages {
    pub short: IndicatorSeries,
    pub long: IndicatorSeries,
}

/// Each window is summed directly rather than with a running total, so the
/// value at `i` depends only on the `period` closes ending at `i`.
pub fn calculate_sma(
    timestamps: &[DateTime<Utc>],
    closes: &[f64],
    period: usize,
) -> IndicatorSeries {
    let mut values = Vec::with_capacity(closes.len());

    for (i, (&timestamp, _)) in timestamps.iter().zip(closes).enumerate() {
        let valid = period > 0 && i + 1 >= period;

        let value = if valid {
            let window = &closes[i + 1 - period..=i];
            window.iter().sum::<f64>() / period as f64
        } else {
            0.0
        };

        values.push(IndicatorPoint {
            timestamp,
            valid,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

pub fn moving_averages(series: &BarSeries, short: usize, long: usize) -> MovingAverages {
    let timestamps = series.timestamps();
    let closes = series.closes();
    MovingAverages {
        short: calculate_sma(&timestamps, &closes, short),
        long: calculate_sma(&timestamps, &closes, long),
    }
}
