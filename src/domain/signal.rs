//! Moving-average crossover signal.

use crate::domain::error::CrossgateError;
use crate::domain::indicator::sma::MovingAverages;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy => write!(f, "Buy"),
            Decision::Sell => write!(f, "Sell"),
            Decision::Hold => write!(f, "Hold"),
        }
    }
}

/// Buy when the short average is above the long one, Sell when below.
///
/// Equality is exact: only bit-identical averages produce `Hold`.
pub fn generate_signal(short_ma: f64, long_ma: f64) -> Decision {
    if short_ma > long_ma {
        Decision::Buy
    } else if short_ma < long_ma {
        Decision::Sell
    } else {
        Decision::Hold
    }
}

/// Signal from the latest defined point of each average.
pub fn signal_from_averages(averages: &MovingAverages) -> Result<Decision, CrossgateError> {
    let short = averages.short.latest_value()?;
    let long = averages.long.latest_value()?;
    Ok(generate_signal(short, long))
}
