//! Historical-method risk estimate over daily returns.
//!
//! r[i-1] = (C[i] - C[i-1]) / C[i-1] for i >= 1
//!
//! The mean return gates buy orders. The percentile VaR is reported
//! alongside it but never consulted by the gate.

use tracing::warn;

use crate::domain::error::CrossgateError;

pub const MIN_HISTORY_CLOSES: usize = 2;
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskSummary {
    /// Mean daily return; the point estimate of expected daily return.
    pub mean: f64,
    /// Loss not exceeded at `confidence`, as a positive fraction.
    pub value_at_risk: f64,
    pub confidence: f64,
    pub observations: usize,
}

pub fn daily_returns(closes: &[f64]) -> Result<Vec<f64>, CrossgateError> {
    if closes.len() < MIN_HISTORY_CLOSES {
        return Err(CrossgateError::InsufficientHistory {
            closes: closes.len(),
            minimum: MIN_HISTORY_CLOSES,
        });
    }

    // A zero base close divides through to an infinite or NaN return.
    for (index, close) in closes[..closes.len() - 1].iter().enumerate() {
        if *close <= 0.0 {
            warn!(index, close, "non-positive close, daily return is not finite");
        }
    }

    Ok(closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect())
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in [0, 1]. Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Historical VaR: the loss at the (1 - confidence) percentile of returns.
pub fn historical_var(returns: &[f64], confidence: f64) -> f64 {
    (-percentile(returns, 1.0 - confidence)).max(0.0)
}

pub fn estimate_risk(closes: &[f64], confidence: f64) -> Result<RiskSummary, CrossgateError> {
    let returns = daily_returns(closes)?;
    Ok(summarize(&returns, confidence))
}

pub fn summarize(returns: &[f64], confidence: f64) -> RiskSummary {
    RiskSummary {
        mean: mean(returns),
        value_at_risk: historical_var(returns, confidence),
        confidence,
        observations: returns.len(),
    }
}
