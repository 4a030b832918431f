//! Market data access port trait.

use crate::domain::error::CrossgateError;
use crate::domain::ohlcv::BarSeries;
use crate::domain::timeframe::Resolution;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` at `resolution` covering `start` through `end`,
    /// both dates inclusive.
    fn fetch_bars(
        &self,
        symbol: &str,
        resolution: Resolution,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, CrossgateError>;
}
