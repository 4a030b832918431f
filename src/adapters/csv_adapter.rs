//! CSV file data adapter for offline runs.
//!
//! Files are named `{SYMBOL}_{resolution}.csv` (e.g. `VOO_10Min.csv`,
//! `VOO_1Day.csv`) with header `timestamp,open,high,low,close,volume`.
//! Timestamps are RFC 3339 or plain `YYYY-MM-DD` (midnight UTC).

use crate::domain::error::CrossgateError;
use crate::domain::ohlcv::{Bar, BarSeries};
use crate::domain::timeframe::Resolution;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, resolution: Resolution) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, resolution))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CrossgateError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CrossgateError::DataRetrieval {
            reason: format!("invalid timestamp '{}'", value),
        })
}

fn field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, CrossgateError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| CrossgateError::DataRetrieval {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e: T::Err| CrossgateError::DataRetrieval {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        resolution: Resolution,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, CrossgateError> {
        let path = self.csv_path(symbol, resolution);
        let content = fs::read_to_string(&path).map_err(|e| CrossgateError::DataRetrieval {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| CrossgateError::DataRetrieval {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = parse_timestamp(record.get(0).unwrap_or_default())?;
            let date = timestamp.date_naive();
            if date < start || date > end {
                continue;
            }

            bars.push(Bar {
                timestamp,
                open: field(&record, 1, "open")?,
                high: field(&record, 2, "high")?,
                low: field(&record, 3, "low")?,
                close: field(&record, 4, "close")?,
                volume: field(&record, 5, "volume")?,
            });
        }

        BarSeries::new(symbol, resolution, bars)
    }
}
