//! Bar resolution: an amount of a time unit, e.g. 10 minutes or 1 day.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    /// Suffix used by the market-data provider in its `timeframe` parameter.
    pub fn provider_suffix(&self) -> &'static str {
        match self {
            TimeUnit::Minute => "Min",
            TimeUnit::Hour => "Hour",
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
        }
    }

    /// Returns `true` if `amount` is accepted by the provider for this unit.
    pub fn accepts(&self, amount: u32) -> bool {
        match self {
            TimeUnit::Minute => (1..=59).contains(&amount),
            TimeUnit::Hour => (1..=23).contains(&amount),
            TimeUnit::Day | TimeUnit::Week => amount == 1,
            TimeUnit::Month => matches!(amount, 1 | 2 | 3 | 6 | 12),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" | "min" | "minutes" => Ok(TimeUnit::Minute),
            "hour" | "hours" => Ok(TimeUnit::Hour),
            "day" | "days" => Ok(TimeUnit::Day),
            "week" | "weeks" => Ok(TimeUnit::Week),
            "month" | "months" => Ok(TimeUnit::Month),
            other => Err(format!("unknown time unit '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub amount: u32,
    pub unit: TimeUnit,
}

impl Resolution {
    pub fn new(amount: u32, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }

    /// One bar per trading day; used for the return history.
    pub fn daily() -> Self {
        Self::new(1, TimeUnit::Day)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.provider_suffix())
    }
}
