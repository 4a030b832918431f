//! Market order representation.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeInForce {
    Day,
    #[default]
    Gtc,
    Opg,
    Cls,
    Ioc,
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Opg => "opg",
            TimeInForce::Cls => "cls",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Fok => "fok",
        }
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(TimeInForce::Day),
            "gtc" => Ok(TimeInForce::Gtc),
            "opg" => Ok(TimeInForce::Opg),
            "cls" => Ok(TimeInForce::Cls),
            "ioc" => Ok(TimeInForce::Ioc),
            "fok" => Ok(TimeInForce::Fok),
            other => Err(format!("unknown time in force '{other}'")),
        }
    }
}

/// A fire-and-forget order; nothing tracks it after submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub symbol: String,
    pub quantity: u32,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
}

impl Order {
    pub fn market(symbol: &str, quantity: u32, side: Side, time_in_force: TimeInForce) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity,
            side,
            order_type: OrderType::Market,
            time_in_force,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({})",
            self.order_type.as_str(),
            self.side,
            self.quantity,
            self.symbol,
            self.time_in_force.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_order_defaults() {
        let order = Order::market("VOO", 1, Side::Buy, TimeInForce::default());
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.time_in_force, TimeInForce::Gtc);
        assert_eq!(order.to_string(), "market buy 1 VOO (gtc)");
    }

    #[test]
    fn parse_time_in_force() {
        assert_eq!("GTC".parse::<TimeInForce>(), Ok(TimeInForce::Gtc));
        assert_eq!("ioc".parse::<TimeInForce>(), Ok(TimeInForce::Ioc));
        assert!("forever".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn side_strings() {
        assert_eq!(Side::Buy.as_str(), "buy");
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
