//! Decision gate combining the crossover signal with the risk estimate.

use crate::domain::order::{Order, Side, TimeInForce};
use crate::domain::risk::RiskSummary;
use crate::domain::signal::Decision;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SubmitBuy,
    SubmitSell,
    NoAction,
}

impl Action {
    pub fn side(&self) -> Option<Side> {
        match self {
            Action::SubmitBuy => Some(Side::Buy),
            Action::SubmitSell => Some(Side::Sell),
            Action::NoAction => None,
        }
    }

    pub fn order(&self, symbol: &str, quantity: u32, time_in_force: TimeInForce) -> Option<Order> {
        self.side()
            .map(|side| Order::market(symbol, quantity, side, time_in_force))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SubmitBuy => write!(f, "buy order"),
            Action::SubmitSell => write!(f, "sell order"),
            Action::NoAction => write!(f, "hold order"),
        }
    }
}

/// Buys require a positive mean historical return; sells are unconditional.
pub fn decide_action(decision: Decision, risk: &RiskSummary) -> Action {
    match decision {
        Decision::Buy if risk.mean > 0.0 => Action::SubmitBuy,
        Decision::Sell => Action::SubmitSell,
        _ => Action::NoAction,
    }
}
