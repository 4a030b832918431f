//! Order sink for `--dry-run`: logs the order instead of sending it.

use std::cell::RefCell;

use tracing::info;

use crate::domain::error::CrossgateError;
use crate::domain::order::Order;
use crate::ports::order_port::OrderPort;

#[derive(Default)]
pub struct DryRunAdapter {
    submitted: RefCell<Vec<Order>>,
}

impl DryRunAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders that would have been sent, in submission order.
    pub fn submitted(&self) -> Vec<Order> {
        self.submitted.borrow().clone()
    }
}

impl OrderPort for DryRunAdapter {
    fn submit(&self, order: &Order) -> Result<(), CrossgateError> {
        info!(
            symbol = %order.symbol,
            side = %order.side,
            quantity = order.quantity,
            "dry run, {} not sent",
            order
        );
        self.submitted.borrow_mut().push(order.clone());
        Ok(())
    }
}
