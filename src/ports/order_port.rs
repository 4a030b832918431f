//! Order placement port trait.

use crate::domain::error::CrossgateError;
use crate::domain::order::Order;

/// Fire-and-forget order submission.
pub trait OrderPort {
    fn submit(&self, order: &Order) -> Result<(), CrossgateError>;
}
