//! crossgate: single-pass moving-average crossover trader.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`cli`] wires them into one run.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
