//! Core domain types and logic. Nothing here performs I/O.

pub mod ohlcv;
pub mod timeframe;
pub mod indicator;
pub mod signal;
pub mod risk;
pub mod gate;
pub mod order;
pub mod config;
pub mod config_validation;
pub mod error;
