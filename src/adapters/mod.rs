//! Concrete adapter implementations for ports.

pub mod alpaca_adapter;
pub mod csv_adapter;
pub mod dry_run_adapter;
pub mod env_config_adapter;
pub mod file_config_adapter;
pub mod svg_report;
