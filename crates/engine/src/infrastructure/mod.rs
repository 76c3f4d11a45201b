//! Infrastructure - ports and the process-level implementations behind them.

pub mod config;
pub mod ports;
pub mod random;
