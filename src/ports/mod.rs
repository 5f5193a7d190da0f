//! Port traits the domain talks through.

pub mod config_port;
pub mod data_port;
pub mod portfolio_port;
pub mod execution_port;
