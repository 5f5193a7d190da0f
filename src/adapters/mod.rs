//! Concrete file-based adapters for the ports.

pub mod csv_adapter;
pub mod csv_ledger_adapter;
pub mod csv_target_writer;
pub mod file_config_adapter;
