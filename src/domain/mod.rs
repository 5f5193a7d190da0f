//! Core decision logic and types.

pub mod price;
pub mod momentum;
pub mod regime;
pub mod fundamentals;
pub mod selection;
pub mod position;
pub mod portfolio;
pub mod universe;
pub mod allocation;
pub mod config;
pub mod rebalance;
pub mod error;
