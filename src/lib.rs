//! qualmom: quality/momentum equity rotation with a bond-basket regime switch.
//!
//! Hexagonal architecture: decision logic in [`domain`], port traits in [`ports`],
//! concrete file-based implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
