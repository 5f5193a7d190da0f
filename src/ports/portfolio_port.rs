//! Portfolio ledger port.

use crate::domain::error::QualmomError;
use crate::domain::portfolio::Portfolio;

/// Read-only view of the externally owned ledger.
pub trait PortfolioPort {
    fn current_portfolio(&self) -> Result<Portfolio, QualmomError>;
}
