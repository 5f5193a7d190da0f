//! Order execution / portfolio optimizer port.

use crate::domain::allocation::OptimizerRequest;
use crate::domain::error::QualmomError;

/// Port for handing target weights to the external optimizer.
pub trait ExecutionPort {
    fn submit(&self, request: &OptimizerRequest) -> Result<(), QualmomError>;
}
