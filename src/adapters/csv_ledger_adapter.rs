//! Portfolio ledger read from a positions CSV (`code,quantity,cost_basis`).
//!
//! Long-only: negative quantities and negative or non-finite costs are rejected.

use crate::domain::error::QualmomError;
use crate::domain::portfolio::Portfolio;
use crate::domain::position::Position;
use crate::ports::portfolio_port::PortfolioPort;
use std::fs;
use std::path::PathBuf;

pub struct CsvLedger {
    positions_path: Option<PathBuf>,
    cash: f64,
    marked_value: Option<f64>,
}

impl CsvLedger {
    pub fn new(positions_path: Option<PathBuf>, cash: f64) -> Self {
        Self {
            positions_path,
            cash,
            marked_value: None,
        }
    }

    pub fn with_marked_value(mut self, value: f64) -> Self {
        self.marked_value = Some(value);
        self
    }

    fn read_positions(&self, path: &PathBuf) -> Result<Vec<Position>, QualmomError> {
        let content = fs::read_to_string(path).map_err(|e| QualmomError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut positions = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QualmomError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let code = record
                .get(0)
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| QualmomError::Data {
                    reason: "missing code column".into(),
                })?;

            let quantity: i64 = record
                .get(1)
                .ok_or_else(|| QualmomError::Data {
                    reason: "missing quantity column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| QualmomError::Data {
                    reason: format!("invalid quantity for {}: {}", code, e),
                })?;

            let cost_basis: f64 = record
                .get(2)
                .ok_or_else(|| QualmomError::Data {
                    reason: "missing cost_basis column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| QualmomError::Data {
                    reason: format!("invalid cost_basis for {}: {}", code, e),
                })?;

            if quantity < 0 {
                return Err(QualmomError::Data {
                    reason: format!("negative quantity {} for {}", quantity, code),
                });
            }
            if !cost_basis.is_finite() || cost_basis < 0.0 {
                return Err(QualmomError::Data {
                    reason: format!("invalid cost_basis {} for {}", cost_basis, code),
                });
            }

            positions.push(Position::new(code, quantity, cost_basis));
        }

        Ok(positions)
    }
}

impl PortfolioPort for CsvLedger {
    fn current_portfolio(&self) -> Result<Portfolio, QualmomError> {
        let mut portfolio = Portfolio::new(self.cash);
        if let Some(path) = &self.positions_path {
            for position in self.read_positions(path)? {
                if portfolio.has_position(&position.code) {
                    return Err(QualmomError::Data {
                        reason: format!("duplicate position for {}", position.code),
                    });
                }
                portfolio.add_position(position);
            }
        }
        if let Some(value) = self.marked_value {
            portfolio = portfolio.with_marked_value(value);
        }
        Ok(portfolio)
    }
}
