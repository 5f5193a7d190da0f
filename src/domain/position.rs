//! Held positions as reported by the external ledger.

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub code: String,
    pub quantity: i64,
    pub cost_basis: f64,
}

impl Position {
    pub fn new(code: impl Into<String>, quantity: i64, cost_basis: f64) -> Self {
        Self {
            code: code.into(),
            quantity,
            cost_basis,
        }
    }

    /// quantity × cost_basis
    pub fn cost_value(&self) -> f64 {
        self.quantity as f64 * self.cost_basis
    }

    pub fn is_open(&self) -> bool {
        self.quantity != 0
    }
}
