//! Ledger view of the portfolio and daily bookkeeping.

use std::collections::BTreeMap;

use super::position::Position;
use super::universe::BondBasket;

/// Values recorded once per day for tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    /// Marked portfolio value supplied by the ledger, if any.
    pub marked_value: Option<f64>,
    pub positions: BTreeMap<String, Position>,
}

impl Portfolio {
    pub fn new(cash: f64) -> Self {
        Portfolio {
            cash,
            marked_value: None,
            positions: BTreeMap::new(),
        }
    }

    pub fn with_marked_value(mut self, value: f64) -> Self {
        self.marked_value = Some(value);
        self
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.insert(position.code.clone(), position);
    }

    pub fn get_position(&self, code: &str) -> Option<&Position> {
        self.positions.get(code)
    }

    pub fn has_position(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Codes of held (non-flat) positions, ascending.
    pub fn held_codes(&self) -> impl Iterator<Item = &str> {
        self.positions
            .values()
            .filter(|p| p.is_open())
            .map(|p| p.code.as_str())
    }

    /// Mark-to-cost value of positions outside the bond basket.
    pub fn stock_cost_value(&self, bonds: &BondBasket) -> f64 {
        self.positions
            .values()
            .filter(|p| !bonds.contains(&p.code))
            .map(Position::cost_value)
            .sum()
    }

    /// Mark-to-cost value of positions inside the bond basket.
    pub fn bond_cost_value(&self, bonds: &BondBasket) -> f64 {
        self.positions
            .values()
            .filter(|p| bonds.contains(&p.code))
            .map(Position::cost_value)
            .sum()
    }

    /// Marked value when the ledger provides one, else cash plus mark-to-cost holdings.
    pub fn portfolio_value(&self) -> f64 {
        self.marked_value.unwrap_or_else(|| {
            self.cash + self.positions.values().map(Position::cost_value).sum::<f64>()
        })
    }

    pub fn daily_record(&self, bonds: &BondBasket) -> DailyRecord {
        let stocks = self.stock_cost_value(bonds);
        let bond_value = self.bond_cost_value(bonds);
        DailyRecord {
            stocks,
            bonds: bond_value,
            cash: self.cash,
            total_value: stocks + bond_value + self.cash,
        }
    }
}
