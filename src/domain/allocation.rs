//! Target-weight allocation between the equity sleeve and the bond basket.
//!
//! Close stage: held codes that are not survivors go to 0. Bonds only go to
//! 0 once the regime is RiskOn again, and then all at once.
//!
//! Open stage (only when buying is allowed):
//! - RiskOn: every survivor gets 1/K.
//! - RiskOff: the basket shares max(0, 1 − stocks_at_cost / portfolio_value)
//!   equally, ramping into bonds while equities are wound down.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use crate::domain::error::QualmomError;
use crate::domain::portfolio::Portfolio;
use crate::domain::regime::RegimeState;
use crate::domain::universe::BondBasket;

/// Fraction of portfolio value per code. Unallocated value is implicit cash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetWeights {
    weights: BTreeMap<String, f64>,
}

impl TargetWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the weight of `code`, replacing any previous entry.
    pub fn set(&mut self, code: &str, weight: f64) {
        self.weights.insert(code.to_string(), weight);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.weights.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Codes being fully closed this cycle.
    pub fn closes(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, w)| *w == 0.0).map(|(k, _)| k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    NetExposure { min: f64, max: f64 },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NetExposure { min, max } => write!(f, "net_exposure({}, {})", min, max),
        }
    }
}

/// What the external optimizer receives each cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerRequest {
    pub weights: TargetWeights,
    pub constraints: Vec<Constraint>,
}

impl OptimizerRequest {
    /// Target weights bounded to a long-only, unlevered net exposure.
    pub fn target_weights(weights: TargetWeights) -> Self {
        Self {
            weights,
            constraints: vec![Constraint::NetExposure { min: 0.0, max: 1.0 }],
        }
    }
}

pub struct AllocationInput<'a> {
    pub portfolio: &'a Portfolio,
    pub bonds: &'a BondBasket,
    pub regime: RegimeState,
    pub survivors: &'a [String],
    pub can_buy: bool,
}

pub fn allocate(input: &AllocationInput<'_>) -> Result<TargetWeights, QualmomError> {
    let survivors: HashSet<&str> = input.survivors.iter().map(String::as_str).collect();
    let mut weights = TargetWeights::new();

    for code in input.portfolio.held_codes() {
        if survivors.contains(code) {
            continue;
        }
        if !input.bonds.contains(code) || input.regime.allows_equities() {
            weights.set(code, 0.0);
        }
    }

    if !input.can_buy {
        return Ok(weights);
    }

    match input.regime {
        RegimeState::RiskOn => {
            if !input.survivors.is_empty() {
                let each = 1.0 / survivors.len() as f64;
                for code in input.survivors {
                    weights.set(code, each);
                }
            }
        }
        RegimeState::RiskOff => {
            if input.bonds.is_empty() {
                return Ok(weights);
            }
            let bond_weight = bond_sleeve_weight(input.portfolio, input.bonds)?;
            let each = bond_weight / input.bonds.len() as f64;
            for code in &input.bonds.codes {
                weights.set(code, each);
            }
        }
    }

    Ok(weights)
}

/// 1 − stocks_at_cost / portfolio_value, clamped to [0, 1].
pub fn bond_sleeve_weight(portfolio: &Portfolio, bonds: &BondBasket) -> Result<f64, QualmomError> {
    let value = portfolio.portfolio_value();
    if !value.is_finite() || value <= 0.0 {
        return Err(QualmomError::Domain {
            reason: format!("portfolio value must be positive, got {}", value),
        });
    }
    let stock_fraction = portfolio.stock_cost_value(bonds) / value;
    Ok((1.0 - stock_fraction).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;

    fn basket() -> BondBasket {
        BondBasket::new(vec!["IEF".into(), "SHY".into(), "TLT".into()])
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(
        portfolio: &Portfolio,
        regime: RegimeState,
        survivors: &[String],
        can_buy: bool,
    ) -> TargetWeights {
        let bonds = basket();
        allocate(&AllocationInput {
            portfolio,
            bonds: &bonds,
            regime,
            survivors,
            can_buy,
        })
        .unwrap()
    }

    #[test]
    fn risk_on_equal_weights() {
        let p = Portfolio::new(10_000.0);
        let w = run(&p, RegimeState::RiskOn, &codes(&["AAA", "BBB", "CCC", "DDD"]), true);
        assert_eq!(w.len(), 4);
        for (_, weight) in w.iter() {
            assert_eq!(weight, 0.25);
        }
        assert!((w.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn risk_on_closes_stale_stocks_and_all_bonds() {
        let mut p = Portfolio::new(1_000.0);
        p.add_position(Position::new("OLD", 10, 10.0));
        p.add_position(Position::new("AAA", 10, 10.0));
        p.add_position(Position::new("TLT", 10, 100.0));
        let w = run(&p, RegimeState::RiskOn, &codes(&["AAA", "BBB"]), true);

        assert_eq!(w.get("OLD"), Some(0.0));
        assert_eq!(w.get("TLT"), Some(0.0));
        assert_eq!(w.get("AAA"), Some(0.5));
        assert_eq!(w.get("BBB"), Some(0.5));
        let mut closes: Vec<&str> = w.closes().collect();
        closes.sort();
        assert_eq!(closes, vec!["OLD", "TLT"]);
    }

    #[test]
    fn risk_on_without_survivors_goes_to_cash() {
        let mut p = Portfolio::new(1_000.0);
        p.add_position(Position::new("OLD", 10, 10.0));
        let w = run(&p, RegimeState::RiskOn, &[], true);
        assert_eq!(w.len(), 1);
        assert_eq!(w.get("OLD"), Some(0.0));
    }

    #[test]
    fn risk_off_keeps_held_bonds_and_ramps_basket() {
        let mut p = Portfolio::new(0.0);
        p.add_position(Position::new("AAA", 40, 10.0));
        p.add_position(Position::new("IEF", 6, 100.0));
        let p = p.with_marked_value(1_000.0);
        let w = run(&p, RegimeState::RiskOff, &codes(&["AAA"]), true);

        // stocks at cost 400 / 1000 → bonds share 0.6
        assert!(w.get("AAA").is_none());
        for bond in ["IEF", "SHY", "TLT"] {
            assert!((w.get(bond).unwrap() - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn risk_off_closes_stale_stocks() {
        let mut p = Portfolio::new(500.0);
        p.add_position(Position::new("OLD", 50, 10.0));
        let w = run(&p, RegimeState::RiskOff, &[], true);
        assert_eq!(w.get("OLD"), Some(0.0));
        for bond in ["IEF", "SHY", "TLT"] {
            assert!((w.get(bond).unwrap() - 0.5 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn risk_off_bond_weight_floors_at_zero() {
        let mut p = Portfolio::new(0.0);
        p.add_position(Position::new("AAA", 100, 10.0));
        let p = p.with_marked_value(800.0);
        let w = run(&p, RegimeState::RiskOff, &codes(&["AAA"]), true);
        for bond in ["IEF", "SHY", "TLT"] {
            assert_eq!(w.get(bond), Some(0.0));
        }
    }

    #[test]
    fn risk_off_with_zero_value_is_domain_error() {
        let p = Portfolio::new(0.0);
        let bonds = basket();
        let err = allocate(&AllocationInput {
            portfolio: &p,
            bonds: &bonds,
            regime: RegimeState::RiskOff,
            survivors: &[],
            can_buy: true,
        })
        .unwrap_err();
        assert!(matches!(err, QualmomError::Domain { .. }));
    }

    #[test]
    fn cannot_buy_only_closes() {
        let mut p = Portfolio::new(1_000.0);
        p.add_position(Position::new("OLD", 10, 10.0));
        p.add_position(Position::new("AAA", 10, 10.0));
        let on = run(&p, RegimeState::RiskOn, &codes(&["AAA", "BBB"]), false);
        assert_eq!(on.len(), 1);
        assert_eq!(on.get("OLD"), Some(0.0));

        let off = run(&p, RegimeState::RiskOff, &codes(&["AAA"]), false);
        assert_eq!(off.len(), 1);
        assert_eq!(off.get("OLD"), Some(0.0));
    }

    #[test]
    fn flat_positions_are_ignored() {
        let mut p = Portfolio::new(1_000.0);
        p.add_position(Position::new("GONE", 0, 10.0));
        let w = run(&p, RegimeState::RiskOn, &[], true);
        assert!(w.is_empty());
    }

    #[test]
    fn optimizer_request_carries_net_exposure() {
        let mut w = TargetWeights::new();
        w.set("AAA", 1.0);
        let req = OptimizerRequest::target_weights(w.clone());
        assert_eq!(req.weights, w);
        assert_eq!(
            req.constraints,
            vec![Constraint::NetExposure { min: 0.0, max: 1.0 }]
        );
        assert_eq!(req.constraints[0].to_string(), "net_exposure(0, 1)");
    }

    #[test]
    fn short_stock_does_not_lever_the_bond_sleeve() {
        let mut p = Portfolio::new(2_000.0);
        p.add_position(Position::new("AAA", -50, 20.0));
        let bonds = BondBasket::new(vec!["X".into(), "Y".into()]);
        let w = allocate(&AllocationInput {
            portfolio: &p,
            bonds: &bonds,
            regime: RegimeState::RiskOff,
            survivors: &[],
            can_buy: true,
        })
        .unwrap();

        assert_eq!(w.get("AAA"), Some(0.0));
        assert_eq!(w.get("X"), Some(0.5));
        assert_eq!(w.get("Y"), Some(0.5));
        assert!(w.total() <= 1.0);
    }
}
