//! Strategy configuration and its validation.
//!
//! All thresholds and toggles live in an immutable [`StrategyConfig`] that is
//! built once from a [`ConfigPort`] and passed into each cycle.

use crate::domain::error::QualmomError;
use crate::domain::universe::{parse_codes, BondBasket};
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "strategy";

/// Parameters of the candidate selection step.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub roe_top_n: usize,
    pub momentum_lookback: usize,
    pub days_to_skip: usize,
    /// Extra samples requested beyond lookback + skip.
    pub history_buffer: usize,
    pub min_momentum_score: f64,
    pub num_stocks_to_trade: usize,
}

impl SelectionConfig {
    /// Number of samples requested per candidate.
    pub fn history_length(&self) -> usize {
        self.momentum_lookback + self.days_to_skip + self.history_buffer
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            roe_top_n: 50,
            momentum_lookback: 126,
            days_to_skip: 10,
            history_buffer: 10,
            min_momentum_score: 30.0,
            num_stocks_to_trade: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub selection: SelectionConfig,
    pub regime_lookback: usize,
    /// Extra benchmark samples requested beyond lookback + 1.
    pub regime_padding: usize,
    pub benchmark: String,
    pub bonds: BondBasket,
    pub use_optimizer_weights: bool,
    pub can_buy: bool,
    /// When false the regime is always RiskOn and buying is always allowed.
    pub filters_enabled: bool,
}

impl StrategyConfig {
    pub fn benchmark_length(&self) -> usize {
        self.regime_lookback + self.regime_padding
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            regime_lookback: 63,
            regime_padding: 5,
            benchmark: "SPY".to_string(),
            bonds: BondBasket::new(vec!["IEF".into(), "SHY".into(), "TLT".into()]),
            use_optimizer_weights: true,
            can_buy: true,
            filters_enabled: true,
        }
    }
}

pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, QualmomError> {
    let defaults = StrategyConfig::default();
    let sel = &defaults.selection;

    let selection = SelectionConfig {
        roe_top_n: read_count(config, "roe_top_n", sel.roe_top_n, 1)?,
        momentum_lookback: read_count(config, "momentum_lookback", sel.momentum_lookback, 2)?,
        days_to_skip: read_count(config, "days_to_skip", sel.days_to_skip, 0)?,
        history_buffer: read_count(config, "history_buffer", sel.history_buffer, 0)?,
        min_momentum_score: read_score(config, sel.min_momentum_score)?,
        num_stocks_to_trade: read_count(config, "num_stocks_to_trade", sel.num_stocks_to_trade, 1)?,
    };

    let benchmark = config
        .get_non_empty(SECTION, "benchmark")
        .map(|s| s.to_uppercase())
        .unwrap_or(defaults.benchmark);

    let bonds = match config.get_string(SECTION, "bonds") {
        Some(list) => {
            let codes = parse_codes(&list).map_err(|e| invalid("bonds", &e.to_string()))?;
            BondBasket::new(codes)
        }
        None => defaults.bonds,
    };

    Ok(StrategyConfig {
        selection,
        regime_lookback: read_count(config, "regime_lookback", defaults.regime_lookback, 1)?,
        regime_padding: read_count(config, "regime_padding", defaults.regime_padding, 1)?,
        benchmark,
        bonds,
        use_optimizer_weights: config.get_bool(
            SECTION,
            "use_optimizer_weights",
            defaults.use_optimizer_weights,
        )?,
        can_buy: config.get_bool(SECTION, "can_buy", defaults.can_buy)?,
        filters_enabled: config.get_bool(SECTION, "filters_enabled", defaults.filters_enabled)?,
    })
}

fn read_count(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    minimum: i64,
) -> Result<usize, QualmomError> {
    let value = config.get_int(SECTION, key, default as i64)?;
    if value < minimum {
        return Err(invalid(key, &format!("{} must be at least {}", key, minimum)));
    }
    Ok(value as usize)
}

fn read_score(config: &dyn ConfigPort, default: f64) -> Result<f64, QualmomError> {
    let value = config.get_double(SECTION, "min_momentum_score", default)?;
    if !value.is_finite() {
        return Err(invalid("min_momentum_score", "min_momentum_score must be finite"));
    }
    Ok(value)
}

fn invalid(key: &str, reason: &str) -> QualmomError {
    QualmomError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
