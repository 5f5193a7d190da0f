//! One rebalance cycle: regime, selection, allocation, hand-off.
//!
//! A [`RebalanceCycle`] can only be created by computing the regime, so
//! allocation never sees a regime from an earlier cycle. Fundamentals or
//! benchmark failures abort the cycle before anything is submitted.

use tracing::{info, warn};

use crate::domain::allocation::{allocate, AllocationInput, OptimizerRequest, TargetWeights};
use crate::domain::config::StrategyConfig;
use crate::domain::error::QualmomError;
use crate::domain::portfolio::Portfolio;
use crate::domain::price::PriceField;
use crate::domain::regime::{classify_regime, RegimeState};
use crate::domain::selection::{select_candidates, SelectionResult};
use crate::ports::data_port::MarketDataPort;
use crate::ports::execution_port::ExecutionPort;
use crate::ports::portfolio_port::PortfolioPort;

#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceOutcome {
    pub regime: RegimeState,
    pub selection: SelectionResult,
    pub weights: TargetWeights,
    /// False in record-only mode.
    pub submitted: bool,
}

/// Per-cycle state, valid only for the cycle it was created in.
pub struct RebalanceCycle<'a> {
    config: &'a StrategyConfig,
    portfolio: &'a Portfolio,
    regime: RegimeState,
    can_buy: bool,
}

impl<'a> RebalanceCycle<'a> {
    pub fn begin(
        market: &dyn MarketDataPort,
        config: &'a StrategyConfig,
        portfolio: &'a Portfolio,
    ) -> Result<Self, QualmomError> {
        let (regime, can_buy) = if config.filters_enabled {
            (current_regime(market, config)?, config.can_buy)
        } else {
            (RegimeState::RiskOn, true)
        };

        info!(%regime, can_buy, "cycle started");
        Ok(Self {
            config,
            portfolio,
            regime,
            can_buy,
        })
    }

    pub fn regime(&self) -> RegimeState {
        self.regime
    }

    pub fn can_buy(&self) -> bool {
        self.can_buy
    }

    pub fn rebalance(
        self,
        market: &dyn MarketDataPort,
        execution: &dyn ExecutionPort,
    ) -> Result<RebalanceOutcome, QualmomError> {
        let snapshot = market.fetch_fundamentals()?;
        if snapshot.is_empty() {
            return Err(QualmomError::Data {
                reason: "fundamentals snapshot is empty".to_string(),
            });
        }

        let selection = select_candidates(&snapshot, market, &self.config.selection);
        if let Some(partial) = selection.partial_failure() {
            warn!(error = %partial, "selection continued without some candidates");
        }
        let survivors = selection.survivor_codes();
        info!(
            shortlisted = selection.shortlisted.len(),
            survivors = survivors.len(),
            "selection complete"
        );

        let weights = allocate(&AllocationInput {
            portfolio: self.portfolio,
            bonds: &self.config.bonds,
            regime: self.regime,
            survivors: &survivors,
            can_buy: self.can_buy,
        })?;

        let submitted = if self.config.use_optimizer_weights {
            execution.submit(&OptimizerRequest::target_weights(weights.clone()))?;
            true
        } else {
            info!(targets = weights.len(), "record-only cycle, weights not submitted");
            false
        };

        Ok(RebalanceOutcome {
            regime: self.regime,
            selection,
            weights,
            submitted,
        })
    }
}

/// Fetches the benchmark and classifies the regime.
pub fn current_regime(
    market: &dyn MarketDataPort,
    config: &StrategyConfig,
) -> Result<RegimeState, QualmomError> {
    let series = market.fetch_price_history(
        &config.benchmark,
        PriceField::Close,
        config.benchmark_length(),
    )?;
    classify_regime(&series.values(), config.regime_lookback)
        .map_err(|e| QualmomError::series(&config.benchmark, e))
}

pub fn run_rebalance(
    market: &dyn MarketDataPort,
    ledger: &dyn PortfolioPort,
    execution: &dyn ExecutionPort,
    config: &StrategyConfig,
) -> Result<RebalanceOutcome, QualmomError> {
    let portfolio = ledger.current_portfolio()?;
    RebalanceCycle::begin(market, config, &portfolio)?.rebalance(market, execution)
}
