#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use qualmom::domain::allocation::OptimizerRequest;
use qualmom::domain::config::{SelectionConfig, StrategyConfig};
use qualmom::domain::error::QualmomError;
use qualmom::domain::fundamentals::{FundamentalRecord, FundamentalSnapshot};
use qualmom::domain::portfolio::Portfolio;
use qualmom::domain::position::Position;
use qualmom::domain::price::{PriceField, PricePoint, PriceSeries};
use qualmom::domain::universe::BondBasket;
use qualmom::ports::data_port::MarketDataPort;
use qualmom::ports::execution_port::ExecutionPort;
use qualmom::ports::portfolio_port::PortfolioPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockMarketData {
    pub fundamentals: Option<Vec<FundamentalRecord>>,
    pub prices: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, usize)>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            fundamentals: Some(Vec::new()),
            prices: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_fundamental(mut self, code: &str, roe: f64) -> Self {
        self.fundamentals
            .get_or_insert_with(Vec::new)
            .push(fundamental(code, roe));
        self
    }

    pub fn without_fundamentals(mut self) -> Self {
        self.fundamentals = None;
        self
    }

    pub fn with_prices(mut self, code: &str, prices: Vec<f64>) -> Self {
        self.prices.insert(code.to_string(), prices);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }

    pub fn requested_codes(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(c, _)| c.clone()).collect()
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_fundamentals(&self) -> Result<FundamentalSnapshot, QualmomError> {
        match &self.fundamentals {
            Some(records) => Ok(FundamentalSnapshot::new(records.clone())),
            None => Err(QualmomError::Data {
                reason: "fundamentals provider unavailable".into(),
            }),
        }
    }

    fn fetch_price_history(
        &self,
        code: &str,
        field: PriceField,
        length: usize,
    ) -> Result<PriceSeries, QualmomError> {
        self.requests
            .borrow_mut()
            .push((code.to_string(), length));
        if let Some(reason) = self.errors.get(code) {
            return Err(QualmomError::Data {
                reason: reason.clone(),
            });
        }
        let values = self.prices.get(code).ok_or_else(|| QualmomError::NoData {
            code: code.to_string(),
        })?;
        let skip = values.len().saturating_sub(length);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, &value)| PricePoint {
                date: start + Duration::days(i as i64),
                value,
            })
            .collect();
        Ok(PriceSeries::new(code, field, points))
    }
}

pub struct MockLedger {
    pub portfolio: Option<Portfolio>,
}

impl PortfolioPort for MockLedger {
    fn current_portfolio(&self) -> Result<Portfolio, QualmomError> {
        self.portfolio.clone().ok_or_else(|| QualmomError::Data {
            reason: "ledger unavailable".into(),
        })
    }
}

#[derive(Default)]
pub struct RecordingExecution {
    pub submitted: RefCell<Vec<OptimizerRequest>>,
}

impl RecordingExecution {
    pub fn count(&self) -> usize {
        self.submitted.borrow().len()
    }

    pub fn last(&self) -> Option<OptimizerRequest> {
        self.submitted.borrow().last().cloned()
    }
}

impl ExecutionPort for RecordingExecution {
    fn submit(&self, request: &OptimizerRequest) -> Result<(), QualmomError> {
        self.submitted.borrow_mut().push(request.clone());
        Ok(())
    }
}

pub fn fundamental(code: &str, roe: f64) -> FundamentalRecord {
    FundamentalRecord {
        code: code.to_string(),
        roe,
        roic: 0.12,
        pb_ratio: 3.0,
        market_cap: 5.0e10,
        last_close: 100.0,
    }
}

/// Noise-free exponential series whose momentum score equals `annual_pct`.
pub fn trending(annual_pct: f64, n: usize) -> Vec<f64> {
    let daily = (1.0 + annual_pct / 100.0).powf(1.0 / 252.0);
    (0..n).map(|i| 50.0 * daily.powi(i as i32)).collect()
}

/// Benchmark that ends `change` (fractional) above or below its value `lookback` samples earlier.
pub fn benchmark(lookback: usize, change: f64) -> Vec<f64> {
    let mut series = vec![400.0; lookback + 5];
    let last = series.len() - 1;
    series[last] = 400.0 * (1.0 + change);
    series
}

pub fn basket(codes: &[&str]) -> BondBasket {
    BondBasket::new(codes.iter().map(|c| c.to_string()).collect())
}

/// Small windows so tests do not need hundreds of samples.
pub fn test_config() -> StrategyConfig {
    StrategyConfig {
        selection: SelectionConfig {
            roe_top_n: 50,
            momentum_lookback: 20,
            days_to_skip: 3,
            history_buffer: 2,
            min_momentum_score: 30.0,
            num_stocks_to_trade: 2,
        },
        regime_lookback: 10,
        regime_padding: 5,
        benchmark: "SPY".to_string(),
        bonds: basket(&["X", "Y"]),
        use_optimizer_weights: true,
        can_buy: true,
        filters_enabled: true,
    }
}

pub fn portfolio(cash: f64, positions: &[(&str, i64, f64)]) -> Portfolio {
    let mut p = Portfolio::new(cash);
    for &(code, quantity, cost_basis) in positions {
        p.add_position(Position::new(code, quantity, cost_basis));
    }
    p
}
