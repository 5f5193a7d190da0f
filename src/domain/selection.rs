//! Candidate selection: ROE shortlist, momentum scoring, threshold and ranking.
//!
//! A security whose history cannot be fetched or scored is skipped and
//! reported; it never aborts the selection.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, warn};

use crate::domain::config::SelectionConfig;
use crate::domain::error::{QualmomError, SeriesError};
use crate::domain::fundamentals::FundamentalSnapshot;
use crate::domain::momentum::{momentum_score, MomentumSignal};
use crate::domain::price::PriceField;
use crate::ports::data_port::MarketDataPort;

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    /// Dates in the returned history do not strictly increase.
    OutOfOrder,
    Series(SeriesError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => f.write_str(reason),
            SkipReason::OutOfOrder => f.write_str("price history is not in date order"),
            SkipReason::Series(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionResult {
    /// Codes that made the ROE shortlist, in rank order.
    pub shortlisted: Vec<String>,
    /// Scored above threshold, best first, capped at `num_stocks_to_trade`.
    pub survivors: Vec<MomentumSignal>,
    pub below_threshold: Vec<MomentumSignal>,
    pub skipped: Vec<SkippedCandidate>,
}

impl SelectionResult {
    pub fn survivor_codes(&self) -> Vec<String> {
        self.survivors.iter().map(|s| s.code.clone()).collect()
    }

    pub fn partial_failure(&self) -> Option<QualmomError> {
        if self.skipped.is_empty() {
            None
        } else {
            Some(QualmomError::PartialSelection {
                failed: self.skipped.len(),
                total: self.shortlisted.len(),
            })
        }
    }
}

/// Best score first; equal scores ordered by code.
pub fn rank_signals(signals: &mut [MomentumSignal]) {
    signals.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.code.cmp(&b.code))
    });
}

pub fn select_candidates(
    snapshot: &FundamentalSnapshot,
    market: &dyn MarketDataPort,
    config: &SelectionConfig,
) -> SelectionResult {
    let shortlist = snapshot.top_by_roe(config.roe_top_n);
    let length = config.history_length();

    let mut result = SelectionResult {
        shortlisted: shortlist.iter().map(|r| r.code.clone()).collect(),
        ..SelectionResult::default()
    };
    let mut passing = Vec::new();

    for record in shortlist {
        let code = &record.code;
        let series = match market.fetch_price_history(code, PriceField::Close, length) {
            Ok(s) => s,
            Err(e) => {
                warn!(%code, error = %e, "skipping candidate: price history unavailable");
                result.skipped.push(SkippedCandidate {
                    code: code.clone(),
                    reason: SkipReason::FetchFailed(e.to_string()),
                });
                continue;
            }
        };

        if !series.is_chronological() {
            warn!(%code, "skipping candidate: price history out of order");
            result.skipped.push(SkippedCandidate {
                code: code.clone(),
                reason: SkipReason::OutOfOrder,
            });
            continue;
        }

        let prices = series.values_skipping_recent(config.days_to_skip);
        let score = match momentum_score(&prices, config.momentum_lookback) {
            Ok(score) => score,
            Err(e) => {
                warn!(%code, error = %e, "skipping candidate: cannot score");
                result.skipped.push(SkippedCandidate {
                    code: code.clone(),
                    reason: SkipReason::Series(e),
                });
                continue;
            }
        };

        debug!(%code, roe = record.roe, score, last = ?series.last_date(), "scored");
        let signal = MomentumSignal {
            code: code.clone(),
            score,
        };
        if score > config.min_momentum_score {
            passing.push(signal);
        } else {
            result.below_threshold.push(signal);
        }
    }

    rank_signals(&mut passing);
    passing.truncate(config.num_stocks_to_trade);
    result.survivors = passing;
    result
}
