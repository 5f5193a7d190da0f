//! Benchmark trend filter.
//!
//! change = B[n-1] / B[n-1-lookback] − 1
//! RiskOn iff change > 0 (strict: an unchanged benchmark is RiskOff).

use crate::domain::error::SeriesError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegimeState {
    RiskOn,
    RiskOff,
}

impl RegimeState {
    pub fn allows_equities(self) -> bool {
        self == RegimeState::RiskOn
    }
}

impl fmt::Display for RegimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegimeState::RiskOn => f.write_str("risk-on"),
            RegimeState::RiskOff => f.write_str("risk-off"),
        }
    }
}

/// Simple percentage change of the last sample against the one `lookback` samples earlier.
pub fn lookback_change(series: &[f64], lookback: usize) -> Result<f64, SeriesError> {
    let need = lookback + 1;
    if series.len() < need {
        return Err(SeriesError::InsufficientData {
            have: series.len(),
            need,
        });
    }

    let last_index = series.len() - 1;
    let ref_index = last_index - lookback;
    let reference = series[ref_index];
    let last = series[last_index];

    if !reference.is_finite() || reference <= 0.0 {
        return Err(SeriesError::InvalidPrice {
            index: ref_index,
            value: reference,
        });
    }
    if !last.is_finite() {
        return Err(SeriesError::InvalidPrice {
            index: last_index,
            value: last,
        });
    }

    Ok(last / reference - 1.0)
}

pub fn classify_regime(benchmark: &[f64], lookback: usize) -> Result<RegimeState, SeriesError> {
    let change = lookback_change(benchmark, lookback)?;
    if change > 0.0 {
        Ok(RegimeState::RiskOn)
    } else {
        Ok(RegimeState::RiskOff)
    }
}
