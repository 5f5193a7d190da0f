//! Exponential-regression momentum score.
//!
//! score = ((e^(slope·252) − 1) · 100) · R², where slope and R² come from an
//! ordinary least-squares fit of ln(price) against the sample index.

use crate::domain::error::SeriesError;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Momentum score of one security within a scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumSignal {
    pub code: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// OLS fit of `ys` against x = 0..n-1.
///
/// A constant `ys` has no explained variance; R² is reported as 0.
/// Fewer than two samples give a flat line through the mean.
pub fn linear_regression(ys: &[f64]) -> Regression {
    let n = ys.len();
    if n < 2 {
        return Regression {
            slope: 0.0,
            intercept: ys.first().copied().unwrap_or(0.0),
            r_squared: 0.0,
        };
    }

    let nf = n as f64;
    let x_mean = (nf - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let mut ss_xy = 0.0;
    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    for (i, &y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        let dy = y - y_mean;
        ss_xy += dx * dy;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
    }

    let slope = ss_xy / ss_xx;
    let intercept = y_mean - slope * x_mean;
    let r_squared = if ss_yy == 0.0 {
        0.0
    } else {
        // Clamp rounding drift on perfect fits.
        ((ss_xy * ss_xy) / (ss_xx * ss_yy)).min(1.0)
    };

    Regression {
        slope,
        intercept,
        r_squared,
    }
}

/// Annualized percentage return implied by a daily log-slope.
pub fn annualize_log_slope(slope: f64) -> f64 {
    ((slope * TRADING_DAYS_PER_YEAR).exp() - 1.0) * 100.0
}

/// Momentum score of a chronologically ordered price series.
///
/// `min_len` is the configured lookback; the series must hold at least that
/// many samples (and never fewer than two).
pub fn momentum_score(prices: &[f64], min_len: usize) -> Result<f64, SeriesError> {
    let need = min_len.max(2);
    if prices.len() < need {
        return Err(SeriesError::InsufficientData {
            have: prices.len(),
            need,
        });
    }

    let mut log_prices = Vec::with_capacity(prices.len());
    for (index, &value) in prices.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(SeriesError::InvalidPrice { index, value });
        }
        log_prices.push(value.ln());
    }

    let fit = linear_regression(&log_prices);
    Ok(annualize_log_slope(fit.slope) * fit.r_squared)
}
