//! Daily price series as handed over by the market data port.

use chrono::NaiveDate;
use std::fmt;

/// Which column of a daily bar a series was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Samples for one security, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub code: String,
    pub field: PriceField,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(code: impl Into<String>, field: PriceField, points: Vec<PricePoint>) -> Self {
        Self {
            code: code.into(),
            field,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Values with the most recent `n` samples removed.
    pub fn values_skipping_recent(&self, n: usize) -> Vec<f64> {
        let keep = self.points.len().saturating_sub(n);
        self.points[..keep].iter().map(|p| p.value).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// True when dates strictly increase.
    pub fn is_chronological(&self) -> bool {
        self.points.windows(2).all(|w| w[0].date < w[1].date)
    }
}
