//! Market data access port.

use crate::domain::error::QualmomError;
use crate::domain::fundamentals::FundamentalSnapshot;
use crate::domain::price::{PriceField, PriceSeries};

pub trait MarketDataPort {
    /// Fundamentals for the provider's tradable universe, already screened.
    fn fetch_fundamentals(&self) -> Result<FundamentalSnapshot, QualmomError>;

    /// The `length` most recent daily samples of `field`, ascending by date.
    fn fetch_price_history(
        &self,
        code: &str,
        field: PriceField,
        length: usize,
    ) -> Result<PriceSeries, QualmomError>;
}
