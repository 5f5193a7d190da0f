//! CSV file market data adapter.
//!
//! Layout under the base directory:
//! - `fundamentals.csv`: `code,roe,roic,pb_ratio,market_cap,close`
//! - `{CODE}.csv`: `date,open,high,low,close,volume`

use crate::domain::error::QualmomError;
use crate::domain::fundamentals::{FundamentalRecord, FundamentalSnapshot};
use crate::domain::price::{PriceField, PricePoint, PriceSeries};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const FUNDAMENTALS_FILE: &str = "fundamentals.csv";

pub struct CsvMarketData {
    base_path: PathBuf,
    as_of: Option<NaiveDate>,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            as_of: None,
        }
    }

    /// Ignore rows dated after `date`.
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// `{base}/{CODE}.csv`; codes that could leave the base directory are refused.
    fn price_path(&self, code: &str) -> Result<PathBuf, QualmomError> {
        let safe = !code.is_empty()
            && !code.contains("..")
            && !code.contains(['/', '\\', ':'])
            && !Path::new(code).is_absolute();
        if !safe {
            return Err(QualmomError::Data {
                reason: format!("invalid security code {:?}", code),
            });
        }
        Ok(self.base_path.join(format!("{}.csv", code)))
    }

    fn read(&self, path: &PathBuf) -> Result<String, QualmomError> {
        fs::read_to_string(path).map_err(|e| QualmomError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn column<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> Result<&'r str, QualmomError> {
    record.get(index).ok_or_else(|| QualmomError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_f64(value: &str, name: &str) -> Result<f64, QualmomError> {
    value.trim().parse().map_err(|e| QualmomError::Data {
        reason: format!("invalid {} value: {}", name, e),
    })
}

/// Blank cells are missing values.
fn parse_optional_f64(value: &str, name: &str) -> Result<f64, QualmomError> {
    if value.trim().is_empty() {
        Ok(f64::NAN)
    } else {
        parse_f64(value, name)
    }
}

fn field_column(field: PriceField) -> (usize, &'static str) {
    match field {
        PriceField::Open => (1, "open"),
        PriceField::High => (2, "high"),
        PriceField::Low => (3, "low"),
        PriceField::Close => (4, "close"),
    }
}

impl MarketDataPort for CsvMarketData {
    fn fetch_fundamentals(&self) -> Result<FundamentalSnapshot, QualmomError> {
        let path = self.base_path.join(FUNDAMENTALS_FILE);
        let content = self.read(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut records = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QualmomError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let code = column(&record, 0, "code")?.trim().to_uppercase();
            if code.is_empty() {
                return Err(QualmomError::Data {
                    reason: "empty code in fundamentals".into(),
                });
            }

            records.push(FundamentalRecord {
                code,
                roe: parse_optional_f64(column(&record, 1, "roe")?, "roe")?,
                roic: parse_optional_f64(column(&record, 2, "roic")?, "roic")?,
                pb_ratio: parse_optional_f64(column(&record, 3, "pb_ratio")?, "pb_ratio")?,
                market_cap: parse_optional_f64(column(&record, 4, "market_cap")?, "market_cap")?,
                last_close: parse_optional_f64(column(&record, 5, "close")?, "close")?,
            });
        }

        Ok(FundamentalSnapshot::new(records))
    }

    fn fetch_price_history(
        &self,
        code: &str,
        field: PriceField,
        length: usize,
    ) -> Result<PriceSeries, QualmomError> {
        let path = self.price_path(code)?;
        if !path.exists() {
            return Err(QualmomError::NoData {
                code: code.to_string(),
            });
        }
        let content = self.read(&path)?;
        let (index, name) = field_column(field);

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QualmomError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = column(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                QualmomError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if self.as_of.is_some_and(|limit| date > limit) {
                continue;
            }

            let value = parse_f64(column(&record, index, name)?, name)?;
            points.push(PricePoint { date, value });
        }

        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        let skip = points.len().saturating_sub(length);
        points.drain(..skip);

        if points.is_empty() {
            return Err(QualmomError::NoData {
                code: code.to_string(),
            });
        }

        Ok(PriceSeries::new(code, field, points))
    }
}
