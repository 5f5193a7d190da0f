//! Per-cycle fundamentals snapshot and the return-on-equity shortlist.

use std::cmp::Ordering;

/// One security's fundamentals for the current cycle. Missing values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalRecord {
    pub code: String,
    pub roe: f64,
    pub roic: f64,
    pub pb_ratio: f64,
    pub market_cap: f64,
    pub last_close: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    pub records: Vec<FundamentalRecord>,
}

impl FundamentalSnapshot {
    pub fn new(records: Vec<FundamentalRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&FundamentalRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    /// The `n` records with the highest return on equity.
    ///
    /// Records without a finite ROE cannot be ranked and are left out.
    /// Equal ROE values are ordered by code, ascending.
    pub fn top_by_roe(&self, n: usize) -> Vec<&FundamentalRecord> {
        let mut ranked: Vec<&FundamentalRecord> =
            self.records.iter().filter(|r| r.roe.is_finite()).collect();
        ranked.sort_by(|a, b| {
            b.roe
                .partial_cmp(&a.roe)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.code.cmp(&b.code))
        });
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, roe: f64) -> FundamentalRecord {
        FundamentalRecord {
            code: code.to_string(),
            roe,
            roic: 0.1,
            pb_ratio: 2.0,
            market_cap: 1.0e9,
            last_close: 42.0,
        }
    }

    fn codes(records: &[&FundamentalRecord]) -> Vec<String> {
        records.iter().map(|r| r.code.clone()).collect()
    }

    #[test]
    fn ranks_descending_by_roe() {
        let snap = FundamentalSnapshot::new(vec![
            record("AAA", 0.10),
            record("BBB", 0.30),
            record("CCC", 0.20),
        ]);
        assert_eq!(codes(&snap.top_by_roe(10)), vec!["BBB", "CCC", "AAA"]);
    }

    #[test]
    fn truncates_to_n() {
        let snap = FundamentalSnapshot::new(vec![
            record("AAA", 0.10),
            record("BBB", 0.30),
            record("CCC", 0.20),
        ]);
        assert_eq!(codes(&snap.top_by_roe(2)), vec!["BBB", "CCC"]);
        assert!(snap.top_by_roe(0).is_empty());
    }

    #[test]
    fn ties_break_by_code() {
        let snap = FundamentalSnapshot::new(vec![
            record("ZZZ", 0.25),
            record("MMM", 0.25),
            record("AAA", 0.25),
            record("TOP", 0.40),
        ]);
        assert_eq!(
            codes(&snap.top_by_roe(3)),
            vec!["TOP", "AAA", "MMM"]
        );
    }

    #[test]
    fn missing_roe_is_excluded() {
        let snap = FundamentalSnapshot::new(vec![
            record("NAN", f64::NAN),
            record("INF", f64::INFINITY),
            record("OK", -0.05),
        ]);
        assert_eq!(codes(&snap.top_by_roe(5)), vec!["OK"]);
    }

    #[test]
    fn get_by_code() {
        let snap = FundamentalSnapshot::new(vec![record("AAA", 0.1)]);
        assert!(snap.get("AAA").is_some());
        assert!(snap.get("BBB").is_none());
        assert_eq!(snap.len(), 1);
        assert!(!snap.is_empty());
    }
}
