//! Code lists from configuration and the fixed bond basket.

use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

/// Fixed set of bond instruments treated as one fungible sleeve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BondBasket {
    pub codes: Vec<String>,
}

impl BondBasket {
    /// Later duplicates are dropped; order is otherwise preserved.
    pub fn new(codes: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let codes = codes.into_iter().filter(|c| seen.insert(c.clone())).collect();
        Self { codes }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
