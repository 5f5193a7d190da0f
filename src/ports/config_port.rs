//! Configuration access port trait.
//!
//! Typed getters return `default` only when the key is absent or blank; a
//! value that is present but does not parse is a `ConfigInvalid` error.

use crate::domain::error::QualmomError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, QualmomError>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, QualmomError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, QualmomError>;

    /// Raw value of a key that may legitimately be absent, with blanks treated as absent.
    fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Accepted boolean spellings, case-insensitive.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn invalid_value(section: &str, key: &str, expected: &str, value: &str) -> QualmomError {
    QualmomError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("expected {}, got '{}'", expected, value),
    }
}
