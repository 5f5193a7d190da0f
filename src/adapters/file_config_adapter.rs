//! INI file configuration adapter.

use crate::domain::error::QualmomError;
use crate::ports::config_port::{invalid_value, parse_bool, ConfigPort};
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QualmomError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| QualmomError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, QualmomError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| QualmomError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, QualmomError> {
        let Some(raw) = self.get_non_empty(section, key) else {
            return Ok(default);
        };
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .ok_or_else(|| invalid_value(section, key, "an integer", &raw))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, QualmomError> {
        let Some(raw) = self.get_non_empty(section, key) else {
            return Ok(default);
        };
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .ok_or_else(|| invalid_value(section, key, "a number", &raw))
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, QualmomError> {
        match self.get_non_empty(section, key) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| invalid_value(section, key, "a boolean", &raw)),
            None => Ok(default),
        }
    }
}
