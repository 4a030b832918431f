//! Environment overlay for any [`ConfigPort`].
//!
//! `CROSSGATE_<SECTION>_<KEY>` overrides `[section] key`. The broker's own
//! `APCA_API_KEY_ID` / `APCA_API_SECRET_KEY` variables are honoured for the
//! credentials so secrets never have to live in the INI file.

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::ports::config_port::ConfigPort;
use std::collections::HashMap;
use std::fmt;

const PREFIX: &str = "CROSSGATE";

pub struct EnvConfigAdapter<C> {
    inner: C,
    vars: HashMap<String, String>,
}

impl<C: fmt::Debug> fmt::Debug for EnvConfigAdapter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfigAdapter")
            .field("inner", &self.inner)
            .field("vars", &self.vars.len())
            .finish()
    }
}

impl<C: ConfigPort> EnvConfigAdapter<C> {
    pub fn new(inner: C, vars: HashMap<String, String>) -> Self {
        Self { inner, vars }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<String> {
        let name = format!("{}_{}_{}", PREFIX, section, key).to_uppercase();
        if let Some(value) = self.vars.get(&name) {
            return Some(value.clone());
        }
        let alias = match (section, key) {
            ("alpaca", "key_id") => "APCA_API_KEY_ID",
            ("alpaca", "secret_key") => "APCA_API_SECRET_KEY",
            ("alpaca", "base_url") => "APCA_API_BASE_URL",
            _ => return None,
        };
        self.vars.get(alias).cloned()
    }
}

impl<C: ConfigPort> ConfigPort for EnvConfigAdapter<C> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key)
            .or_else(|| self.inner.get_string(section, key))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.inner.get_int(section, key, default),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.inner.get_double(section, key, default),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.lookup(section, key) {
            Some(v) => FileConfigAdapter::parse_bool(&v).unwrap_or(default),
            None => self.inner.get_bool(section, key, default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(ini: &str, vars: &[(&str, &str)]) -> EnvConfigAdapter<FileConfigAdapter> {
        let inner = FileConfigAdapter::from_string(ini).unwrap();
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfigAdapter::new(inner, vars)
    }

    #[test]
    fn prefixed_variable_overrides_file() {
        let config = overlay(
            "[trade]\nsymbol = VOO\n",
            &[("CROSSGATE_TRADE_SYMBOL", "SPY")],
        );
        assert_eq!(config.get_string("trade", "symbol"), Some("SPY".to_string()));
    }

    #[test]
    fn falls_through_to_file() {
        let config = overlay("[trade]\nsymbol = VOO\nquantity = 2\n", &[]);
        assert_eq!(config.get_string("trade", "symbol"), Some("VOO".to_string()));
        assert_eq!(config.get_int("trade", "quantity", 1), 2);
    }

    #[test]
    fn broker_credentials_from_conventional_names() {
        let config = overlay(
            "[alpaca]\nkey_id = from-file\n",
            &[("APCA_API_KEY_ID", "PKENV"), ("APCA_API_SECRET_KEY", "envsecret")],
        );
        assert_eq!(config.get_string("alpaca", "key_id"), Some("PKENV".to_string()));
        assert_eq!(
            config.get_string("alpaca", "secret_key"),
            Some("envsecret".to_string())
        );
    }

    #[test]
    fn prefixed_name_beats_conventional_alias() {
        let config = overlay(
            "",
            &[
                ("APCA_API_KEY_ID", "PKALIAS"),
                ("CROSSGATE_ALPACA_KEY_ID", "PKPREFIXED"),
            ],
        );
        assert_eq!(
            config.get_string("alpaca", "key_id"),
            Some("PKPREFIXED".to_string())
        );
    }

    #[test]
    fn numeric_overrides_parse_or_default() {
        let config = overlay(
            "[risk]\nhistogram_bins = 10\n",
            &[
                ("CROSSGATE_RISK_HISTOGRAM_BINS", "40"),
                ("CROSSGATE_RISK_VAR_CONFIDENCE", "ninety"),
                ("CROSSGATE_REPORT_ENABLED", "no"),
            ],
        );
        assert_eq!(config.get_int("risk", "histogram_bins", 25), 40);
        assert_eq!(config.get_double("risk", "var_confidence", 0.95), 0.95);
        assert!(!config.get_bool("report", "enabled", true));
    }

    #[test]
    fn debug_shows_wrapped_adapter() {
        let config = overlay(
            "[trade]\nsymbol = VOO\n",
            &[("APCA_API_SECRET_KEY", "envsecret")],
        );
        let debug = format!("{:?}", config);
        assert!(debug.contains("FileConfigAdapter"));
        assert!(!debug.contains("envsecret"));
    }
}
