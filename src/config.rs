//! Environment configuration. Every variable is optional.
//!
//! - `MENAT_DATA_PATH`: dataset file (`.json`, `.yaml`, `.yml`), default `data/frames.json`
//! - `MENAT_BIND`: server bind address, default `127.0.0.1:3000`
//! - `MENAT_TOKEN`: shared token required by mutating server routes when set
//! - `MENAT_CHARACTER_THRESHOLD` / `MENAT_MOVE_THRESHOLD`: fuzzy cutoffs (0-100), default 65

use std::env;
use std::path::PathBuf;

use crate::data::loader::DEFAULT_DATASET_PATH;
use crate::frames::fuzzy::Score;
use crate::frames::matcher::{MatchThresholds, DEFAULT_CHARACTER_THRESHOLD, DEFAULT_MOVE_THRESHOLD};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub bind_addr: String,
    pub token: Option<String>,
    pub thresholds: MatchThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATASET_PATH),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            token: None,
            thresholds: MatchThresholds::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; tests pass a closure over a map instead of the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_path: non_empty("MENAT_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH)),
            bind_addr: non_empty("MENAT_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            token: non_empty("MENAT_TOKEN"),
            thresholds: MatchThresholds {
                character: parse_threshold(
                    non_empty("MENAT_CHARACTER_THRESHOLD"),
                    "MENAT_CHARACTER_THRESHOLD",
                    DEFAULT_CHARACTER_THRESHOLD,
                ),
                alias: parse_threshold(
                    non_empty("MENAT_MOVE_THRESHOLD"),
                    "MENAT_MOVE_THRESHOLD",
                    DEFAULT_MOVE_THRESHOLD,
                ),
            },
        }
    }
}

fn parse_threshold(raw: Option<String>, name: &str, default: Score) -> Score {
    let Some(value) = raw else {
        return default;
    };
    match value.trim().parse::<Score>() {
        Ok(parsed) if parsed <= 100 => parsed,
        _ => {
            log::warn!("invalid {name} '{value}', defaulting to {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("MENAT_DATA_PATH", "custom/frames.yaml"),
            ("MENAT_BIND", "0.0.0.0:8080"),
            ("MENAT_TOKEN", "secret"),
            ("MENAT_CHARACTER_THRESHOLD", "70"),
            ("MENAT_MOVE_THRESHOLD", "80"),
        ]);
        assert_eq!(config.data_path, PathBuf::from("custom/frames.yaml"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.thresholds, MatchThresholds { character: 70, alias: 80 });
    }

    #[test]
    fn invalid_thresholds_fall_back() {
        let config = config_from(&[
            ("MENAT_CHARACTER_THRESHOLD", "101"),
            ("MENAT_MOVE_THRESHOLD", "lots"),
        ]);
        assert_eq!(config.thresholds, MatchThresholds::default());
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = config_from(&[("MENAT_TOKEN", "  ")]);
        assert_eq!(config.token, None);
    }
}
