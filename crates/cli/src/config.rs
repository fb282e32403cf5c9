//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use crate::commands::OutputFormat;

/// Settings that are not part of any graph document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliConfig {
    pub log_to_file: bool,
    pub log_dir: Option<PathBuf>,
    pub monsters_path: Option<PathBuf>,
    pub weapons_path: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DPR_LOG_FILE` - Also write logs to a file (default: false)
    /// - `DPR_LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `DPR_MONSTERS` - Monster catalog RON file (default: built-in bestiary)
    /// - `DPR_WEAPONS` - Weapon catalog RON file (default: built-in weapons)
    /// - `DPR_OUTPUT_FORMAT` - `summary` or `json` (default: summary)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(enable) = parse::<bool>(lookup("DPR_LOG_FILE")) {
            config.log_to_file = enable;
        } else if lookup("DPR_LOG_FILE").is_some() {
            // Accept a bare variable as "true"
            config.log_to_file = true;
        }

        config.log_dir = lookup("DPR_LOG_DIR").map(PathBuf::from);
        if config.log_dir.is_some() {
            config.log_to_file = true;
        }

        config.monsters_path = lookup("DPR_MONSTERS").map(PathBuf::from);
        config.weapons_path = lookup("DPR_WEAPONS").map(PathBuf::from);
        config.output_format = parse(lookup("DPR_OUTPUT_FORMAT"));

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), CliConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("DPR_LOG_FILE", "true"),
            ("DPR_MONSTERS", "/tmp/monsters.ron"),
            ("DPR_WEAPONS", "weapons.ron"),
            ("DPR_OUTPUT_FORMAT", "JSON"),
        ]);
        assert!(config.log_to_file);
        assert_eq!(config.monsters_path, Some(PathBuf::from("/tmp/monsters.ron")));
        assert_eq!(config.weapons_path, Some(PathBuf::from("weapons.ron")));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn log_flag_accepts_bare_variable_and_log_dir() {
        assert!(config_from(&[("DPR_LOG_FILE", "")]).log_to_file);
        assert!(!config_from(&[("DPR_LOG_FILE", "false")]).log_to_file);
        assert!(config_from(&[("DPR_LOG_DIR", "/var/log/dpr")]).log_to_file);
    }

    #[test]
    fn unknown_format_is_ignored() {
        assert_eq!(config_from(&[("DPR_OUTPUT_FORMAT", "yaml")]).output_format, None);
    }
}
