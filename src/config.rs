//! Settings read from `cntdwn.ini`.
//!
//! ```ini
//! [cntdwn]
//! logfile = cntdwn.log
//! loglevel = info
//! bell = true
//! notify = true
//! ```

use std::collections::HashMap;

use simplelog::LevelFilter;

pub const CONF_FILE_NAME: &str = "cntdwn.ini";
const CONF_SECTION: &str = "cntdwn";
const DEFAULT_LOG_FILE: &str = "cntdwn.log";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

type IniMap = HashMap<String, HashMap<String, Option<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub log_file: String,
  pub log_level: LevelFilter,
  /// Ring the terminal bell when a countdown finishes
  pub bell: bool,
  /// Post a desktop notification when a countdown finishes
  pub notify: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      log_file: DEFAULT_LOG_FILE.to_string(),
      log_level: DEFAULT_LOG_LEVEL,
      bell: true,
      notify: true,
    }
  }
}

impl Config {
  /// Load the config file, falling back to defaults when it is missing or unreadable.
  /// Runs before logging is up, so problems go to stderr.
  pub fn load(path: &str) -> Self {
    match ini!(safe path) {
      Ok(map) => Self::from_map(&map),
      Err(error) => {
        eprintln!("Warning: Couldn't load config file '{}': {}", path, error);
        eprintln!("Continuing with default values.");
        Self::default()
      }
    }
  }

  pub fn from_map(map: &IniMap) -> Self {
    let mut config = Self::default();
    let Some(section) = map.get(CONF_SECTION) else {
      return config;
    };

    if let Some(val) = section.get("logfile").and_then(|v| v.as_ref()) {
      let val = val.trim();
      if val.is_empty() {
        eprintln!("Warning: Empty logfile value, using default {}", DEFAULT_LOG_FILE);
      } else {
        config.log_file = val.to_string();
      }
    }
    if let Some(val) = section.get("loglevel").and_then(|v| v.as_ref()) {
      config.log_level = parse_level(val);
    }
    if let Some(val) = section.get("bell").and_then(|v| v.as_ref()) {
      config.bell = parse_flag(val, "bell", config.bell);
    }
    if let Some(val) = section.get("notify").and_then(|v| v.as_ref()) {
      config.notify = parse_flag(val, "notify", config.notify);
    }
    config
  }
}

fn parse_level(value: &str) -> LevelFilter {
  match value.trim().parse::<LevelFilter>() {
    Ok(level) => level,
    Err(_) => {
      eprintln!("Warning: Invalid loglevel value '{}', using default {}", value, DEFAULT_LOG_LEVEL);
      DEFAULT_LOG_LEVEL
    }
  }
}

fn parse_flag(value: &str, config_name: &str, default: bool) -> bool {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => true,
    "0" | "false" | "no" | "off" => false,
    _ => {
      eprintln!("Warning: Invalid {} value '{}', using default {}", config_name, value, default);
      default
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn map_of(pairs: &[(&str, &str)]) -> IniMap {
    let section = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), Some(v.to_string())))
      .collect();
    let mut map = HashMap::new();
    map.insert(CONF_SECTION.to_string(), section);
    map
  }

  #[test]
  fn test_empty_map_gives_defaults() {
    assert_eq!(Config::from_map(&HashMap::new()), Config::default());
  }

  #[test]
  fn test_all_values() {
    let config = Config::from_map(&map_of(&[
      ("logfile", "/tmp/timer.log"),
      ("loglevel", "debug"),
      ("bell", "no"),
      ("notify", "off"),
    ]));
    assert_eq!(config.log_file, "/tmp/timer.log");
    assert_eq!(config.log_level, LevelFilter::Debug);
    assert!(!config.bell);
    assert!(!config.notify);
  }

  #[test]
  fn test_invalid_values_fall_back() {
    let config = Config::from_map(&map_of(&[
      ("logfile", "  "),
      ("loglevel", "loud"),
      ("bell", "maybe"),
    ]));
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_missing_file_gives_defaults() {
    let config = Config::load("does-not-exist/cntdwn.ini");
    assert_eq!(config, Config::default());
  }
}
