use crate::display::ChronoDateFormatter;
use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub short_date_format: String,
    pub detail_date_format: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            short_date_format: String::from("%-m/%-d/%y"),
            detail_date_format: String::from("%-m/%-d/%y, %-I:%M %p"),
            log_filter: String::from("info"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config
            .date_formatter()
            .with_context(|| format!("Bad date format in config {}", path.display()))?;
        Ok(config)
    }

    /// Environment (including anything `dotenvy` loaded) wins over the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(format) = lookup("TWEET_CELL_SHORT_DATE_FORMAT") {
            self.short_date_format = format;
        }
        if let Some(format) = lookup("TWEET_CELL_DETAIL_DATE_FORMAT") {
            self.detail_date_format = format;
        }
        if let Some(filter) = lookup("TWEET_CELL_LOG") {
            self.log_filter = filter;
        }
        self
    }

    pub fn date_formatter(&self) -> Result<ChronoDateFormatter<Local>> {
        ChronoDateFormatter::new(&self.short_date_format, &self.detail_date_format, Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{ "log_filter": "debug" }"#).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.short_date_format, Config::default().short_date_format);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TWEET_CELL_SHORT_DATE_FORMAT", "%d %b"),
            ("TWEET_CELL_LOG", "tweet_cell=trace"),
        ]);
        let config = Config::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.short_date_format, "%d %b");
        assert_eq!(config.detail_date_format, Config::default().detail_date_format);
        assert_eq!(config.log_filter, "tweet_cell=trace");
    }

    #[test]
    fn test_bad_override_is_rejected_before_formatting() {
        let config = Config::default().with_overrides(|key| {
            (key == "TWEET_CELL_DETAIL_DATE_FORMAT").then(|| String::from("%Q"))
        });

        let err = config.date_formatter().unwrap_err();
        assert_eq!(err.to_string(), "Invalid detail date format");
        assert!(Config::default().date_formatter().is_ok());
    }

    #[test]
    fn test_load_rejects_bad_date_format() {
        let path = env::temp_dir().join(format!("tweet-cell-{}.json", std::process::id()));
        fs::write(&path, r#"{ "short_date_format": "%Y-%" }"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("Bad date format in config"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/tweet-cell.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config"));
    }
}
