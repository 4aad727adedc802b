use cc_api::client::DEFAULT_SHEET_ID;
use log::{LevelFilter, warn};
use std::path::PathBuf;
use std::time::Duration;

pub const SHEET_ID_VAR: &str = "CCTUI_SHEET_ID";
pub const REFRESH_SECS_VAR: &str = "CCTUI_REFRESH_SECS";
pub const SHEETS_DIR_VAR: &str = "CCTUI_SHEETS_DIR";
pub const LOG_VAR: &str = "CCTUI_LOG";

const DEFAULT_REFRESH_SECS: u64 = 60;
const MIN_REFRESH_SECS: u64 = 5;
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub sheet_id: String,
    pub refresh_interval: Duration,
    /// Read sheets from `{dir}/{key}.json` instead of Google.
    pub sheets_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            sheet_id: DEFAULT_SHEET_ID.to_owned(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            sheets_dir: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(id) = value(SHEET_ID_VAR) {
            settings.sheet_id = id;
        }

        if let Some(raw) = value(REFRESH_SECS_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) if secs >= MIN_REFRESH_SECS => {
                    settings.refresh_interval = Duration::from_secs(secs);
                }
                Ok(secs) => {
                    warn!("{REFRESH_SECS_VAR}={secs} is below {MIN_REFRESH_SECS}s, using {MIN_REFRESH_SECS}s");
                    settings.refresh_interval = Duration::from_secs(MIN_REFRESH_SECS);
                }
                Err(_) => warn!("ignoring {REFRESH_SECS_VAR}={raw}: not a number of seconds"),
            }
        }

        settings.sheets_dir = value(SHEETS_DIR_VAR).map(PathBuf::from);

        if let Some(raw) = value(LOG_VAR) {
            match raw.parse::<LevelFilter>() {
                Ok(level) => settings.log_level = Some(level),
                Err(_) => warn!("ignoring {LOG_VAR}={raw}: expected error|warn|info|debug|trace"),
            }
        }

        settings
    }

    /// Level for the log pane once settings are loaded.
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s, AppSettings::default());
        assert_eq!(s.sheet_id, DEFAULT_SHEET_ID);
        assert_eq!(s.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            (SHEET_ID_VAR, " abc123 "),
            (REFRESH_SECS_VAR, "120"),
            (SHEETS_DIR_VAR, "/tmp/sheets"),
            (LOG_VAR, "debug"),
        ]);
        assert_eq!(s.sheet_id, "abc123");
        assert_eq!(s.refresh_interval, Duration::from_secs(120));
        assert_eq!(s.sheets_dir, Some(PathBuf::from("/tmp/sheets")));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn log_filter_defaults_to_errors() {
        assert_eq!(settings(&[]).log_filter(), LevelFilter::Error);
        assert_eq!(settings(&[(LOG_VAR, "warn")]).log_filter(), LevelFilter::Warn);
        assert_eq!(settings(&[(LOG_VAR, "loud")]).log_filter(), LevelFilter::Error);
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[(REFRESH_SECS_VAR, "soon"), (LOG_VAR, "loud"), (SHEET_ID_VAR, "  ")]);
        assert_eq!(s.refresh_interval, Duration::from_secs(60));
        assert_eq!(s.log_level, None);
        assert_eq!(s.sheet_id, DEFAULT_SHEET_ID);
    }

    #[test]
    fn refresh_interval_has_a_floor() {
        let s = settings(&[(REFRESH_SECS_VAR, "1")]);
        assert_eq!(s.refresh_interval, Duration::from_secs(5));
    }
}
