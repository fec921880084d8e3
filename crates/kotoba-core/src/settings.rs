//! Global settings loaded from TOML, following the same OnceLock pattern as the
//! syllable tables.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub search: SearchSettings,
    pub ingest: IngestSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub max_results: usize,
    pub random_pool: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestSettings {
    pub example_language: String,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySettings {
    pub max_parts_of_speech: usize,
    pub max_meanings: usize,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(search.max_results);
    check_positive_usize!(search.random_pool);
    check_positive_usize!(ingest.batch_size);
    check_positive_usize!(display.max_parts_of_speech);
    check_positive_usize!(display.max_meanings);

    let lang = &s.ingest.example_language;
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(SettingsError::InvalidValue {
            field: "ingest.example_language".to_string(),
            reason: "must be a lowercase language tag".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = r#"
[search]
max_results = 25
random_pool = 5

[ingest]
example_language = "eng"
batch_size = 50

[display]
max_parts_of_speech = 2
max_meanings = 5
"#;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.search.max_results, 10);
        assert_eq!(s.search.random_pool, 10);
        assert_eq!(s.ingest.example_language, "jpn");
        assert_eq!(s.ingest.batch_size, 1000);
        assert_eq!(s.display.max_parts_of_speech, 3);
        assert_eq!(s.display.max_meanings, 3);
    }

    #[test]
    fn parse_valid_custom_toml() {
        let s = parse_settings_toml(CUSTOM).unwrap();
        assert_eq!(s.search.max_results, 25);
        assert_eq!(s.ingest.example_language, "eng");
        assert_eq!(s.display.max_meanings, 5);
    }

    #[test]
    fn error_zero_batch_size() {
        let toml = CUSTOM.replace("batch_size = 50", "batch_size = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("ingest.batch_size"));
    }

    #[test]
    fn error_zero_random_pool() {
        let toml = CUSTOM.replace("random_pool = 5", "random_pool = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("search.random_pool"));
    }

    #[test]
    fn error_bad_language_tag() {
        let toml = CUSTOM.replace("\"eng\"", "\"\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("example_language"));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("[search]\nmax_results = 1\nrandom_pool = 1\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_negative_value() {
        let toml = CUSTOM.replace("max_results = 25", "max_results = -1");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
