use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use serde::Deserialize;

use super::table::DEFAULT_TOML;
use crate::unicode::is_kana;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Deserialize)]
struct SyllableConfig {
    kana: BTreeMap<String, String>,
    hiragana: BTreeMap<String, String>,
    katakana: BTreeMap<String, String>,
    #[serde(default)]
    particles: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SyllableConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[{0}] table is empty")]
    Empty(&'static str),
    #[error("[kana] key must be a single kana character: {0}")]
    KanaKey(String),
    #[error("[{section}] romanized text must be lowercase ASCII: {text}")]
    NotRomanized { section: &'static str, text: String },
    #[error("[{section}] empty value for key: {key}")]
    EmptyValue { section: &'static str, key: String },
    #[error("syllable tables already initialized")]
    AlreadyInitialized,
}

/// Entry counts per table, reported by `dictool tables-validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSizes {
    pub kana: usize,
    pub hiragana: usize,
    pub katakana: usize,
    pub particles: usize,
}

/// The static lookup data shared by both transliteration directions.
///
/// - `kana`: kana character → romanized syllable
/// - `hiragana` / `katakana`: romanized syllable → kana spelling
/// - `particles`: romanized syllable → kana read irregularly as a particle
pub struct SyllableTables {
    pub(super) kana: HashMap<char, String>,
    pub(super) hiragana: BTreeMap<String, String>,
    pub(super) katakana: BTreeMap<String, String>,
    pub(super) particles: BTreeMap<String, Vec<String>>,
    /// Inverse of `particles` for single-character kana (は → "wa").
    pub(super) particle_readings: HashMap<char, String>,
}

impl SyllableTables {
    /// Parse and validate syllable tables from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self, SyllableConfigError> {
        let config: SyllableConfig =
            toml::from_str(toml_str).map_err(|e| SyllableConfigError::Parse(e.to_string()))?;

        if config.kana.is_empty() {
            return Err(SyllableConfigError::Empty("kana"));
        }
        if config.hiragana.is_empty() {
            return Err(SyllableConfigError::Empty("hiragana"));
        }
        if config.katakana.is_empty() {
            return Err(SyllableConfigError::Empty("katakana"));
        }

        let mut kana = HashMap::with_capacity(config.kana.len());
        for (key, reading) in config.kana {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(c), None) if is_kana(c) => c,
                _ => return Err(SyllableConfigError::KanaKey(key)),
            };
            check_romanized("kana", &reading)?;
            kana.insert(ch, reading);
        }

        check_reverse("hiragana", &config.hiragana)?;
        check_reverse("katakana", &config.katakana)?;

        let mut particle_readings = HashMap::new();
        for (key, forms) in &config.particles {
            check_romanized("particles", key)?;
            if forms.is_empty() || forms.iter().any(|f| f.is_empty()) {
                return Err(SyllableConfigError::EmptyValue {
                    section: "particles",
                    key: key.clone(),
                });
            }
            for form in forms {
                let mut chars = form.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    particle_readings.insert(c, key.clone());
                }
            }
        }

        Ok(Self {
            kana,
            hiragana: config.hiragana,
            katakana: config.katakana,
            particles: config.particles,
            particle_readings,
        })
    }

    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), SyllableConfigError> {
        // Validate eagerly
        Self::from_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| SyllableConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global tables.
    pub fn global() -> &'static SyllableTables {
        static INSTANCE: OnceLock<SyllableTables> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            SyllableTables::from_toml(toml_str).expect("syllable TOML must be valid")
        })
    }

    pub fn sizes(&self) -> TableSizes {
        TableSizes {
            kana: self.kana.len(),
            hiragana: self.hiragana.len(),
            katakana: self.katakana.len(),
            particles: self.particles.len(),
        }
    }

    /// Romanized reading of a single kana character, ignoring context.
    pub fn reading(&self, kana: char) -> Option<&str> {
        self.kana.get(&kana).map(String::as_str)
    }

    /// Every romanized syllable the reverse direction can resolve, sorted.
    pub fn syllables(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .hiragana
            .keys()
            .chain(self.katakana.keys())
            .chain(self.particles.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}

fn check_romanized(section: &'static str, text: &str) -> Result<(), SyllableConfigError> {
    if text.is_empty() || !text.is_ascii() || text.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(SyllableConfigError::NotRomanized {
            section,
            text: text.to_string(),
        });
    }
    Ok(())
}

fn check_reverse(
    section: &'static str,
    map: &BTreeMap<String, String>,
) -> Result<(), SyllableConfigError> {
    for (key, value) in map {
        check_romanized(section, key)?;
        if value.is_empty() {
            return Err(SyllableConfigError::EmptyValue {
                section,
                key: key.clone(),
            });
        }
    }
    Ok(())
}
