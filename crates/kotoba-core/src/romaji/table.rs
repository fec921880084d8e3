pub(super) const DEFAULT_TOML: &str = include_str!("default_syllables.toml");

/// Returns the embedded default syllable tables as TOML.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}
