//! Detection engine configuration
//!
//! Every tunable of the engine lives in `DetectorConfig`, loadable
//! from a TOML file or built in code. Omitted fields fall back to
//! the defaults of the underlying algorithm.
//!
//! ```toml
//! # glossa.toml
//! languages = ["en", "de", "fr", "ja"]
//! profile = "short-text"
//! number_of_trials = 7
//! prob_threshold = 0.1
//! pattern = '[\p{L}\p{M}\p{N}\s]+'
//!
//! [map]
//! zh-cn = "zh"
//! zh-tw = "zh"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// The default language roster, used when `languages` is not
/// configured. Ordering matters: it fixes the index every
/// probability vector assigns to each language.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "ar", "bg", "bn", "cs", "da", "de", "el", "en", "es", "et", "fa", "fi", "fr", "gu", "he",
    "hi", "hr", "hu", "id", "it", "ja", "ko", "lt", "lv", "mk", "ml", "nl", "no", "pa", "pl",
    "pt", "ro", "ru", "sq", "sv", "ta", "te", "th", "tl", "tr", "uk", "ur", "vi", "zh-cn",
    "zh-tw",
];

/// Profile set to load: the default corpus or a named variant kept
/// in an equally named subdirectory of the profiles directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileVariant {
    #[default]
    Default,
    ShortText,
    MergedAverage,
}

impl ProfileVariant {
    /// Subdirectory for the variant, or `None` for the default set.
    pub fn subdir(&self) -> Option<&'static str> {
        match self {
            ProfileVariant::Default => None,
            ProfileVariant::ShortText => Some("short-text"),
            ProfileVariant::MergedAverage => Some("merged-average"),
        }
    }
}

/// Where the code remapping comes from: an inline table, or the
/// name of a JSON resource resolved against the profiles directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MapSource {
    Resource(String),
    Inline(HashMap<String, String>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    /// Ordered roster of language codes to load profiles for.
    pub languages: Vec<String>,
    /// Profile variant selector.
    pub profile: ProfileVariant,
    /// Monte-Carlo trials per detection call.
    pub number_of_trials: usize,
    /// Mean of the per-trial smoothing draw.
    pub alpha: f64,
    /// Standard deviation of the per-trial smoothing draw.
    pub alpha_width: f64,
    /// Hard ceiling on iterations per trial.
    pub iteration_limit: usize,
    /// Minimum probability a language needs to be reported.
    pub prob_threshold: f64,
    /// Early-exit cutoff on the maximum posterior component.
    pub conv_threshold: f64,
    /// Divisor of the smoothing weight.
    pub base_freq: u32,
    /// Admission pattern. Inputs that do not match it in full are
    /// rejected with an empty result.
    pub pattern: Option<String>,
    /// Cap on the number of reported languages.
    pub max: Option<usize>,
    /// Code remapping, inline or by resource name.
    pub map: Option<MapSource>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            profile: ProfileVariant::Default,
            number_of_trials: 7,
            alpha: 0.5,
            alpha_width: 0.05,
            iteration_limit: 10_000,
            prob_threshold: 0.1,
            conv_threshold: 0.999_99,
            base_freq: 10_000,
            pattern: None,
            max: None,
            map: None,
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_algorithm_constants() {
        let config = DetectorConfig::default();
        assert_eq!(config.number_of_trials, 7);
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.alpha_width, 0.05);
        assert_eq!(config.iteration_limit, 10_000);
        assert_eq!(config.prob_threshold, 0.1);
        assert_eq!(config.conv_threshold, 0.999_99);
        assert_eq!(config.base_freq, 10_000);
        assert_eq!(config.profile, ProfileVariant::Default);
        assert_eq!(config.languages.len(), 45);
        assert!(config.pattern.is_none());
        assert!(config.max.is_none());
        assert!(config.map.is_none());
    }

    #[test]
    fn test_toml_overrides_and_defaults_mix() {
        let config: DetectorConfig = toml::from_str(
            r#"
languages = ["en", "de"]
profile = "short-text"
number_of_trials = 3
max = 2
"#,
        )
        .unwrap();
        assert_eq!(config.languages, ["en", "de"]);
        assert_eq!(config.profile, ProfileVariant::ShortText);
        assert_eq!(config.number_of_trials, 3);
        assert_eq!(config.max, Some(2));
        // untouched fields keep their defaults
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.prob_threshold, 0.1);
    }

    #[test]
    fn test_map_as_inline_table() {
        let config: DetectorConfig = toml::from_str(
            r#"
[map]
zh-cn = "zh"
zh-tw = "zh"
"#,
        )
        .unwrap();
        match config.map {
            Some(MapSource::Inline(map)) => {
                assert_eq!(map.get("zh-cn").map(String::as_str), Some("zh"));
                assert_eq!(map.len(), 2);
            }
            other => panic!("expected inline map, got {other:?}"),
        }
    }

    #[test]
    fn test_map_as_resource_name() {
        let config: DetectorConfig = toml::from_str(r#"map = "language.json""#).unwrap();
        assert!(matches!(config.map, Some(MapSource::Resource(name)) if name == "language.json"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<DetectorConfig>("no_such_option = 1").is_err());
    }

    #[test]
    fn test_invalid_variant_rejected() {
        assert!(toml::from_str::<DetectorConfig>(r#"profile = "tiny-text""#).is_err());
    }
}
