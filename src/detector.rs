//! Monte-Carlo language inference
//!
//! The detector scores an input against the shared profile store:
//! extract the in-vocabulary n-grams, then run independent trials
//! that sample n-grams at random and multiplicatively update a
//! posterior over languages, renormalizing every few iterations
//! until the maximum component converges or the iteration ceiling
//! is hit. Trial posteriors are averaged, thresholded, optionally
//! remapped, and ranked.
//!
//! The RNG is seeded to a fixed constant per call, so detection is
//! a pure function of the input and the loaded profiles.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tracing::{debug, trace};

use crate::config::{DetectorConfig, MapSource};
use crate::error::{GlossaError, Result};
use crate::models::Language;
use crate::ngram::{NGramGenerator, MAX_GRAM};
use crate::normalize::normalize_vietnamese;
use crate::profile::load_profiles;
use crate::store::ProfileStore;

/// Fixed seed for the per-call RNG.
const RANDOM_SEED: u64 = 0;

/// How often the trial loop renormalizes and checks convergence.
const CONV_CHECK_INTERVAL: usize = 5;

/// Matches every non-word code point (Unicode-aware); such
/// characters are blanked before n-gram extraction.
fn non_word_pattern() -> &'static Regex {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    NON_WORD.get_or_init(|| Regex::new(r"\W").expect("static pattern compiles"))
}

/// Optional remapping of internal language codes to external
/// labels. Codes without an entry pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct LanguageMap {
    map: HashMap<String, String>,
}

impl LanguageMap {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.map.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The inference engine. Holds a shared read-only profile store and
/// the settings fixed at construction; every call allocates its own
/// scratch state, so one instance serves many threads.
pub struct Detector {
    store: Arc<ProfileStore>,
    config: DetectorConfig,
    admission: Option<Regex>,
    map: LanguageMap,
}

impl Detector {
    /// Build a detector over an already-assembled store. Compiles
    /// the admission pattern and verifies the store's invariants;
    /// both failures are configuration errors.
    pub fn new(store: Arc<ProfileStore>, config: DetectorConfig) -> Result<Self> {
        store.verify()?;
        let admission = match config.pattern.as_deref() {
            // The whole input must match, not just a substring.
            Some(pattern) => Some(Regex::new(&format!("^(?:{pattern})$"))?),
            None => None,
        };
        Ok(Self {
            store,
            config,
            admission,
            map: LanguageMap::default(),
        })
    }

    pub fn with_map(mut self, map: LanguageMap) -> Self {
        self.map = map;
        self
    }

    /// Build a detector by loading profiles for the configured
    /// roster from `profiles_dir`, along with the code remapping
    /// the configuration points at.
    pub fn from_profiles_dir(profiles_dir: &Path, config: DetectorConfig) -> Result<Self> {
        let profiles = load_profiles(profiles_dir, config.profile, &config.languages)?;
        let store = Arc::new(ProfileStore::new(&profiles)?);
        let map = resolve_map(profiles_dir, config.map.as_ref())?;
        debug!("language detection ready for {:?}", store.languages());
        Ok(Self::new(store, config)?.with_map(map))
    }

    /// Language roster of the underlying store, in index order.
    pub fn languages(&self) -> &[String] {
        self.store.languages()
    }

    /// Detect candidate languages, ranked by probability
    /// descending. Empty when the input carries no signal: empty or
    /// all-out-of-vocabulary text, or an admission-pattern miss.
    /// The no-signal cases return early, before thresholding, so
    /// they stay empty even under a non-positive `prob_threshold`.
    pub fn detect_all(&self, text: &str) -> Vec<Language> {
        let text = normalize_vietnamese(text);
        if let Some(pattern) = &self.admission {
            if !pattern.is_match(&text) {
                return Vec::new();
            }
        }
        let cleaned = non_word_pattern().replace_all(&text, " ");
        let ngrams = self.extract_ngrams(&cleaned);
        if ngrams.is_empty() {
            return Vec::new();
        }
        let probabilities = self.detect_probabilities(&ngrams);
        let mut languages = self.to_languages(&probabilities);
        if let Some(max) = self.config.max {
            languages.truncate(max);
        }
        languages
    }

    /// Run the Monte-Carlo trials over a non-empty n-gram list and
    /// average the posterior over them.
    fn detect_probabilities(&self, ngrams: &[String]) -> Vec<f64> {
        let num_langs = self.store.len();
        let mut overall = vec![0.0; num_langs];
        if num_langs == 0 {
            return overall;
        }
        trace!("scoring {} in-vocabulary n-grams", ngrams.len());
        let trials = self.config.number_of_trials;
        let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
        for _ in 0..trials {
            let mut probs = vec![1.0 / num_langs as f64; num_langs];
            let weight = (self.config.alpha + next_gaussian(&mut rng) * self.config.alpha_width)
                / self.config.base_freq as f64;
            let mut i = 0;
            loop {
                let ngram = &ngrams[rng.gen_range(0..ngrams.len())];
                if let Some(vector) = self.store.probabilities(ngram) {
                    for (p, v) in probs.iter_mut().zip(vector) {
                        *p *= weight + v;
                    }
                }
                // Renormalizing every few iterations keeps the
                // products away from under/overflow.
                if i % CONV_CHECK_INTERVAL == 0
                    && (normalize_probabilities(&mut probs) > self.config.conv_threshold
                        || i >= self.config.iteration_limit)
                {
                    break;
                }
                i += 1;
            }
            for (o, p) in overall.iter_mut().zip(&probs) {
                *o += p / trials as f64;
            }
        }
        overall
    }

    /// Collect every in-vocabulary n-gram of the cleaned text, in
    /// stream order. Out-of-vocabulary grams are dropped.
    fn extract_ngrams(&self, text: &str) -> Vec<String> {
        let mut ngrams = Vec::new();
        let mut generator = NGramGenerator::new();
        for c in text.chars() {
            generator.push(c);
            for n in 1..=MAX_GRAM {
                if let Some(ngram) = generator.get(n) {
                    if self.store.contains(&ngram) {
                        ngrams.push(ngram);
                    }
                }
            }
        }
        ngrams
    }

    /// Threshold, remap, and rank the averaged posterior. The sort
    /// is stable, so equal probabilities keep roster order.
    fn to_languages(&self, probabilities: &[f64]) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .store
            .languages()
            .iter()
            .zip(probabilities.iter().copied())
            .filter(|&(_, p)| p > self.config.prob_threshold)
            .map(|(code, p)| Language::new(self.map.resolve(code), p))
            .collect();
        languages.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        languages
    }
}

/// Resolve the configured code remapping: inline table, named JSON
/// resource, or a `language.json` sitting next to the profiles.
fn resolve_map(profiles_dir: &Path, source: Option<&MapSource>) -> Result<LanguageMap> {
    let path = match source {
        Some(MapSource::Inline(map)) => return Ok(LanguageMap::new(map.clone())),
        Some(MapSource::Resource(name)) => profiles_dir.join(name),
        None => {
            let default = profiles_dir.join("language.json");
            if !default.is_file() {
                return Ok(LanguageMap::default());
            }
            default
        }
    };
    let raw = std::fs::read_to_string(&path).map_err(|e| GlossaError::MapResource {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let map: HashMap<String, String> =
        serde_json::from_str(&raw).map_err(|e| GlossaError::MapResource {
            path,
            reason: e.to_string(),
        })?;
    Ok(LanguageMap::new(map))
}

/// Renormalize `probs` to sum to one, returning the maximum
/// component.
fn normalize_probabilities(probs: &mut [f64]) -> f64 {
    let sum: f64 = probs.iter().sum();
    let mut max = 0.0;
    for p in probs.iter_mut() {
        *p /= sum;
        if *p > max {
            max = *p;
        }
    }
    max
}

/// Gaussian deviate via the Marsaglia polar method.
fn next_gaussian(rng: &mut StdRng) -> f64 {
    loop {
        let u = rng.gen_range(-1.0..1.0);
        let v = rng.gen_range(-1.0..1.0);
        let s: f64 = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}
