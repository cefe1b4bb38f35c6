//! Shared n-gram probability store
//!
//! Aggregates per-language profiles into the one structure the
//! detector scores against: n-gram -> dense vector of relative
//! frequencies, one slot per language in roster order. Built once
//! at startup and immutable afterwards, so it is safe to share by
//! reference across concurrent detection calls.

use std::collections::HashMap;

use crate::error::{GlossaError, Result};
use crate::ngram::MAX_GRAM;
use crate::profile::LangProfile;

#[derive(Debug, Default)]
pub struct ProfileStore {
    langs: Vec<String>,
    ngram_prob: HashMap<String, Vec<f64>>,
}

impl ProfileStore {
    /// Build the store from profiles in roster order. The index of
    /// a language in the roster is the index every probability
    /// vector uses for it, for the life of the store.
    pub fn new(profiles: &[LangProfile]) -> Result<Self> {
        let num_langs = profiles.len();
        let mut store = Self {
            langs: Vec::with_capacity(num_langs),
            ngram_prob: HashMap::new(),
        };
        for (index, profile) in profiles.iter().enumerate() {
            store.add_profile(profile, index, num_langs)?;
        }
        Ok(store)
    }

    fn add_profile(&mut self, profile: &LangProfile, index: usize, num_langs: usize) -> Result<()> {
        // Profiles can be built directly, bypassing the JSON parse
        // path, so the arity invariant is enforced here as well.
        if profile.n_words.len() != MAX_GRAM {
            return Err(GlossaError::InvalidProfile {
                name: profile.name.clone(),
                reason: format!(
                    "n_words has {} entries, expected {}",
                    profile.n_words.len(),
                    MAX_GRAM
                ),
            });
        }
        self.langs.push(profile.name.clone());
        for (ngram, &count) in &profile.freq {
            let len = ngram.chars().count();
            if len == 0 || len > MAX_GRAM {
                continue;
            }
            let total = profile.n_words[len - 1];
            if total == 0 {
                return Err(GlossaError::InvalidProfile {
                    name: profile.name.clone(),
                    reason: format!("'{ngram}' is present but the {len}-gram total is zero"),
                });
            }
            let vector = self
                .ngram_prob
                .entry(ngram.clone())
                .or_insert_with(|| vec![0.0; num_langs]);
            vector[index] = count as f64 / total as f64;
        }
        Ok(())
    }

    /// Check that every probability vector spans the full roster.
    /// Holds by construction; callers run it once before first use.
    pub fn verify(&self) -> Result<()> {
        let expected = self.langs.len();
        for (ngram, vector) in &self.ngram_prob {
            if vector.len() != expected {
                return Err(GlossaError::VectorLengthMismatch {
                    ngram: ngram.clone(),
                    actual: vector.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Language roster in insertion order.
    pub fn languages(&self) -> &[String] {
        &self.langs
    }

    pub fn len(&self) -> usize {
        self.langs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.langs.is_empty()
    }

    /// Number of distinct n-grams across all profiles.
    pub fn vocabulary_size(&self) -> usize {
        self.ngram_prob.len()
    }

    pub(crate) fn contains(&self, ngram: &str) -> bool {
        self.ngram_prob.contains_key(ngram)
    }

    pub(crate) fn probabilities(&self, ngram: &str) -> Option<&[f64]> {
        self.ngram_prob.get(ngram).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn profile(name: &str, n_words: [u64; 3], freq: &[(&str, u64)]) -> LangProfile {
        LangProfile {
            name: name.into(),
            n_words: n_words.to_vec(),
            freq: freq
                .iter()
                .map(|&(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_roster_order_is_index_order() {
        let store = ProfileStore::new(&[
            profile("aa", [1, 1, 1], &[("a", 1)]),
            profile("bb", [1, 1, 1], &[("b", 1)]),
        ])
        .unwrap();
        assert_eq!(store.languages(), ["aa", "bb"]);
        assert_eq!(store.probabilities("a"), Some(&[1.0, 0.0][..]));
        assert_eq!(store.probabilities("b"), Some(&[0.0, 1.0][..]));
    }

    #[test]
    fn test_relative_frequency_divides_by_length_total() {
        let store = ProfileStore::new(&[profile(
            "aa",
            [8, 4, 2],
            &[("x", 2), ("xy", 1), ("xyz", 1)],
        )])
        .unwrap();
        assert_eq!(store.probabilities("x"), Some(&[0.25][..]));
        assert_eq!(store.probabilities("xy"), Some(&[0.25][..]));
        assert_eq!(store.probabilities("xyz"), Some(&[0.5][..]));
    }

    #[test]
    fn test_vectors_span_all_languages() {
        let store = ProfileStore::new(&[
            profile("aa", [1, 1, 1], &[("a", 1)]),
            profile("bb", [1, 1, 1], &[("b", 1)]),
            profile("cc", [1, 1, 1], &[("a", 1), ("c", 1)]),
        ])
        .unwrap();
        for ngram in ["a", "b", "c"] {
            assert_eq!(store.probabilities(ngram).unwrap().len(), 3);
        }
        store.verify().unwrap();
    }

    #[test]
    fn test_overlong_ngrams_skipped() {
        let store = ProfileStore::new(&[profile(
            "aa",
            [1, 1, 1],
            &[("a", 1), ("abcd", 7)],
        )])
        .unwrap();
        assert!(store.contains("a"));
        assert!(!store.contains("abcd"));
        assert_eq!(store.vocabulary_size(), 1);
    }

    #[test]
    fn test_ngram_length_counted_in_chars() {
        // Three code points, many bytes: still a valid trigram.
        let store = ProfileStore::new(&[profile("ja", [1, 1, 1], &[("日本語", 1)])]).unwrap();
        assert!(store.contains("日本語"));
    }

    #[test]
    fn test_zero_total_with_entries_is_invalid() {
        let err = ProfileStore::new(&[profile("aa", [0, 1, 1], &[("a", 1)])]).unwrap_err();
        assert!(matches!(err, GlossaError::InvalidProfile { .. }));
    }

    #[test]
    fn test_wrong_n_words_arity_is_invalid_not_a_panic() {
        // Built directly, so the JSON-path validation never ran.
        let bad = LangProfile {
            name: "xx".into(),
            n_words: vec![1, 1],
            freq: [("abc".to_string(), 1u64)].into_iter().collect(),
        };
        let err = ProfileStore::new(&[bad]).unwrap_err();
        assert!(matches!(err, GlossaError::InvalidProfile { .. }));
    }

    #[test]
    fn test_empty_store() {
        let store = ProfileStore::new(&[]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.vocabulary_size(), 0);
        store.verify().unwrap();
    }
}
