//! Language profile artifacts
//!
//! A profile is the offline-trained n-gram frequency table for one
//! language. On disk each profile is a JSON file named by its bare
//! language code (`en`, `zh-cn`), laid out as
//! `{"name": "en", "n_words": [w1, w2, w3], "freq": {"th": 123, ...}}`.
//! Variant profile sets live in an equally named subdirectory of
//! the profiles directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProfileVariant;
use crate::error::{GlossaError, Result};
use crate::ngram::MAX_GRAM;

/// Frequency table for a single language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LangProfile {
    /// Language code, e.g. "en" or "zh-cn".
    pub name: String,
    /// Total n-gram occurrences in the source corpus, indexed by
    /// n-gram length minus one.
    pub n_words: Vec<u64>,
    /// Occurrence count per n-gram.
    pub freq: HashMap<String, u64>,
}

impl LangProfile {
    /// Parse a profile from its JSON serialization.
    pub fn from_json(data: &str) -> Result<Self> {
        let profile: LangProfile = serde_json::from_str(data)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(GlossaError::InvalidProfile {
                name: "<unnamed>".into(),
                reason: "empty language name".into(),
            });
        }
        if self.n_words.len() != MAX_GRAM {
            return Err(GlossaError::InvalidProfile {
                name: self.name.clone(),
                reason: format!(
                    "n_words has {} entries, expected {}",
                    self.n_words.len(),
                    MAX_GRAM
                ),
            });
        }
        Ok(())
    }
}

/// Load one profile per requested language from `dir`, honoring the
/// variant subdirectory. Files load in parallel; the returned order
/// is the roster order. A missing or malformed file fails the whole
/// load, so a partially usable set never escapes.
pub fn load_profiles(
    dir: &Path,
    variant: ProfileVariant,
    languages: &[String],
) -> Result<Vec<LangProfile>> {
    let base: PathBuf = match variant.subdir() {
        Some(sub) => dir.join(sub),
        None => dir.to_path_buf(),
    };
    let profiles = languages
        .par_iter()
        .map(|lang| {
            let path = base.join(lang);
            if !path.is_file() {
                return Err(GlossaError::ProfileNotFound {
                    language: lang.clone(),
                    path,
                });
            }
            LangProfile::from_path(&path)
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "loaded {} language profiles from {}",
        profiles.len(),
        base.display()
    );
    Ok(profiles)
}
