//! Core data models

use serde::{Deserialize, Serialize};

/// One ranked detection result: a language code and the averaged
/// posterior probability assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub probability: f64,
}

impl Language {
    pub fn new(code: impl Into<String>, probability: f64) -> Self {
        Self {
            code: code.into(),
            probability,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.4})", self.code, self.probability)
    }
}
