//! Glossa - statistical language identification
//!
//! Given an arbitrary Unicode text, the engine returns a ranked
//! list of candidate languages with probabilities. Detection
//! compares the text's character 1-3-gram distribution against
//! precompiled per-language profiles using a naive-Bayes estimator
//! averaged over randomized Monte-Carlo trials.
//!
//! ```rust,ignore
//! use glossa::{Detector, DetectorConfig};
//!
//! let detector = Detector::from_profiles_dir("profiles".as_ref(), DetectorConfig::default())?;
//! for language in detector.detect_all("Hello, world!") {
//!     println!("{language}");
//! }
//! ```

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod models;
pub mod ngram;
pub mod normalize;
pub mod profile;
pub mod store;

pub use config::{DetectorConfig, MapSource, ProfileVariant, DEFAULT_LANGUAGES};
pub use detector::{Detector, LanguageMap};
pub use error::{GlossaError, Result};
pub use models::Language;
pub use profile::{load_profiles, LangProfile};
pub use store::ProfileStore;
