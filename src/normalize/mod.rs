//! Character normalization
//!
//! Maps raw input onto a reduced alphabet that keeps script
//! identity while discarding case, digits, punctuation, and
//! symbols. Two pieces:
//! - `fold`, a total function on characters driven by the canonical
//!   block table in `blocks`
//! - `normalize_vietnamese`, a one-shot pre-pass that reassembles
//!   decomposed Vietnamese diacritics

mod blocks;
mod vietnamese;

pub use vietnamese::normalize_vietnamese;

use blocks::{lookup, FoldAction};

/// Marker standing in for every word boundary in the n-gram stream.
pub const WORD_BOUNDARY: char = ' ';

/// Fold one code point according to its Unicode block. Characters
/// carrying no language signal become the word-boundary marker.
pub fn fold(c: char) -> char {
    match lookup(c as u32) {
        Some(FoldAction::Keep) => c,
        Some(FoldAction::Lower) => c.to_ascii_lowercase(),
        None => WORD_BOUNDARY,
    }
}
