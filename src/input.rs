//! Weighted word lists.
//!
//! One word per line, followed by an integer weight:
//!
//! ```text
//! rust 120
//! cargo 64
//! ```

use std::path::Path;

use crate::{Error, Result, WeightedWord};

/// Parse a whitespace separated `text weight` list. Blank lines are skipped
/// and anything after the weight is ignored.
pub fn parse_words(source: &str) -> Result<Vec<WeightedWord>> {
    let mut words = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(text) = tokens.next() else {
            continue;
        };

        let raw = tokens.next().ok_or_else(|| Error::Parse {
            line: idx + 1,
            message: format!("missing weight after '{text}'"),
        })?;
        let weight = raw.parse::<i64>().map_err(|e| Error::Parse {
            line: idx + 1,
            message: format!("invalid weight '{raw}': {e}"),
        })?;

        words.push(WeightedWord::new(text, weight));
    }

    Ok(words)
}

/// Read and parse a word list file.
pub fn read_words(path: impl AsRef<Path>) -> Result<Vec<WeightedWord>> {
    let content = std::fs::read_to_string(path)?;
    parse_words(&content)
}

/// Stable sort, heaviest first. Layout treats the first and last entries as
/// the weight extremes, so unsorted lists should go through this.
pub fn sort_by_weight(words: &mut [WeightedWord]) {
    words.sort_by(|a, b| b.weight.cmp(&a.weight));
}
