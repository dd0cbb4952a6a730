//! Answer Matcher
//!
//! Grades free-text answers and builds word-order challenges.
//!
//! Matching is exact after normalization: surrounding whitespace and one
//! trailing period are dropped and case is ignored. Internal whitespace and
//! accents are compared as-is, so `"Ik  ga"` does not match `"Ik ga"`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

/// Trim whitespace, then drop a single trailing period
fn normalize(sentence: &str) -> &str {
    let trimmed = sentence.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

/// Whether `input` is an acceptable answer for `expected`
pub fn is_good_match(expected: &str, input: &str) -> bool {
    normalize(expected).to_lowercase() == normalize(input).to_lowercase()
}

/// Shuffle the words of `sentence` into a different order.
///
/// Uses the thread-local RNG; see [`jumble_words_with`].
pub fn jumble_words(sentence: &str) -> Result<String> {
    jumble_words_with(sentence, &mut rand::thread_rng())
}

/// Shuffle the words of `sentence` with the given RNG.
///
/// The trailing period is dropped and words are split on single spaces. The
/// result is always a permutation of those words that differs from the
/// original order. Fails with [`Error::InvalidInput`] if there are fewer than
/// two words, or if every word is identical so no different order exists.
pub fn jumble_words_with<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> Result<String> {
    let sanitized = normalize(sentence);
    let mut words: Vec<&str> = sanitized.split(' ').collect();

    if sanitized.is_empty() || words.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "cannot jumble '{}': at least 2 words are required",
            sanitized
        )));
    }
    if words.iter().all(|w| *w == words[0]) {
        return Err(Error::InvalidInput(format!(
            "cannot jumble '{}': all words are identical",
            sanitized
        )));
    }

    loop {
        words.shuffle(rng);
        let jumbled = words.join(" ");
        if jumbled != sanitized {
            return Ok(jumbled);
        }
    }
}
