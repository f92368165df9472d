//! Infers the delimiter of a table
//!
//! Counts each candidate delimiter in a bounded prefix of the text, ignoring anything inside quoted
//! spans, and picks the most frequent one. This is a heuristic: a document whose first lines are
//! dominated by, say, commas inside unquoted prose will be guessed wrong. Callers that know the
//! delimiter should pass it explicitly.

use log::debug;

use super::{Delimiter, QUOTE};

/// Only the first `GUESS_SAMPLE_BYTES` bytes of the text are inspected
pub const GUESS_SAMPLE_BYTES: usize = 8 * 1024;

/// Guesses the delimiter of `sample`, falling back to a comma when no candidate occurs
pub fn guess_delimiter(sample: &str) -> Delimiter {
    let counts = count_candidates(bounded_prefix(sample, GUESS_SAMPLE_BYTES));
    debug!("Delimiter candidate counts: {:?}", counts);

    // `max_by_key` keeps the last maximum, so walk in reverse to let earlier candidates win ties
    let guess = counts
        .iter()
        .rev()
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(delimiter, _)| *delimiter)
        .unwrap_or_default();
    debug!("Guessed delimiter: {}", guess);
    guess
}

/// Occurrences of each candidate outside quoted spans, in candidate order
fn count_candidates(sample: &str) -> [(Delimiter, usize); 4] {
    let mut counts = Delimiter::CANDIDATES.map(|delimiter| (delimiter, 0));
    let mut in_quotes = false;
    for c in sample.chars() {
        if c == QUOTE {
            // an escaped quote toggles twice, leaving the state unchanged
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some((_, count)) = counts
            .iter_mut()
            .find(|(delimiter, _)| delimiter.as_char() == c)
        {
            *count += 1;
        }
    }
    counts
}

/// Cuts `text` to at most `max_bytes`, backing off to a char boundary
fn bounded_prefix(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
