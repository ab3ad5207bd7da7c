//! Q-gram extraction
//!
//! Q-grams are computed on Unicode scalar values (`char`), not bytes. With
//! padding enabled the value is framed by `q - 1` start and `q - 1` end
//! characters so that leading and trailing characters appear in as many
//! q-grams as inner ones.

use serde::{Deserialize, Serialize};
use shared_types::BlockingError;

/// Pad characters framing a value before q-gram extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Padding {
    pub start: char,
    pub end: char,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            start: '^',
            end: '$',
        }
    }
}

/// Q-gram length and optional padding.
///
/// Both parties must use the same configuration, otherwise their n-gram
/// keys cannot be joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QGramConfig {
    pub q: usize,
    pub padding: Option<Padding>,
}

impl Default for QGramConfig {
    fn default() -> Self {
        Self { q: 2, padding: None }
    }
}

impl QGramConfig {
    pub fn new(q: usize) -> Self {
        Self { q, padding: None }
    }

    pub fn with_padding(mut self, start: char, end: char) -> Self {
        self.padding = Some(Padding { start, end });
        self
    }

    pub fn validate(&self) -> Result<(), BlockingError> {
        if self.q == 0 {
            return Err(BlockingError::Configuration(
                "q-gram length must be positive".to_string(),
            ));
        }
        if let Some(p) = self.padding {
            if p.start == p.end {
                return Err(BlockingError::Configuration(format!(
                    "padding characters must differ (both '{}')",
                    p.start
                )));
            }
        }
        Ok(())
    }

    /// Q-grams of `value`, left to right, duplicates kept.
    pub fn qgrams(&self, value: &str) -> QGrams {
        let mut chars = Vec::with_capacity(value.len() + 2 * self.q);
        let pad = self.q.saturating_sub(1);
        if let Some(p) = self.padding {
            chars.extend(std::iter::repeat(p.start).take(pad));
        }
        chars.extend(value.chars());
        if let Some(p) = self.padding {
            chars.extend(std::iter::repeat(p.end).take(pad));
        }
        QGrams {
            chars,
            q: self.q,
            pos: 0,
        }
    }
}

/// Lazy iterator over the q-grams of one value.
///
/// Clones advance independently. Call [`QGramConfig::qgrams`] again to
/// start over from the first q-gram.
#[derive(Clone, Debug)]
pub struct QGrams {
    chars: Vec<char>,
    q: usize,
    pos: usize,
}

impl Iterator for QGrams {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.q == 0 || self.pos + self.q > self.chars.len() {
            return None;
        }
        let gram = self.chars[self.pos..self.pos + self.q].iter().collect();
        self.pos += 1;
        Some(gram)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.q == 0 {
            0
        } else {
            (self.chars.len() + 1).saturating_sub(self.pos + self.q)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QGrams {}
