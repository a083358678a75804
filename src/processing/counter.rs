// src/processing/counter.rs

use crate::errors::{Error, Result};
use log::debug;
use tiktoken_rs::CoreBPE;

/// Counts the tokens a piece of text costs downstream.
///
/// Implementations must be deterministic for identical input within a run.
/// Any `Fn(&str) -> usize` is a counter, which keeps tests free of tokenizer data:
///
/// ```
/// use sential::processing::TokenCounter;
///
/// let words = |text: &str| text.split_whitespace().count();
/// assert_eq!(words.count("function main"), 2);
/// ```
pub trait TokenCounter {
    /// Number of tokens in `text`.
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// BPE token counter backed by `tiktoken-rs`.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Loads the encoding used by `model`, falling back to `cl100k_base` for unknown models.
    ///
    /// # Errors
    /// Returns [`Error::Tokenizer`] if neither encoding can be loaded.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(e) => {
                debug!(
                    "No tokenizer registered for model '{}' ({}), using cl100k_base.",
                    model, e
                );
                tiktoken_rs::cl100k_base().map_err(|e| Error::Tokenizer {
                    model: model.to_string(),
                    reason: e.to_string(),
                })?
            }
        };
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
