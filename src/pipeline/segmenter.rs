use std::collections::HashSet;

use crate::config::CorpusConfig;
use crate::data::Corpus;

/// Splits normalized text into sentences and drops stop words.
#[derive(Debug, Clone)]
pub struct Segmenter {
    terminators: Vec<char>,
    stop_words: HashSet<String>,
}

impl Segmenter {
    pub fn new(terminators: Vec<char>, stop_words: HashSet<String>) -> Self {
        Self {
            terminators,
            stop_words,
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(config.terminators.clone(), config.stop_words.clone())
    }

    /// Trimmed, non-empty spans between terminators, in order.
    pub fn sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split(|c: char| self.terminators.contains(&c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Build the corpus; sentences left empty by stop-word removal are dropped.
    pub fn segment(&self, text: &str) -> Corpus {
        let mut corpus = Corpus::new();
        for sentence in self.sentences(text) {
            let tokens: Vec<String> = sentence
                .split_whitespace()
                .filter(|token| !self.is_stop_word(token))
                .map(str::to_string)
                .collect();
            corpus.push(tokens);
        }
        corpus
    }
}
