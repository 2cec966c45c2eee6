mod cache;
mod lexicon;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{BoundedCache, CachedModel};
pub use lexicon::{lemmatize, tokenize, LexiconModel, SenseInventory, Synset};

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("Failed to read sense inventory {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed sense inventory: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Synset {synset} names unknown hypernym {hypernym}")]
    DanglingHypernym { synset: String, hypernym: String },
    #[error("Sense inventory has no senses for category '{0}'")]
    UnknownCategory(String),
}

pub type NlpResult<T> = Result<T, NlpError>;

/// One token of tokenized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Lowercase dictionary form.
    pub lemma: String,
    pub is_punct: bool,
}

impl Token {
    #[must_use]
    pub fn new(text: String, lemma: String, is_punct: bool) -> Self {
        Self {
            text,
            lemma,
            is_punct,
        }
    }
}

/// The two linguistic capabilities the extraction core relies on.
pub trait LanguageModel: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// True when some sense of `word` sits below some sense of `category` in
    /// the sense hierarchy. A word naming the category itself (or one of its
    /// synonyms) is never a member.
    fn is_category_member(&self, word: &str, category: &str) -> bool;
}

impl<M: LanguageModel + ?Sized> LanguageModel for std::sync::Arc<M> {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        (**self).tokenize(text)
    }

    fn is_category_member(&self, word: &str, category: &str) -> bool {
        (**self).is_category_member(word, category)
    }
}
