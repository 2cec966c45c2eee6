use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{LanguageModel, NlpError, NlpResult, Token};

const BUNDLED_INVENTORY: &str = include_str!("../../data/senses.json");

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("people", "person"),
    ("shelves", "shelf"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("wolves", "wolf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("series", "series"),
    ("species", "species"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Synset {
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
}

/// Word senses and their hypernym links, keyed by synset id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenseInventory {
    pub synsets: HashMap<String, Synset>,
}

impl SenseInventory {
    pub fn bundled() -> NlpResult<Self> {
        Self::from_json(BUNDLED_INVENTORY)
    }

    pub fn from_json(json: &str) -> NlpResult<Self> {
        let inventory: Self = serde_json::from_str(json)?;
        inventory.check_links()?;
        Ok(inventory)
    }

    pub fn load(path: &Path) -> NlpResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| NlpError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn check_links(&self) -> NlpResult<()> {
        for (id, synset) in &self.synsets {
            if let Some(missing) = synset
                .hypernyms
                .iter()
                .find(|h| !self.synsets.contains_key(*h))
            {
                return Err(NlpError::DanglingHypernym {
                    synset: id.clone(),
                    hypernym: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Dictionary-backed language model: rule tokenizer and lemmatizer plus a
/// sense inventory for category membership.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    inventory: SenseInventory,
    index: HashMap<String, Vec<String>>,
}

impl LexiconModel {
    #[must_use]
    pub fn new(inventory: SenseInventory) -> Self {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        let mut ids: Vec<&String> = inventory.synsets.keys().collect();
        ids.sort();
        for id in ids {
            for lemma in &inventory.synsets[id].lemmas {
                index.entry(sense_key(lemma)).or_default().push(id.clone());
            }
        }
        Self { inventory, index }
    }

    pub fn bundled() -> NlpResult<Self> {
        Ok(Self::new(SenseInventory::bundled()?))
    }

    pub fn load(path: &Path) -> NlpResult<Self> {
        Ok(Self::new(SenseInventory::load(path)?))
    }

    /// Fails when `category` has no sense, since every membership test
    /// against it would silently answer false.
    pub fn require_category(&self, category: &str) -> NlpResult<()> {
        if self.senses(category).is_empty() {
            return Err(NlpError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }

    /// Synset ids for `word`, falling back to its lemma when the surface
    /// form is unknown.
    #[must_use]
    pub fn senses(&self, word: &str) -> &[String] {
        let key = sense_key(word);
        if let Some(ids) = self.index.get(&key) {
            return ids;
        }
        self.index
            .get(&lemmatize(&key))
            .map_or(&[][..], Vec::as_slice)
    }

    fn ancestors<'a>(&'a self, id: &'a str) -> HashSet<&'a str> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(synset) = self.inventory.synsets.get(current) {
                queue.extend(synset.hypernyms.iter().map(String::as_str));
            }
        }
        seen
    }
}

impl LanguageModel for LexiconModel {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        tokenize(text)
    }

    fn is_category_member(&self, word: &str, category: &str) -> bool {
        let word_senses = self.senses(word);
        let category_senses = self.senses(category);
        if word_senses.is_empty() || category_senses.is_empty() {
            return false;
        }

        let key = sense_key(word);
        let names_category = category_senses
            .iter()
            .filter_map(|id| self.inventory.synsets.get(id))
            .flat_map(|synset| synset.lemmas.iter())
            .any(|lemma| sense_key(lemma) == key);
        if names_category {
            return false;
        }

        word_senses.iter().any(|id| {
            let ancestors = self.ancestors(id);
            category_senses
                .iter()
                .any(|category_id| ancestors.contains(category_id.as_str()))
        })
    }
}

fn sense_key(word: &str) -> String {
    word.trim().to_lowercase().replace(' ', "_")
}

/// Split text into word tokens and punctuation tokens. Runs of alphanumeric
/// characters form words; every other non-space character stands alone.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            word.push(ch);
            continue;
        }
        flush_word(&mut word, &mut tokens);
        if !ch.is_whitespace() {
            let text = ch.to_string();
            tokens.push(Token::new(text.clone(), text, true));
        }
    }
    flush_word(&mut word, &mut tokens);

    tokens
}

fn flush_word(word: &mut String, tokens: &mut Vec<Token>) {
    if word.is_empty() {
        return;
    }
    let text = std::mem::take(word);
    let lemma = lemmatize(&text.to_lowercase());
    tokens.push(Token::new(text, lemma, false));
}

/// Reduce an English noun to its singular form. The result is always a
/// fixed point: lemmatizing a lemma returns it unchanged.
#[must_use]
pub fn lemmatize(word: &str) -> String {
    let lower = word.to_lowercase();

    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }
    if lower.chars().count() <= 3 || !lower.chars().all(char::is_alphabetic) {
        return lower;
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return lower;
    }
    if lower.len() > 4 {
        if let Some(stem) = lower.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if let Some(stem) = lower.strip_suffix('s') {
        return stem.to_string();
    }

    lower
}
