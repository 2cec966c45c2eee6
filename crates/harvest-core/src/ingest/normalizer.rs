use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::nlp::{BoundedCache, LanguageModel};

#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("Invalid normalization pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type NormalizationResult<T> = Result<T, NormalizationError>;

/// Rewrites applied in order to a lowercased name before lemmatization.
const STANDARD_RULES: &[(&str, &str)] = &[
    // "Oak Chair | Acme Home"
    (r"(?s)\s*\|.*$", ""),
    // "Oak Chair Shop Now", "Oak Chair Collection 2024"; a leading
    // "Buy" is part of the name
    (
        r"(?s)^(\s*\S.*?)\s*\b(?:shop|buy|online|store|collection).*$",
        "${1}",
    ),
    (r"\s+", " "),
    (r"[.,;:\-|\s]+$", ""),
    (r"[^\w\s]", ""),
    (r"\s+", " "),
];

/// Passes over the rule list before a name is considered stable.
const MAX_PASSES: usize = 4;

/// Ordered regex rewrites.
#[derive(Debug, Clone)]
pub struct NormalizationRuleSet {
    rules: Vec<(Regex, String)>,
}

impl NormalizationRuleSet {
    pub fn new(rules: &[(&str, &str)]) -> NormalizationResult<Self> {
        let rules = rules
            .iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, (*replacement).to_string())))
            .collect::<NormalizationResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Separator suffixes, marketing tails, trailing punctuation and
    /// remaining symbols.
    pub fn standard() -> NormalizationResult<Self> {
        Self::new(STANDARD_RULES)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let rewritten = self
            .rules
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                pattern.replace_all(&acc, replacement.as_str()).into_owned()
            });
        rewritten.trim().to_string()
    }
}

/// Reduces a product name to the comparison key used for deduplication.
///
/// `normalize(normalize(x)) == normalize(x)` for every input: the rule set
/// and lemmatization are re-applied until the output stops changing.
pub struct NameNormalizer {
    rules: NormalizationRuleSet,
    model: Arc<dyn LanguageModel>,
    cache: BoundedCache<String, String>,
}

impl NameNormalizer {
    pub fn new(model: Arc<dyn LanguageModel>, cache_capacity: usize) -> NormalizationResult<Self> {
        Ok(Self::with_rules(
            NormalizationRuleSet::standard()?,
            model,
            cache_capacity,
        ))
    }

    pub fn with_rules(
        rules: NormalizationRuleSet,
        model: Arc<dyn LanguageModel>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            rules,
            model,
            cache: BoundedCache::new(cache_capacity),
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        self.cache
            .get_or_insert_with(name.to_string(), || self.compute(name))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn compute(&self, name: &str) -> String {
        let mut current = self.single_pass(name);
        for _ in 1..MAX_PASSES {
            let next = self.single_pass(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn single_pass(&self, name: &str) -> String {
        let cleaned = self.rules.apply(&name.to_lowercase());
        self.model
            .tokenize(&cleaned)
            .into_iter()
            .filter(|t| !t.is_punct)
            .map(|t| t.lemma)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ratcliff/Obershelp similarity `2·M / T` over characters, where `M` is
/// the number of characters in matching blocks and `T` the combined length.
/// Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_block(&a[a_lo..a_hi], &b[b_lo..b_hi]);
        if size == 0 {
            continue;
        }
        matched += size;
        let (i, j) = (a_lo + i, b_lo + j);
        pending.push((a_lo, i, b_lo, j));
        pending.push((i + size, a_hi, j + size, b_hi));
    }

    matched
}

/// Longest common substring, earliest in `a` then earliest in `b` on ties.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let run = curr[j + 1];
            if run > best.2 {
                best = (i + 1 - run, j + 1 - run, run);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::LexiconModel;

    fn normalizer() -> NameNormalizer {
        let model: Arc<dyn LanguageModel> = Arc::new(LexiconModel::bundled().unwrap());
        NameNormalizer::new(model, 100).unwrap()
    }

    #[test]
    fn test_strips_separator_suffix() {
        let n = normalizer();
        assert_eq!(n.normalize("Oak Dining Chair | Shop Now"), "oak dining chair");
        assert_eq!(n.normalize("Oak Dining Chair | Acme Home"), "oak dining chair");
    }

    #[test]
    fn test_strips_marketing_tail() {
        let n = normalizer();
        assert_eq!(n.normalize("Velvet Sofa Collection 2024"), "velvet sofa");
        assert_eq!(n.normalize("Walnut Desk - Buy Online"), "walnut desk");
        assert_eq!(n.normalize("Pine Bed Shopping Guide"), "pine bed");
    }

    #[test]
    fn test_marketing_word_inside_token_survives() {
        let n = normalizer();
        assert_eq!(n.normalize("Bookstore Bench"), "bookstore bench");
    }

    #[test]
    fn test_leading_marketing_word_kept() {
        let n = normalizer();
        assert_eq!(n.normalize("Buy Oak Chair"), "buy oak chair");
        assert_eq!(n.normalize("Shop Now"), "shop now");
        assert_eq!(n.normalize("Buy Oak Chair Online"), "buy oak chair");
    }

    #[test]
    fn test_lemmatizes_and_cleans_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("  Oak   Chairs!!  "), "oak chair");
        assert_eq!(n.normalize("Mid-Century Tables."), "midcentury table");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        for name in [
            "Oak Dining Chair | Shop Now",
            "The Classic Sofas, Buy Today",
            "Chair -- |",
            "Glasses & Boxes...",
            "Store",
            "",
            "Ünïcode Stools",
        ] {
            let once = n.normalize(name);
            assert_eq!(n.normalize(&once), once, "not stable for {name:?}");
        }
    }

    #[test]
    fn test_normalize_caches_results() {
        let n = normalizer();
        n.normalize("Oak Chair");
        n.normalize("Oak Chair");
        n.normalize("Pine Chair");
        assert_eq!(n.cached(), 2);
    }

    #[test]
    fn test_similarity_values() {
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((similarity("oak chair", "oak chair") - 1.0).abs() < 1e-9);
        assert!(similarity("oak chair", "glass lamp") < 0.5);
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert!(similarity("", "chair").abs() < 1e-9);
    }

    #[test]
    fn test_similarity_is_symmetric_for_close_names() {
        let a = "oak dining chair";
        let b = "oak dinning chair";
        assert!(similarity(a, b) >= 0.8);
        assert!((similarity(a, b) - similarity(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_rule_rejected() {
        assert!(NormalizationRuleSet::new(&[("(", "")]).is_err());
        assert_eq!(NormalizationRuleSet::standard().unwrap().len(), 6);
    }
}
