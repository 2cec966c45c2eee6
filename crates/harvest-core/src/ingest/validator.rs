use std::sync::Arc;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::nlp::LanguageModel;

/// Characters counted against [`StructuralRules::max_special`].
pub const SPECIAL_CHARACTERS: &str = r"!@#$%^&*()_+={}[]|\:;<>?/";

const NEARBY_TAGS: [&str; 3] = ["span", "div", "p"];
const NEARBY_LIMIT: usize = 5;

/// Shape limits every product name must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralRules {
    pub min_chars: usize,
    pub max_chars: usize,
    pub min_words: usize,
    pub max_words: usize,
    pub max_special: usize,
}

impl Default for StructuralRules {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 50,
            min_words: 1,
            max_words: 10,
            max_special: 2,
        }
    }
}

impl StructuralRules {
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        let chars = name.chars().count();
        if chars < self.min_chars || chars > self.max_chars {
            return false;
        }

        let words = name.split_whitespace().count();
        if words < self.min_words || words > self.max_words {
            return false;
        }

        let special = name.chars().filter(|c| SPECIAL_CHARACTERS.contains(*c)).count();
        special <= self.max_special
    }
}

/// Domain predicate layered on top of the structural rules.
pub trait SemanticCheck: Send + Sync {
    fn accepts(&self, name: &str, context: Option<ElementRef<'_>>) -> bool;
}

/// Property words that mark an element's surroundings as a furniture
/// listing even when the name itself is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureLexicon {
    keywords: Vec<String>,
}

impl FurnitureLexicon {
    #[must_use]
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    #[must_use]
    pub fn default_keywords() -> Vec<String> {
        [
            "width",
            "height",
            "depth",
            "material",
            "color",
            "dimensions",
            "size",
            "weight",
            "style",
            "finish",
            "design",
            "shape",
            "pattern",
            "texture",
            "price",
            "brand",
            "manufacturer",
            "assembly",
            "features",
            "warranty",
            "care instructions",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when `text` mentions any keyword.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for FurnitureLexicon {
    fn default() -> Self {
        Self::new(Self::default_keywords())
    }
}

/// A name passes when one of its lemmas names a kind of `category`, or
/// when the element it came from sits among furniture property text.
pub struct FurnitureCheck {
    model: Arc<dyn LanguageModel>,
    category: String,
    lexicon: FurnitureLexicon,
}

impl FurnitureCheck {
    pub fn new(model: Arc<dyn LanguageModel>, lexicon: FurnitureLexicon) -> Self {
        Self {
            model,
            category: "furniture".to_string(),
            lexicon,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    fn names_member(&self, name: &str) -> bool {
        self.model
            .tokenize(name)
            .iter()
            .filter(|t| !t.is_punct)
            .any(|t| self.model.is_category_member(&t.lemma, &self.category))
    }
}

impl SemanticCheck for FurnitureCheck {
    fn accepts(&self, name: &str, context: Option<ElementRef<'_>>) -> bool {
        self.names_member(name) || context.is_some_and(|el| self.lexicon.matches(&nearby_text(el)))
    }
}

/// Text of up to five span/div/p elements around `element`: its
/// descendants first, then its following siblings.
fn nearby_text(element: ElementRef<'_>) -> String {
    let is_nearby = |el: &ElementRef<'_>| NEARBY_TAGS.contains(&el.value().name());

    let descendants = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(is_nearby);
    let siblings = element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(is_nearby);

    descendants
        .chain(siblings)
        .take(NEARBY_LIMIT)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Structural rules combined (logical AND) with an optional semantic check.
pub struct CandidateValidator {
    rules: StructuralRules,
    semantic: Option<Box<dyn SemanticCheck>>,
}

impl CandidateValidator {
    /// Validator without a domain check.
    #[must_use]
    pub fn structural(rules: StructuralRules) -> Self {
        Self {
            rules,
            semantic: None,
        }
    }

    pub fn furniture(model: Arc<dyn LanguageModel>, lexicon: FurnitureLexicon) -> Self {
        Self::structural(StructuralRules::default())
            .with_semantic(Box::new(FurnitureCheck::new(model, lexicon)))
    }

    #[must_use]
    pub fn with_semantic(mut self, check: Box<dyn SemanticCheck>) -> Self {
        self.semantic = Some(check);
        self
    }

    pub const fn rules(&self) -> &StructuralRules {
        &self.rules
    }

    pub const fn is_semantic(&self) -> bool {
        self.semantic.is_some()
    }

    pub fn is_valid(&self, name: &str, context: Option<ElementRef<'_>>) -> bool {
        if !self.rules.accepts(name) {
            tracing::trace!("Rejected '{}': structural rules", name);
            return false;
        }
        if let Some(check) = &self.semantic {
            if !check.accepts(name, context) {
                tracing::trace!("Rejected '{}': not a recognised product term", name);
                return false;
            }
        }
        true
    }
}

impl Default for CandidateValidator {
    fn default() -> Self {
        Self::structural(StructuralRules::default())
    }
}
