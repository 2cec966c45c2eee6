use std::sync::Arc;

use scraper::{ElementRef, Html};

use super::document::{selector, visible_text};
use super::extractor::ExtractionResult;
use super::validator::CandidateValidator;
use crate::candidate::{ProductCandidate, ProductSource};

const CLASS_HINTS: [&str; 2] = ["title", "name"];

/// Scans elements whose class hints at a product title. Noisy, so every
/// hit is validated against its element before being returned.
pub struct UnstructuredFinder {
    validator: Arc<CandidateValidator>,
}

impl UnstructuredFinder {
    pub fn new(validator: Arc<CandidateValidator>) -> Self {
        Self { validator }
    }

    pub fn find(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let classed = selector("[class]")?;

        let found: Vec<ProductCandidate> = document
            .select(&classed)
            .filter(|el| has_title_class(*el))
            .filter_map(|el| {
                let text = visible_text(el);
                if text.is_empty() || !self.validator.is_valid(&text, Some(el)) {
                    return None;
                }
                Some(
                    ProductCandidate::builder(ProductSource::Unstructured)
                        .name(text)
                        .build(),
                )
            })
            .collect();

        tracing::debug!("Unstructured scan kept {} candidate(s)", found.len());
        Ok(found)
    }
}

fn has_title_class(element: ElementRef<'_>) -> bool {
    let class = element
        .value()
        .attr("class")
        .unwrap_or_default()
        .to_lowercase();
    CLASS_HINTS.iter().any(|hint| class.contains(hint))
}
