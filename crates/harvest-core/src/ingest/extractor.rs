use scraper::Html;
use thiserror::Error;

use super::structured::{
    DublinCoreExtractor, JsonLdExtractor, MicrodataExtractor, OpenGraphExtractor,
    RdfaExtractor, TwitterCardExtractor,
};
use crate::candidate::{ProductCandidate, ProductSource};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid selector {0}")]
    Selector(String),
    #[error("Malformed JSON-LD block {index}: {source}")]
    MalformedJson {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// One markup convention. Implementations read the parsed page and never
/// depend on another extractor's output.
pub trait Extractor: Send + Sync {
    fn source(&self) -> ProductSource;

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>>;

    fn extract_html(&self, html: &str) -> ExtractionResult<Vec<ProductCandidate>> {
        self.extract(&Html::parse_document(html))
    }
}

/// Runs a fixed, ordered list of extractors. A failing extractor is logged
/// and contributes nothing; the rest still run.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn Extractor>>,
}

impl CompositeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// The six structured-data extractors in pipeline order.
    #[must_use]
    pub fn structured() -> Self {
        Self::new()
            .with_extractor(Box::new(JsonLdExtractor))
            .with_extractor(Box::new(MicrodataExtractor))
            .with_extractor(Box::new(RdfaExtractor))
            .with_extractor(Box::new(OpenGraphExtractor))
            .with_extractor(Box::new(TwitterCardExtractor))
            .with_extractor(Box::new(DublinCoreExtractor))
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn sources(&self) -> Vec<ProductSource> {
        self.extractors.iter().map(|e| e.source()).collect()
    }

    pub fn extract(&self, document: &Html) -> Vec<ProductCandidate> {
        let mut combined = Vec::new();

        for extractor in &self.extractors {
            match extractor.extract(document) {
                Ok(found) => {
                    tracing::debug!("{} extractor found {} candidate(s)", extractor.source(), found.len());
                    combined.extend(found);
                }
                Err(e) => {
                    tracing::warn!("{} extractor failed, skipping: {}", extractor.source(), e);
                }
            }
        }

        combined
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::structured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingExtractor;

    impl Extractor for FailingExtractor {
        fn source(&self) -> ProductSource {
            ProductSource::Microdata
        }

        fn extract(&self, _document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
            Err(ExtractionError::Selector("[itemtype".to_string()))
        }
    }

    struct FixedExtractor(&'static str);

    impl Extractor for FixedExtractor {
        fn source(&self) -> ProductSource {
            ProductSource::OpenGraph
        }

        fn extract(&self, _document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
            Ok(vec![ProductCandidate::builder(self.source()).name(self.0).build()])
        }
    }

    #[test]
    fn test_failing_extractor_is_isolated() {
        let composite = CompositeExtractor::new()
            .with_extractor(Box::new(FixedExtractor("Oak Chair")))
            .with_extractor(Box::new(FailingExtractor))
            .with_extractor(Box::new(FixedExtractor("Pine Table")));

        let found = composite.extract(&Html::parse_document("<html></html>"));

        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Oak Chair", "Pine Table"]);
    }

    #[test]
    fn test_structured_order() {
        assert_eq!(
            CompositeExtractor::structured().sources(),
            vec![
                ProductSource::JsonLd,
                ProductSource::Microdata,
                ProductSource::Rdfa,
                ProductSource::OpenGraph,
                ProductSource::TwitterCard,
                ProductSource::DublinCore,
            ]
        );
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let found = CompositeExtractor::default().extract(&Html::parse_document(
            "<html><head><title>Nothing</title></head><body><p>hi</p></body></html>",
        ));
        assert!(found.is_empty());
    }
}
