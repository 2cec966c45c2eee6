use std::sync::Arc;
use std::time::Instant;

use scraper::Html;
use serde::{Deserialize, Serialize};

use super::extractor::CompositeExtractor;
use super::finder::UnstructuredFinder;
use super::merger::Deduplicator;
use super::normalizer::NameNormalizer;
use super::validator::{CandidateValidator, FurnitureCheck, FurnitureLexicon, StructuralRules};
use crate::candidate::ProductCandidate;
use crate::config::HarvestConfig;
use crate::network::{Fetcher, HttpFetcher};
use crate::nlp::{CachedModel, LanguageModel, LexiconModel};
use crate::Result;

/// Result of harvesting one URL. An unreachable page is reported as
/// `Unavailable`, never as an empty product list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HarvestOutcome {
    Products { products: Vec<ProductCandidate> },
    Unavailable { url: String, reason: String },
}

impl HarvestOutcome {
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn products(&self) -> Option<&[ProductCandidate]> {
        match self {
            Self::Products { products } => Some(products),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn into_products(self) -> Option<Vec<ProductCandidate>> {
        match self {
            Self::Products { products } => Some(products),
            Self::Unavailable { .. } => None,
        }
    }
}

/// fetch → structured extraction → optional unstructured scan → validate
/// and merge.
pub struct HarvestPipeline {
    fetcher: Box<dyn Fetcher>,
    extractor: CompositeExtractor,
    finder: UnstructuredFinder,
    deduplicator: Deduplicator,
    validator: Arc<CandidateValidator>,
}

impl HarvestPipeline {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        validator: Arc<CandidateValidator>,
        deduplicator: Deduplicator,
    ) -> Self {
        Self {
            fetcher,
            extractor: CompositeExtractor::structured(),
            finder: UnstructuredFinder::new(Arc::clone(&validator)),
            deduplicator,
            validator,
        }
    }

    /// Builds every component from `config`. Fails when the sense
    /// inventory cannot be loaded or lacks the configured category.
    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        config.validate()?;

        let model = build_model(config)?;
        let validator = Arc::new(build_validator(config, Arc::clone(&model)));
        let normalizer = Arc::new(NameNormalizer::new(model, config.cache_capacity)?);
        let deduplicator = Deduplicator::new(normalizer)
            .with_validator(Arc::clone(&validator))
            .with_threshold(config.similarity_threshold);
        let fetcher = HttpFetcher::new(config.fetch.clone())?;

        tracing::debug!(
            "Pipeline ready (category={}, semantic={}, threshold={})",
            config.category,
            validator.is_semantic(),
            config.similarity_threshold
        );

        Ok(Self::new(Box::new(fetcher), validator, deduplicator))
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: CompositeExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn validator(&self) -> &CandidateValidator {
        &self.validator
    }

    pub async fn process(&self, url: &str, include_unstructured: bool) -> HarvestOutcome {
        let start = Instant::now();

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                return HarvestOutcome::Unavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        let products = self.process_html(&body, include_unstructured);

        tracing::info!("Harvested {} product(s) from {}", products.len(), url);
        tracing::debug!("Processed {} in {}ms", url, start.elapsed().as_millis());

        HarvestOutcome::Products { products }
    }

    /// Runs extraction and merging over already-fetched markup.
    pub fn process_html(&self, html: &str, include_unstructured: bool) -> Vec<ProductCandidate> {
        let document = Html::parse_document(html);
        let mut candidates = self.extractor.extract(&document);

        if include_unstructured {
            match self.finder.find(&document) {
                Ok(found) => candidates.extend(found),
                Err(e) => tracing::warn!("Unstructured scan failed, skipping: {}", e),
            }
        }

        tracing::debug!("Collected {} raw candidate(s)", candidates.len());
        self.deduplicator.merge(candidates)
    }
}

fn build_model(config: &HarvestConfig) -> Result<Arc<dyn LanguageModel>> {
    let lexicon = match &config.sense_inventory {
        Some(path) => {
            tracing::debug!("Loading sense inventory from {}", path.display());
            LexiconModel::load(path)?
        }
        None => LexiconModel::bundled()?,
    };

    if config.semantic_validation {
        lexicon.require_category(&config.category)?;
    }

    Ok(Arc::new(CachedModel::new(lexicon, config.cache_capacity)))
}

fn build_validator(config: &HarvestConfig, model: Arc<dyn LanguageModel>) -> CandidateValidator {
    let validator = CandidateValidator::structural(StructuralRules::default());
    if !config.semantic_validation {
        return validator;
    }

    let check = FurnitureCheck::new(model, FurnitureLexicon::new(config.lexicon.clone()))
        .with_category(config.category.clone());
    validator.with_semantic(Box::new(check))
}
