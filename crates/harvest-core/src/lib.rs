pub mod candidate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod network;
pub mod nlp;

pub use candidate::{CandidateBuilder, ProductCandidate, ProductSource};
pub use config::{ConfigError, HarvestConfig};
pub use error::{Error, Result};
pub use ingest::{
    CandidateValidator, CompositeExtractor, Deduplicator, Extractor, HarvestOutcome,
    HarvestPipeline, NameNormalizer, UnstructuredFinder,
};
pub use network::{FetchConfig, FetchError, Fetcher, HttpFetcher};
pub use nlp::{CachedModel, LanguageModel, LexiconModel, NlpError};
