pub(crate) mod document;
mod extractor;
mod finder;
mod merger;
mod normalizer;
mod pipeline;
pub mod structured;
mod validator;

pub use extractor::{CompositeExtractor, ExtractionError, ExtractionResult, Extractor};
pub use finder::UnstructuredFinder;
pub use merger::{Deduplicator, DEFAULT_SIMILARITY_THRESHOLD};
pub use normalizer::{
    similarity, NameNormalizer, NormalizationError, NormalizationResult, NormalizationRuleSet,
};
pub use pipeline::{HarvestOutcome, HarvestPipeline};
pub use validator::{
    CandidateValidator, FurnitureCheck, FurnitureLexicon, SemanticCheck, StructuralRules,
    SPECIAL_CHARACTERS,
};
