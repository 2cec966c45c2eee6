use std::sync::Arc;

use super::normalizer::{similarity, NameNormalizer};
use super::validator::CandidateValidator;
use crate::candidate::{ProductCandidate, ProductSource};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Collapses near-duplicate candidates into one record per product.
pub struct Deduplicator {
    normalizer: Arc<NameNormalizer>,
    validator: Option<Arc<CandidateValidator>>,
    threshold: f64,
}

impl Deduplicator {
    pub fn new(normalizer: Arc<NameNormalizer>) -> Self {
        Self {
            normalizer,
            validator: None,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Arc<CandidateValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Equal keys, similar keys, or one key contained in the other.
    pub fn is_duplicate(&self, a: &str, b: &str) -> bool {
        let a = self.normalizer.normalize(a);
        let b = self.normalizer.normalize(b);
        keys_match(&a, &b, self.threshold)
    }

    /// Drops unnamed and invalid candidates, then merges each group of
    /// duplicates. Groups are returned in first-seen order.
    ///
    /// Unstructured candidates were already validated against their element
    /// by the finder and are not checked again.
    pub fn merge(&self, candidates: Vec<ProductCandidate>) -> Vec<ProductCandidate> {
        let accepted: Vec<ProductCandidate> = candidates
            .into_iter()
            .filter(ProductCandidate::has_name)
            .filter(|c| self.accepts(c))
            .collect();

        let groups = self.group(accepted);
        tracing::debug!("Merged candidates into {} product(s)", groups.len());

        groups.into_iter().filter_map(merge_group).collect()
    }

    fn accepts(&self, candidate: &ProductCandidate) -> bool {
        candidate.source == ProductSource::Unstructured
            || self
                .validator
                .as_ref()
                .is_none_or(|v| v.is_valid(&candidate.name, None))
    }

    /// Each candidate joins the first group holding any duplicate of it.
    pub fn group(&self, candidates: Vec<ProductCandidate>) -> Vec<Vec<ProductCandidate>> {
        let mut groups: Vec<Vec<(String, ProductCandidate)>> = Vec::new();

        for candidate in candidates {
            let key = self.normalizer.normalize(&candidate.name);
            let home = groups.iter_mut().find(|group| {
                group
                    .iter()
                    .any(|(member, _)| keys_match(&key, member, self.threshold))
            });

            match home {
                Some(group) => group.push((key, candidate)),
                None => groups.push(vec![(key, candidate)]),
            }
        }

        groups
            .into_iter()
            .map(|group| group.into_iter().map(|(_, c)| c).collect())
            .collect()
    }
}

fn keys_match(a: &str, b: &str, threshold: f64) -> bool {
    a == b || similarity(a, b) >= threshold || a.contains(b) || b.contains(a)
}

/// Highest confidence member as base (earliest on ties), gaps filled from
/// the rest in descending confidence.
fn merge_group(mut group: Vec<ProductCandidate>) -> Option<ProductCandidate> {
    group.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut members = group.into_iter();
    let mut merged = members.next()?;
    for member in members {
        merged.fill_missing_from(&member);
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LanguageModel, LexiconModel};

    fn model() -> Arc<dyn LanguageModel> {
        Arc::new(LexiconModel::bundled().unwrap())
    }

    fn deduplicator() -> Deduplicator {
        Deduplicator::new(Arc::new(NameNormalizer::new(model(), 100).unwrap()))
    }

    fn candidate(source: ProductSource, name: &str) -> ProductCandidate {
        ProductCandidate::builder(source).name(name).build()
    }

    #[test]
    fn test_duplicate_rules() {
        let d = deduplicator();
        assert!(d.is_duplicate("Oak Chairs", "oak chair"));
        assert!(d.is_duplicate("Oak Dining Chair", "Oak Dinning Chair"));
        assert!(d.is_duplicate("Oak Chair", "Solid Oak Chair With Arms"));
        assert!(!d.is_duplicate("Oak Chair", "Glass Lamp"));
        assert!(!d.is_duplicate("Shop Now", "Oak Chair"));
    }

    #[test]
    fn test_equal_keys_merge_into_union() {
        let d = deduplicator();
        let mut json_ld = candidate(ProductSource::JsonLd, "Oak Dining Chair");
        json_ld.price = Some("249.00".into());
        let mut og = candidate(ProductSource::OpenGraph, "Oak Dining Chair | Shop Now");
        og.description = Some("Handmade".into());
        og.currency = Some("USD".into());

        let merged = d.merge(vec![og, json_ld]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Oak Dining Chair");
        assert_eq!(merged[0].source, ProductSource::JsonLd);
        assert_eq!(merged[0].price.as_deref(), Some("249.00"));
        assert_eq!(merged[0].description.as_deref(), Some("Handmade"));
        assert_eq!(merged[0].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_higher_confidence_value_wins() {
        let d = deduplicator();
        let mut low = candidate(ProductSource::DublinCore, "Pine Bed");
        low.price = Some("99".into());
        let mut high = candidate(ProductSource::Microdata, "Pine Bed");
        high.price = Some("120".into());
        let mut mid = candidate(ProductSource::TwitterCard, "Pine Bed");
        mid.description = Some("Twin size".into());

        let merged = d.merge(vec![low, mid, high]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].price.as_deref(), Some("120"));
        assert_eq!(merged[0].description.as_deref(), Some("Twin size"));
        assert_eq!(merged[0].source, ProductSource::Microdata);
    }

    #[test]
    fn test_equal_confidence_keeps_first() {
        let d = deduplicator();
        let mut first = candidate(ProductSource::Microdata, "Teak Bench");
        first.price = Some("1".into());
        let mut second = candidate(ProductSource::Rdfa, "Teak Bench");
        second.price = Some("2".into());

        let merged = d.merge(vec![first, second]);
        assert_eq!(merged[0].source, ProductSource::Microdata);
        assert_eq!(merged[0].price.as_deref(), Some("1"));
    }

    #[test]
    fn test_group_order_follows_first_sighting() {
        let d = deduplicator();
        let merged = d.merge(vec![
            candidate(ProductSource::DublinCore, "Walnut Desk"),
            candidate(ProductSource::JsonLd, "Velvet Sofa"),
            candidate(ProductSource::JsonLd, "Walnut Desk"),
        ]);

        let names: Vec<&str> = merged.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Walnut Desk", "Velvet Sofa"]);
        assert_eq!(merged[0].source, ProductSource::JsonLd);
    }

    #[test]
    fn test_unnamed_and_invalid_dropped() {
        let validator = Arc::new(CandidateValidator::furniture(model(), Default::default()));
        let d = deduplicator().with_validator(validator);

        let merged = d.merge(vec![
            candidate(ProductSource::JsonLd, ""),
            candidate(ProductSource::OpenGraph, "Free Shipping"),
            candidate(ProductSource::OpenGraph, "Oak Chair"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Oak Chair");
    }

    #[test]
    fn test_leading_marketing_word_still_merges() {
        let d = deduplicator();
        assert!(d.is_duplicate("Buy Oak Chair", "Oak Chair"));

        let merged = d.merge(vec![
            candidate(ProductSource::OpenGraph, "Buy Oak Chair"),
            candidate(ProductSource::JsonLd, "Oak Chair"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Oak Chair");
    }

    #[test]
    fn test_unstructured_not_revalidated() {
        let validator = Arc::new(CandidateValidator::furniture(model(), Default::default()));
        let d = deduplicator().with_validator(validator);

        let merged = d.merge(vec![
            candidate(ProductSource::Unstructured, "Nordic Classic"),
            candidate(ProductSource::DublinCore, "Nordic Sale"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Nordic Classic");
        assert_eq!(merged[0].source, ProductSource::Unstructured);
    }

    #[test]
    fn test_group_joins_via_any_member() {
        let d = deduplicator().with_threshold(0.95);
        let groups = d.group(vec![
            candidate(ProductSource::JsonLd, "Oak Chair"),
            candidate(ProductSource::JsonLd, "Oak Chair Set"),
            candidate(ProductSource::JsonLd, "Glass Lamp"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
    }
}
