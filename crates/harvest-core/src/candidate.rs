use serde::{Deserialize, Serialize};

/// Markup convention a candidate was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSource {
    JsonLd,
    Microdata,
    Rdfa,
    #[serde(rename = "OPENGRAPH")]
    OpenGraph,
    TwitterCard,
    DublinCore,
    Unstructured,
}

impl ProductSource {
    /// Fixed trust weight used to break ties when duplicates are merged.
    #[must_use]
    pub const fn confidence(self) -> f64 {
        match self {
            Self::JsonLd => 0.95,
            Self::Microdata | Self::Rdfa => 0.9,
            Self::OpenGraph => 0.85,
            Self::TwitterCard => 0.8,
            Self::DublinCore => 0.75,
            Self::Unstructured => 0.0,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JsonLd => "JSON_LD",
            Self::Microdata => "MICRODATA",
            Self::Rdfa => "RDFA",
            Self::OpenGraph => "OPENGRAPH",
            Self::TwitterCard => "TWITTER_CARD",
            Self::DublinCore => "DUBLIN_CORE",
            Self::Unstructured => "UNSTRUCTURED",
        }
    }
}

impl std::fmt::Display for ProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product record as emitted by an extractor or produced by the merger.
///
/// Optional fields are never `Some("")`; the builder collapses blank values
/// to `None` so the merger can treat "absent" uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCandidate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub source: ProductSource,
    pub confidence: f64,
}

impl ProductCandidate {
    #[must_use]
    pub fn builder(source: ProductSource) -> CandidateBuilder {
        CandidateBuilder::new(source)
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Fill every empty field from `other`, leaving populated fields alone.
    pub(crate) fn fill_missing_from(&mut self, other: &Self) {
        if self.name.is_empty() && !other.name.is_empty() {
            self.name.clone_from(&other.name);
        }
        fill(&mut self.description, other.description.as_ref());
        fill(&mut self.price, other.price.as_ref());
        fill(&mut self.currency, other.currency.as_ref());
    }
}

fn fill(slot: &mut Option<String>, value: Option<&String>) {
    if slot.is_none() {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }
}

/// Shared constructor for every extractor so field names cannot drift
/// between sources.
#[derive(Debug, Clone)]
pub struct CandidateBuilder {
    source: ProductSource,
    name: String,
    description: Option<String>,
    price: Option<String>,
    currency: Option<String>,
}

impl CandidateBuilder {
    #[must_use]
    pub const fn new(source: ProductSource) -> Self {
        Self {
            source,
            name: String::new(),
            description: None,
            price: None,
            currency: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl AsRef<str>) -> Self {
        self.name = name.as_ref().trim().to_string();
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<impl AsRef<str>>) -> Self {
        self.description = non_blank(description);
        self
    }

    #[must_use]
    pub fn price(mut self, price: Option<impl AsRef<str>>) -> Self {
        self.price = non_blank(price);
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Option<impl AsRef<str>>) -> Self {
        self.currency = non_blank(currency);
        self
    }

    /// True when no field carries a value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.description.is_none()
            && self.price.is_none()
            && self.currency.is_none()
    }

    #[must_use]
    pub fn build(self) -> ProductCandidate {
        ProductCandidate {
            name: self.name,
            description: self.description,
            price: self.price,
            currency: self.currency,
            source: self.source,
            confidence: self.source.confidence(),
        }
    }
}

fn non_blank(value: Option<impl AsRef<str>>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(ProductSource::JsonLd.confidence() > ProductSource::Microdata.confidence());
        assert_eq!(
            ProductSource::Microdata.confidence(),
            ProductSource::Rdfa.confidence()
        );
        assert!(ProductSource::Rdfa.confidence() > ProductSource::OpenGraph.confidence());
        assert!(ProductSource::OpenGraph.confidence() > ProductSource::TwitterCard.confidence());
        assert!(ProductSource::TwitterCard.confidence() > ProductSource::DublinCore.confidence());
        assert!(
            ProductSource::DublinCore.confidence() > ProductSource::Unstructured.confidence()
        );
    }

    #[test]
    fn test_builder_collapses_blank_fields() {
        let candidate = ProductCandidate::builder(ProductSource::OpenGraph)
            .name("  Walnut Desk ")
            .description(Some("   "))
            .price(Some("120.00"))
            .currency(None::<&str>)
            .build();

        assert_eq!(candidate.name, "Walnut Desk");
        assert_eq!(candidate.description, None);
        assert_eq!(candidate.price.as_deref(), Some("120.00"));
        assert_eq!(candidate.confidence, 0.85);
    }

    #[test]
    fn test_fill_missing_keeps_existing_values() {
        let mut base = ProductCandidate::builder(ProductSource::JsonLd)
            .name("Oak Chair")
            .price(Some("50"))
            .build();
        let other = ProductCandidate::builder(ProductSource::OpenGraph)
            .name("Oak Chair | Shop")
            .description(Some("Solid oak"))
            .price(Some("60"))
            .build();

        base.fill_missing_from(&other);

        assert_eq!(base.name, "Oak Chair");
        assert_eq!(base.price.as_deref(), Some("50"));
        assert_eq!(base.description.as_deref(), Some("Solid oak"));
        assert_eq!(base.source, ProductSource::JsonLd);
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&ProductSource::JsonLd).unwrap();
        assert_eq!(json, "\"JSON_LD\"");
        let json = serde_json::to_string(&ProductSource::OpenGraph).unwrap();
        assert_eq!(json, "\"OPENGRAPH\"");
        let json = serde_json::to_string(&ProductSource::TwitterCard).unwrap();
        assert_eq!(json, "\"TWITTER_CARD\"");
    }
}
