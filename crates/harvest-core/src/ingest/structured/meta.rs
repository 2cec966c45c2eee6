use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::candidate::{CandidateBuilder, ProductCandidate, ProductSource};
use crate::ingest::document::MetaTags;
use crate::ingest::extractor::{ExtractionResult, Extractor};

/// Amount with an optional currency marker before or after it:
/// `$1,299.00`, `1299 EUR`, `£ 45`.
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<pre>[^\d\s.,]+)?\s*(?P<amount>\d[\d.,]*)\s*(?P<post>[^\d\s.,]+)?\s*$")
        .expect("price pattern compiles")
});

const TWITTER_LABEL_PAIRS: usize = 2;

/// Open Graph `og:*` / `product:*` meta tags.
pub struct OpenGraphExtractor;

impl Extractor for OpenGraphExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::OpenGraph
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let tags = MetaTags::collect(document)?;

        let builder = CandidateBuilder::new(self.source())
            .name(tags.get("og:title").unwrap_or_default())
            .description(tags.get("og:description"))
            .price(tags.first(&["product:price:amount", "og:price:amount"]))
            .currency(tags.first(&["product:price:currency", "og:price:currency"]));

        Ok(emit(builder))
    }
}

/// Twitter Card `twitter:*` meta tags, with price read from a
/// `twitter:labelN`/`twitter:dataN` pair.
pub struct TwitterCardExtractor;

impl Extractor for TwitterCardExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::TwitterCard
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let tags = MetaTags::collect(document)?;
        let (price, currency) = twitter_price(&tags).unzip();

        let builder = CandidateBuilder::new(self.source())
            .name(tags.get("twitter:title").unwrap_or_default())
            .description(tags.get("twitter:description"))
            .price(price)
            .currency(currency.flatten());

        Ok(emit(builder))
    }
}

fn twitter_price(tags: &MetaTags) -> Option<(String, Option<String>)> {
    (1..=TWITTER_LABEL_PAIRS).find_map(|n| {
        let label = tags.get(&format!("twitter:label{n}"))?;
        if !label.to_lowercase().contains("price") {
            return None;
        }
        split_price(tags.get(&format!("twitter:data{n}"))?)
    })
}

/// Split a display price into amount and currency marker.
pub fn split_price(text: &str) -> Option<(String, Option<String>)> {
    let caps = PRICE_PATTERN.captures(text)?;
    let amount = caps.name("amount")?.as_str().to_string();
    let currency = caps
        .name("pre")
        .or_else(|| caps.name("post"))
        .map(|m| m.as_str().to_string());
    Some((amount, currency))
}

/// Dublin Core `DC.*` / `dcterms.*` meta tags.
pub struct DublinCoreExtractor;

impl Extractor for DublinCoreExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::DublinCore
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let tags = MetaTags::collect(document)?;

        let builder = CandidateBuilder::new(self.source())
            .name(tags.first(&["dc.title", "dcterms.title"]).unwrap_or_default())
            .description(tags.first(&["dc.description", "dcterms.description"]));

        Ok(emit(builder))
    }
}

fn emit(builder: CandidateBuilder) -> Vec<ProductCandidate> {
    if builder.is_blank() {
        Vec::new()
    } else {
        vec![builder.build()]
    }
}
