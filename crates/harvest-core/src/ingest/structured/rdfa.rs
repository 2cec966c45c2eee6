use scraper::{ElementRef, Html};

use crate::candidate::{ProductCandidate, ProductSource};
use crate::ingest::document::{attr_tokens, property_value, selector};
use crate::ingest::extractor::{ExtractionResult, Extractor};

/// Reads RDFa markup (`typeof`/`property`).
pub struct RdfaExtractor;

impl Extractor for RdfaExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::Rdfa
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let typed = selector("[typeof]")?;

        let found = document
            .select(&typed)
            .filter(|el| is_product(*el))
            .filter(|el| !has_product_ancestor(*el))
            .map(product_from)
            .collect();

        Ok(found)
    }
}

fn is_product(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("typeof")
        .is_some_and(|t| t.contains("Product"))
}

fn has_product_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_product)
}

fn product_from(product: ElementRef<'_>) -> ProductCandidate {
    let offer = find_offer(product);
    let offered = |prop: &str| {
        offer
            .and_then(|o| find_property(o, prop))
            .or_else(|| find_property(product, prop))
            .map(property_value)
    };

    ProductCandidate::builder(ProductSource::Rdfa)
        .name(find_property(product, "name").map(property_value).unwrap_or_default())
        .description(find_property(product, "description").map(property_value))
        .price(offered("price"))
        .currency(offered("priceCurrency"))
        .build()
}

fn find_offer(product: ElementRef<'_>) -> Option<ElementRef<'_>> {
    product
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().attr("typeof").is_some_and(|t| t.contains("Offer"))
                || attr_tokens(*el, "property").any(|p| matches_term(p, "offers"))
        })
}

/// First `prop` whose nearest typed ancestor is `scope`, so a nested
/// brand's or seller's name is never read as the product's.
fn find_property<'a>(scope: ElementRef<'a>, prop: &str) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| attr_tokens(*el, "property").any(|p| matches_term(p, prop)))
        .find(|el| owning_scope(*el).is_some_and(|owner| owner.id() == scope.id()))
}

fn owning_scope(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr("typeof").is_some())
}

/// `name`, `schema:name` and `http://schema.org/name` all name the same term.
fn matches_term(token: &str, term: &str) -> bool {
    token == term
        || token
            .strip_suffix(term)
            .is_some_and(|prefix| prefix.ends_with(':') || prefix.ends_with('/'))
}
