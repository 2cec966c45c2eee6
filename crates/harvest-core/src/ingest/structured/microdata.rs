use scraper::{ElementRef, Html};

use crate::candidate::{ProductCandidate, ProductSource};
use crate::ingest::document::{attr_tokens, property_value, selector};
use crate::ingest::extractor::{ExtractionResult, Extractor};

const PRODUCT_VOCABULARY: &str = "schema.org/Product";

/// Reads schema.org microdata (`itemscope`/`itemtype`/`itemprop`).
pub struct MicrodataExtractor;

impl Extractor for MicrodataExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::Microdata
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let typed = selector("[itemtype]")?;

        let found = document
            .select(&typed)
            .filter(|el| {
                el.value()
                    .attr("itemtype")
                    .is_some_and(|t| t.contains(PRODUCT_VOCABULARY))
            })
            .map(product_from)
            .collect();

        Ok(found)
    }
}

fn product_from(product: ElementRef<'_>) -> ProductCandidate {
    let offers = scoped_property(product, "offers");
    let from_offers = |prop: &str| offers.and_then(|o| scoped_property(o, prop));

    let price = scoped_property(product, "price").or_else(|| from_offers("price"));
    let currency =
        scoped_property(product, "priceCurrency").or_else(|| from_offers("priceCurrency"));

    ProductCandidate::builder(ProductSource::Microdata)
        .name(scoped_property(product, "name").map(property_value).unwrap_or_default())
        .description(scoped_property(product, "description").map(property_value))
        .price(price.map(property_value))
        .currency(currency.map(property_value))
        .build()
}

/// First descendant carrying `itemprop=prop` whose owning item scope is
/// `scope`. Properties of nested items (a brand's `name`, an offer's
/// `price`) are not attributed to the outer item.
fn scoped_property<'a>(scope: ElementRef<'a>, prop: &str) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| attr_tokens(*el, "itemprop").any(|p| p == prop))
        .find(|el| owning_scope(*el).is_some_and(|owner| owner.id() == scope.id()))
}

fn owning_scope(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().attr("itemscope").is_some() || el.value().attr("itemtype").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<ProductCandidate> {
        MicrodataExtractor.extract_html(html).unwrap()
    }

    #[test]
    fn test_direct_properties() {
        let found = extract(
            r#"<div itemscope itemtype="https://schema.org/Product">
                <h1 itemprop="name">Teak Garden Bench</h1>
                <p itemprop="description">Weatherproof teak</p>
                <meta itemprop="price" content="320.00">
                <meta itemprop="priceCurrency" content="GBP">
            </div>"#,
        );

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Teak Garden Bench");
        assert_eq!(found[0].description.as_deref(), Some("Weatherproof teak"));
        assert_eq!(found[0].price.as_deref(), Some("320.00"));
        assert_eq!(found[0].currency.as_deref(), Some("GBP"));
        assert_eq!(found[0].confidence, 0.9);
    }

    #[test]
    fn test_price_from_offers_scope() {
        let found = extract(
            r#"<div itemscope itemtype="http://schema.org/Product">
                <span itemprop="name">Velvet Armchair</span>
                <div itemprop="brand" itemscope itemtype="http://schema.org/Brand">
                    <span itemprop="name">Acme</span>
                </div>
                <div itemprop="offers" itemscope itemtype="http://schema.org/Offer">
                    <span itemprop="priceCurrency" content="USD">$</span>
                    <span itemprop="price">899</span>
                </div>
            </div>"#,
        );

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Velvet Armchair");
        assert_eq!(found[0].price.as_deref(), Some("899"));
        assert_eq!(found[0].currency.as_deref(), Some("$"));
    }

    #[test]
    fn test_nested_item_name_not_used() {
        let found = extract(
            r#"<div itemscope itemtype="https://schema.org/Product">
                <div itemprop="brand" itemscope itemtype="https://schema.org/Brand">
                    <span itemprop="name">Acme</span>
                </div>
            </div>"#,
        );

        assert_eq!(found.len(), 1);
        assert!(!found[0].has_name());
    }

    #[test]
    fn test_other_item_types_ignored() {
        let found = extract(
            r#"<div itemscope itemtype="https://schema.org/Organization">
                <span itemprop="name">Acme Furniture</span>
            </div>"#,
        );
        assert!(found.is_empty());
    }
}
