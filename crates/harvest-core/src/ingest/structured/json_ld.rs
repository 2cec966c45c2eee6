use scraper::Html;
use serde_json::Value;

use crate::candidate::{ProductCandidate, ProductSource};
use crate::ingest::document::selector;
use crate::ingest::extractor::{ExtractionError, ExtractionResult, Extractor};

/// Reads `<script type="application/ld+json">` blocks declaring a Product.
pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn source(&self) -> ProductSource {
        ProductSource::JsonLd
    }

    fn extract(&self, document: &Html) -> ExtractionResult<Vec<ProductCandidate>> {
        let scripts = selector(r#"script[type="application/ld+json"]"#)?;
        let mut found = Vec::new();

        for (index, script) in document.select(&scripts).enumerate() {
            let text: String = script.text().collect();
            if text.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(json) => collect_products(&json, &mut found),
                Err(source) => {
                    let err = ExtractionError::MalformedJson { index, source };
                    tracing::warn!("Skipping JSON-LD script: {}", err);
                }
            }
        }

        Ok(found)
    }
}

/// Walk top-level objects, arrays and `@graph` containers.
fn collect_products(json: &Value, found: &mut Vec<ProductCandidate>) {
    match json {
        Value::Array(items) => {
            for item in items {
                collect_products(item, found);
            }
        }
        Value::Object(map) => {
            if is_product(json) {
                found.push(product_from(json));
            } else if let Some(Value::Array(graph)) = map.get("@graph") {
                for item in graph {
                    collect_products(item, found);
                }
            }
        }
        _ => {}
    }
}

fn is_product(json: &Value) -> bool {
    match json.get("@type") {
        Some(Value::String(t)) => is_product_type(t),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(is_product_type),
        _ => false,
    }
}

fn is_product_type(t: &str) -> bool {
    t == "Product" || t.ends_with("/Product") || t.ends_with(":Product")
}

fn product_from(json: &Value) -> ProductCandidate {
    let offer = match json.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        other => other,
    };

    ProductCandidate::builder(ProductSource::JsonLd)
        .name(text_field(json.get("name")).unwrap_or_default())
        .description(text_field(json.get("description")))
        .price(offer.and_then(|o| text_field(o.get("price").or_else(|| o.get("lowPrice")))))
        .currency(offer.and_then(|o| text_field(o.get("priceCurrency"))))
        .build()
}

/// Render a scalar as text; numbers keep their JSON spelling.
fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
