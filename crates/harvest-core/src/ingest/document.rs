use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

use super::extractor::{ExtractionError, ExtractionResult};

pub fn selector(css: &str) -> ExtractionResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector(format!("{css}: {e:?}")))
}

/// Visible text of an element: whitespace-trimmed text nodes joined by a
/// single space.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Value carried by a tagged element: the `content` attribute of a meta
/// tag, otherwise the visible text.
pub fn property_value(element: ElementRef<'_>) -> String {
    let value = element.value();
    if value.name() == "meta" {
        if let Some(content) = value.attr("content").filter(|c| !c.trim().is_empty()) {
            return content.trim().to_string();
        }
    }
    visible_text(element)
}

/// Space-separated attribute tokens, e.g. `itemprop="name brand"`.
pub fn attr_tokens<'a>(element: ElementRef<'a>, attr: &str) -> impl Iterator<Item = &'a str> {
    element
        .value()
        .attr(attr)
        .unwrap_or_default()
        .split_whitespace()
}

/// Head-level meta tags keyed by lowercased `property` or `name`. The first
/// non-empty occurrence of each key wins.
#[derive(Debug, Default)]
pub struct MetaTags {
    values: HashMap<String, String>,
}

impl MetaTags {
    pub fn collect(document: &Html) -> ExtractionResult<Self> {
        let meta = selector("meta[content]")?;
        let mut values = HashMap::new();

        for element in document.select(&meta) {
            let value = element.value();
            let Some(key) = value.attr("property").or_else(|| value.attr("name")) else {
                continue;
            };
            let content = value.attr("content").unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            values
                .entry(key.trim().to_lowercase())
                .or_insert_with(|| content.to_string());
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// First present key in `keys`.
    pub fn first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_prefers_meta_content() {
        let html = Html::parse_fragment(
            r#"<div><meta itemprop="price" content=" 199.00 "><span itemprop="name">
                Oak <b>Chair</b> </span></div>"#,
        );
        let meta = html.select(&selector("meta").unwrap()).next().unwrap();
        let span = html.select(&selector("span").unwrap()).next().unwrap();

        assert_eq!(property_value(meta), "199.00");
        assert_eq!(property_value(span), "Oak Chair");
    }

    #[test]
    fn test_meta_without_content_falls_back_to_text() {
        let html = Html::parse_fragment(r#"<meta itemprop="name">"#);
        let meta = html.select(&selector("meta").unwrap()).next().unwrap();
        assert_eq!(property_value(meta), "");
    }

    #[test]
    fn test_meta_tags_case_insensitive_keys() {
        let html = Html::parse_document(
            r#"<html><head>
                <meta name="DC.Title" content="Teak Bench">
                <meta property="og:title" content="First">
                <meta property="og:title" content="Second">
                <meta property="og:description" content="  ">
            </head></html>"#,
        );
        let tags = MetaTags::collect(&html).unwrap();

        assert_eq!(tags.get("dc.title"), Some("Teak Bench"));
        assert_eq!(tags.get("og:title"), Some("First"));
        assert_eq!(tags.get("og:description"), None);
        assert_eq!(tags.first(&["missing", "og:title"]), Some("First"));
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        assert!(matches!(selector("[["), Err(ExtractionError::Selector(_))));
    }
}
