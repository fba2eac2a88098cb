//! Category extraction from raw markup
//!
//! Extraction is a total function: any input, including empty or malformed
//! markup, yields a best-effort `(name, description)` pair. Fallback
//! precedence when the primary selectors miss:
//!
//! 1. name: primary heading selector, else `<title>`, else empty
//! 2. description: description block (`<p>` children, space-joined), else
//!    `meta[name="description"]`, else the (possibly empty) name

use crate::config::ExtractConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// An extracted category pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub description: String,
}

/// Compiled selectors used by [`extract_category`]
///
/// Compiling up front keeps extraction itself infallible and moves selector
/// errors to configuration load time.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    name: Selector,
    description: Selector,
    title: Selector,
    meta_description: Selector,
    paragraph: Selector,
}

impl ExtractRules {
    /// Compiles the configurable selectors plus the fixed fallback selectors
    pub fn new(name_selector: &str, description_selector: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: parse_selector(name_selector)?,
            description: parse_selector(description_selector)?,
            title: parse_selector("title")?,
            meta_description: parse_selector(r#"meta[name="description"]"#)?,
            paragraph: parse_selector("p")?,
        })
    }

    pub fn from_config(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Self::new(&config.name_selector, &config.description_selector)
    }
}

fn parse_selector(raw: &str) -> Result<Selector, ConfigError> {
    Selector::parse(raw).map_err(|_| ConfigError::InvalidSelector(raw.to_string()))
}

/// Extracts a category pair from raw markup
///
/// Never fails: missing or malformed structure degrades through the fallback
/// chain down to empty strings.
pub fn extract_category(html: &str, rules: &ExtractRules) -> Category {
    let document = Html::parse_document(html);

    let name = document
        .select(&rules.name)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            document
                .select(&rules.title)
                .next()
                .map(element_text)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default();

    let description = document
        .select(&rules.description)
        .next()
        .map(|block| {
            block
                .select(&rules.paragraph)
                .map(|p| element_text(p))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
        .or_else(|| {
            document
                .select(&rules.meta_description)
                .next()
                .and_then(|meta| meta.value().attr("content"))
                .map(|content| content.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| name.clone());

    Category { name, description }
}

/// Collects an element's text with whitespace collapsed
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExtractRules {
        ExtractRules::new("h2.category-title", "div.category-desc").expect("selectors compile")
    }

    #[test]
    fn test_primary_selectors() {
        let html = r#"
            <html><head><title>Fallback Title</title></head><body>
            <h2 class="category-title">  Section A  </h2>
            <div class="category-desc"><p>First part.</p><p>Second part.</p></div>
            </body></html>
        "#;

        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Section A");
        assert_eq!(category.description, "First part. Second part.");
    }

    #[test]
    fn test_name_falls_back_to_title() {
        let html = r#"
            <html><head><title>Section B</title></head><body>
            <div class="category-desc"><p>Body text.</p></div>
            </body></html>
        "#;

        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Section B");
        assert_eq!(category.description, "Body text.");
    }

    #[test]
    fn test_empty_heading_falls_back_to_title() {
        let html = r#"
            <html><head><title>Section C</title></head><body>
            <h2 class="category-title">   </h2>
            </body></html>
        "#;

        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Section C");
    }

    #[test]
    fn test_description_falls_back_to_meta() {
        let html = r#"
            <html><head>
            <title>Section D</title>
            <meta name="description" content="  From the meta tag.  ">
            </head><body></body></html>
        "#;

        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Section D");
        assert_eq!(category.description, "From the meta tag.");
    }

    #[test]
    fn test_description_block_without_paragraphs_falls_back() {
        let html = r#"
            <html><head>
            <title>Section E</title>
            <meta name="description" content="Meta wins.">
            </head><body>
            <div class="category-desc">no paragraphs here</div>
            </body></html>
        "#;

        let category = extract_category(html, &rules());
        assert_eq!(category.description, "Meta wins.");
    }

    #[test]
    fn test_description_falls_back_to_name() {
        let html = r#"<html><head><title>Only a Title</title></head><body></body></html>"#;

        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Only a Title");
        assert_eq!(category.description, "Only a Title");
    }

    #[test]
    fn test_empty_input() {
        let category = extract_category("", &rules());
        assert_eq!(category.name, "");
        assert_eq!(category.description, "");
    }

    #[test]
    fn test_malformed_input_never_fails() {
        for garbage in [
            "<<<<>>>>",
            "<html><body><div><p>unclosed",
            "plain text, no markup at all",
            "\u{0}\u{1}\u{2} binary-ish",
            "<h2 class=\"category-title\"><h2><h2>",
        ] {
            let _ = extract_category(garbage, &rules());
        }
    }

    #[test]
    fn test_invalid_selector_rejected() {
        assert!(matches!(
            ExtractRules::new("h2..[", "div.ok"),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_whitespace_collapsed() {
        let html = "<h2 class=\"category-title\">Multi\n   word\t name</h2>";
        let category = extract_category(html, &rules());
        assert_eq!(category.name, "Multi word name");
    }
}
