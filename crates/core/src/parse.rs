//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types used by every
//! extraction pipeline. A [`Document`] owns the parsed tree; dropping it
//! releases the tree, so pipelines parse inside a synchronous scope and the
//! document never outlives the call that produced it.
//!
//! # Example
//!
//! ```rust
//! use batcave_core::parse::Document;
//!
//! let html = r#"
//!     <ul class="poster__subtitle"><li>Image</li><li>2003</li></ul>
//! "#;
//!
//! let doc = Document::parse(html);
//! let items = doc.select("ul.poster__subtitle li").unwrap();
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[0].text(), "Image");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{Result, SourceError};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Parsing is lenient: malformed markup yields a best-effort tree, never an error.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use batcave_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Returns true when at least one element matches the selector.
    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.select_first(selector)?.is_some())
    }
}

/// A wrapper around scraper's ElementRef for fragment-level queries.
///
/// Query helpers on an element are used by the item normalizers, where a
/// miss is expected and never fatal; they return `None` or an empty vector
/// instead of an error.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the text content of this element, trimmed.
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }

    /// Gets the trimmed text content, or `None` when it is empty.
    pub fn non_empty_text(&self) -> Option<String> {
        Some(self.text()).filter(|t| !t.is_empty())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Selects descendant elements.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects descendants, treating an invalid selector as no match.
    pub fn all(&self, selector: &str) -> Vec<Element<'a>> {
        self.select(selector).unwrap_or_default()
    }

    /// First descendant matching the selector.
    pub fn first(&self, selector: &str) -> Option<Element<'a>> {
        let sel = Selector::parse(selector).ok()?;
        self.element.select(&sel).next().map(|el| Element { element: el })
    }

    /// Text of the first non-blank node following this element among its siblings.
    ///
    /// Used for `<div>Label:</div> value` pairs where the value is a bare text node.
    pub fn following_text(&self) -> Option<String> {
        for sibling in self.element.next_siblings() {
            let text = if let Some(text) = sibling.value().as_text() {
                text.trim().to_string()
            } else if let Some(el) = ElementRef::wrap(sibling) {
                el.text().collect::<String>().trim().to_string()
            } else {
                continue;
            };

            if !text.is_empty() {
                return Some(text);
            }
        }
        None
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| SourceError::HtmlParseError(format!("Invalid selector: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head><title> Test Page </title></head>
        <body>
            <ul class="page__list">
                <li><div>Publisher:</div> DC Comics</li>
                <li><div>Writer:</div> <a href="/w/1">Alan Moore</a></li>
            </ul>
            <a class="poster" href="https://batcave.biz/1-x.html">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_select_and_attr() {
        let doc = Document::parse(SAMPLE_HTML);
        let links = doc.select("a.poster").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attr("href"), Some("https://batcave.biz/1-x.html"));
        assert_eq!(links[0].text(), "Link");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(matches!(doc.select("[[invalid"), Err(SourceError::HtmlParseError(_))));
    }

    #[test]
    fn test_element_helpers_tolerate_bad_selectors() {
        let doc = Document::parse(SAMPLE_HTML);
        let list = doc.select_first("ul.page__list").unwrap().unwrap();
        assert!(list.first("[[invalid").is_none());
        assert!(list.all("[[invalid").is_empty());
    }

    #[test]
    fn test_following_text_skips_whitespace() {
        let doc = Document::parse(SAMPLE_HTML);
        let label = doc.select_first("ul.page__list li div").unwrap().unwrap();
        assert_eq!(label.following_text(), Some("DC Comics".to_string()));
    }

    #[test]
    fn test_following_text_reads_element_sibling() {
        let doc = Document::parse(SAMPLE_HTML);
        let labels = doc.select("ul.page__list li div").unwrap();
        assert_eq!(labels[1].following_text(), Some("Alan Moore".to_string()));
    }

    #[test]
    fn test_first_match_in_document_order() {
        let doc = Document::parse(SAMPLE_HTML);
        let list = doc.select_first("ul.page__list").unwrap().unwrap();
        assert_eq!(list.first("li div").map(|e| e.text()), Some("Publisher:".to_string()));
        assert!(doc.exists("a.poster").unwrap());
        assert!(!doc.exists("a.missing").unwrap());
    }
}
