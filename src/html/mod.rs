//! Notebook page parsing.
//!
//! The notebook surface renders two page shapes: the library list
//! (`/notebook?library=list`) and the per-book annotations page. Both are
//! parsed with CSS selection over a [`scraper::Html`] document.
//!
//! Parsing is tolerant per item: a card or annotation missing a required
//! element is logged at debug level and dropped, and the rest of the page is
//! returned. Only page-level shape failures become [`KindleError::HtmlDecoding`].
//!
//! [`KindleError::HtmlDecoding`]: crate::KindleError::HtmlDecoding

mod annotations;
mod library;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::error::HtmlFieldError;

pub use annotations::parse_annotations_page;
pub use library::{NotebookLibraryPage, parse_library_page};

/// Compiles a selector literal.
///
/// Only used for the fixed selectors below; a bad literal is a programming
/// error caught by the unit tests.
fn compile_static_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector '{css}': {e}"))
}

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Compiles a selector assembled from page data.
fn compile_selector(css: &str) -> Result<Selector, HtmlFieldError> {
    Selector::parse(css).map_err(|_| HtmlFieldError::InvalidSelector {
        selector: css.to_string(),
    })
}

/// Returns the first descendant matching `selector`.
fn first_match<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
    css: &str,
) -> Result<ElementRef<'a>, HtmlFieldError> {
    element
        .select(selector)
        .next()
        .ok_or_else(|| HtmlFieldError::missing_element(css))
}

/// Returns a non-empty attribute value.
fn required_attr<'a>(
    element: ElementRef<'a>,
    name: &'static str,
    attribute: &'static str,
) -> Result<&'a str, HtmlFieldError> {
    element
        .value()
        .attr(attribute)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| HtmlFieldError::missing_attribute(name, attribute))
}

/// Concatenated text content, trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
