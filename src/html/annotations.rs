//! Notebook annotations page (`/notebook?asin=...`).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{
    compile_static_regex, compile_static_selector, element_text, first_match, required_attr,
};
use crate::error::{HtmlFieldError, KindleError};
use crate::model::{AnnotationColor, AnnotationKind, NotebookAnnotation};

const CONTAINER: &str = "#kp-notebook-annotations";
const HIGHLIGHT: &str = "#highlight";
const NOTE: &str = "#note";
const HIGHLIGHT_BLOCK: &str = ".kp-notebook-highlight";
const HEADER: &str = "#annotationHighlightHeader";
const LOCATION: &str = "input#kp-annotation-location";

static CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(CONTAINER));
static HIGHLIGHT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(HIGHLIGHT));
static NOTE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(NOTE));
static HIGHLIGHT_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(HIGHLIGHT_BLOCK));
static HEADER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(HEADER));
static LOCATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(LOCATION));

/// Header text looks like `Yellow highlight | Page: 12`.
static PAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"Page:\s*(\d+)"));

/// Parses the annotations page of one book.
///
/// Every direct `div` child of the annotations container is a candidate except
/// the last, which is a sentinel. Candidates without an id or highlight text
/// are dropped. A book with no annotations yields an empty list.
///
/// # Errors
///
/// Returns [`KindleError::HtmlDecoding`] when the annotations container itself
/// is missing.
pub fn parse_annotations_page(body: &str) -> Result<Vec<NotebookAnnotation>, KindleError> {
    let document = Html::parse_document(body);

    let container = document.select(&CONTAINER_SELECTOR).next().ok_or_else(|| {
        KindleError::html_with_cause(
            "annotations container missing from notebook page",
            HtmlFieldError::missing_element(CONTAINER),
        )
    })?;

    let mut candidates: Vec<ElementRef<'_>> = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "div")
        .collect();
    candidates.pop();

    let total = candidates.len();
    let annotations: Vec<NotebookAnnotation> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(index, candidate)| match parse_annotation(candidate) {
            Ok(annotation) => Some(annotation),
            Err(e) => {
                debug!(index, error = %e, "dropping unparsable notebook annotation");
                None
            }
        })
        .collect();

    debug!(
        candidates = total,
        parsed = annotations.len(),
        "parsed notebook annotations page"
    );
    Ok(annotations)
}

fn parse_annotation(element: ElementRef<'_>) -> Result<NotebookAnnotation, HtmlFieldError> {
    let id = required_attr(element, "annotation", "id")?.to_string();

    let highlight = element_text(first_match(element, &HIGHLIGHT_SELECTOR, HIGHLIGHT)?);
    if highlight.is_empty() {
        return Err(HtmlFieldError::missing_element(HIGHLIGHT));
    }

    let note = element
        .select(&NOTE_SELECTOR)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());
    let kind = if note.is_some() {
        AnnotationKind::Note
    } else {
        AnnotationKind::Highlight
    };

    let color = element
        .select(&HIGHLIGHT_BLOCK_SELECTOR)
        .next()
        .and_then(|block| block.value().classes().find_map(AnnotationColor::from_markup_class))
        .unwrap_or_default();

    let page = element
        .select(&HEADER_SELECTOR)
        .next()
        .map(element_text)
        .and_then(|header| parse_page_number(&header));

    let position = element
        .select(&LOCATION_SELECTOR)
        .next()
        .map(|input| parse_location(input.value().attr("value").unwrap_or_default()));

    Ok(NotebookAnnotation {
        id,
        highlight,
        note,
        color,
        kind,
        page,
        position,
    })
}

fn parse_page_number(header: &str) -> Option<u32> {
    PAGE_PATTERN
        .captures(header)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Unparsable locations read as 0.
fn parse_location(value: &str) -> u64 {
    value.trim().parse().unwrap_or(0)
}
