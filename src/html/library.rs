//! Notebook library page (`/notebook?library=list`).

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{compile_selector, compile_static_selector, element_text, first_match, required_attr};
use crate::error::{HtmlFieldError, KindleError};
use crate::model::NotebookBook;

const BOOK_CARD: &str = "div.kp-notebook-library-each-book";
const TITLE: &str = "h2.kp-notebook-searchable";
const AUTHOR: &str = "p.kp-notebook-searchable";
const COVER: &str = "img.kp-notebook-cover-image";
const NEXT_PAGE_START: &str = "input.kp-notebook-library-next-page-start";

/// Date shown on each card, e.g. `Sunday October 24, 2021`.
const ANNOTATED_DATE_FORMAT: &str = "%A %B %d, %Y";
const AUTHOR_PREFIX: &str = "By: ";

static BOOK_CARD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(BOOK_CARD));
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(TITLE));
static AUTHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(AUTHOR));
static COVER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(COVER));
static NEXT_PAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(NEXT_PAGE_START));

/// One parsed notebook library page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookLibraryPage {
    /// Books that parsed cleanly, in page order.
    pub books: Vec<NotebookBook>,
    /// Continuation marker from the hidden next-page input. `None` on the last page.
    pub next_token: Option<String>,
}

/// Parses a notebook library page.
///
/// Cards with a missing field or an unparsable date are dropped.
///
/// # Errors
///
/// Returns [`KindleError::HtmlDecoding`] without a cause when the page has no
/// book cards at all; that means the markup changed, not that the library is
/// empty.
pub fn parse_library_page(body: &str) -> Result<NotebookLibraryPage, KindleError> {
    let document = Html::parse_document(body);

    let cards: Vec<ElementRef<'_>> = document.select(&BOOK_CARD_SELECTOR).collect();
    if cards.is_empty() {
        return Err(KindleError::html(format!(
            "no `{BOOK_CARD}` elements on notebook library page"
        )));
    }

    let candidates = cards.len();
    let books: Vec<NotebookBook> = cards
        .into_iter()
        .enumerate()
        .filter_map(|(index, card)| match parse_book_card(card) {
            Ok(book) => Some(book),
            Err(e) => {
                debug!(index, error = %e, "dropping unparsable notebook book card");
                None
            }
        })
        .collect();

    if books.is_empty() {
        warn!(candidates, "every notebook book card on the page was dropped");
    }

    let next_token = document
        .select(&NEXT_PAGE_SELECTOR)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned);

    debug!(
        candidates,
        parsed = books.len(),
        has_next = next_token.is_some(),
        "parsed notebook library page"
    );

    Ok(NotebookLibraryPage { books, next_token })
}

fn parse_book_card(card: ElementRef<'_>) -> Result<NotebookBook, HtmlFieldError> {
    let asin = required_attr(card, "book card", "id")?.to_string();

    let title = element_text(first_match(card, &TITLE_SELECTOR, TITLE)?);

    let author_text = element_text(first_match(card, &AUTHOR_SELECTOR, AUTHOR)?);
    let author = author_text
        .strip_prefix(AUTHOR_PREFIX)
        .map_or(author_text.as_str(), str::trim)
        .to_string();

    let date_css = format!("input[id$=\"-{asin}\"]");
    let date_selector = compile_selector(&date_css)?;
    let date_input = first_match(card, &date_selector, &date_css)?;
    let date_text = required_attr(date_input, "annotated date input", "value")?;
    let last_annotated = parse_annotated_date(date_text)?;

    let cover_url = required_attr(first_match(card, &COVER_SELECTOR, COVER)?, "cover image", "src")?
        .to_string();

    Ok(NotebookBook {
        asin,
        title,
        author,
        last_annotated,
        cover_url,
    })
}

/// Parses the card date. Month and weekday names are always English.
fn parse_annotated_date(value: &str) -> Result<NaiveDate, HtmlFieldError> {
    NaiveDate::parse_from_str(value.trim(), ANNOTATED_DATE_FORMAT).map_err(|e| {
        HtmlFieldError::InvalidDate {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}
