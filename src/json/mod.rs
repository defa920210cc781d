//! JSON decoding pipeline.
//!
//! Validated response bodies from the service API are decoded into wire
//! structs (see `wire`) and then converted into the public records. Every
//! failure is reported as [`KindleError::Decoding`] wrapping the serde cause.
//!
//! The metadata resource is served as JSONP (`loadMetadata({...});`), so it is
//! unwrapped with [`strip_jsonp`] before decoding.

mod wire;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use tracing::debug;

use crate::error::KindleError;
use crate::model::{Annotation, BookDetails, BookMetadata, LastPageRead, LibraryBook};

use wire::{RawAnnotations, RawBookDetails, RawBookMetadata, RawLibraryItem, RawLibraryPage};

/// One decoded page of the JSON library search.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryPage {
    /// Books on this page, in server order.
    pub items: Vec<LibraryBook>,
    /// Cursor for the next page. `None` when this was the last page.
    pub next_token: Option<String>,
    /// Library type tag echoed by the server.
    pub library_type: Option<String>,
    /// Sort type tag echoed by the server.
    pub sort_type: Option<String>,
}

/// Decodes one library search page.
///
/// # Errors
///
/// Returns [`KindleError::Decoding`] when the body is not a library page or an
/// item has an empty ASIN.
pub fn decode_library_page(body: &str) -> Result<LibraryPage, KindleError> {
    const CONTEXT: &str = "library page";
    let raw: RawLibraryPage =
        serde_json::from_str(body).map_err(|e| KindleError::decoding(CONTEXT, e))?;

    let items = raw
        .items_list
        .into_iter()
        .map(library_book_from_raw)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| KindleError::decoding(CONTEXT, e))?;

    debug!(
        items = items.len(),
        has_next = raw.pagination_token.is_some(),
        "decoded library page"
    );

    Ok(LibraryPage {
        items,
        next_token: raw.pagination_token,
        library_type: raw.library_type,
        sort_type: raw.sort_type,
    })
}

fn library_book_from_raw(raw: RawLibraryItem) -> Result<LibraryBook, serde_json::Error> {
    if raw.asin.trim().is_empty() {
        return Err(serde_json::Error::custom(format!(
            "library item '{}' has an empty asin",
            raw.title
        )));
    }
    let author = display_author(&raw.authors);
    Ok(LibraryBook {
        asin: raw.asin,
        web_reader_url: raw.web_reader_url,
        cover_url: raw.product_url,
        title: raw.title,
        authors: raw.authors,
        author,
        resource_type: raw.resource_type,
        details: None,
        metadata: None,
    })
}

/// Derives the display author from raw author entries.
///
/// Only the first entry is used. It may hold several `"Lastname, Firstname"`
/// segments separated by `:`; duplicates are dropped keeping the first
/// occurrence, the first segment is taken and its two comma-separated parts are
/// swapped. `"Smith, John:Smith, J."` becomes `"John Smith"`.
#[must_use]
pub fn display_author(authors: &[String]) -> String {
    let Some(first) = authors.first() else {
        return String::new();
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in first.split(':').map(str::trim).filter(|s| !s.is_empty()) {
        if !segments.contains(&segment) {
            segments.push(segment);
        }
    }

    match segments.first() {
        Some(segment) => match segment.split_once(',') {
            Some((last, first)) => format!("{} {}", first.trim(), last.trim())
                .trim()
                .to_string(),
            None => (*segment).to_string(),
        },
        None => String::new(),
    }
}

/// Decodes the `startReading` details response.
///
/// # Errors
///
/// Returns [`KindleError::Decoding`] when the body does not match, or the sync
/// timestamp is out of range.
pub fn decode_book_details(body: &str) -> Result<BookDetails, KindleError> {
    const CONTEXT: &str = "book details";
    let raw: RawBookDetails =
        serde_json::from_str(body).map_err(|e| KindleError::decoding(CONTEXT, e))?;

    let last_page_read = match raw.last_page_read_data {
        Some(data) => {
            let sync_time = DateTime::<Utc>::from_timestamp_millis(data.sync_time).ok_or_else(
                || {
                    KindleError::decoding(
                        CONTEXT,
                        serde_json::Error::custom(format!(
                            "syncTime {} is out of range",
                            data.sync_time
                        )),
                    )
                },
            )?;
            Some(LastPageRead {
                position: data.position,
                sync_time,
                device_name: data.device_name,
            })
        }
        None => None,
    };

    Ok(BookDetails {
        content_version: raw.content_version,
        format_version: raw.format_version,
        metadata_url: raw.metadata_url.filter(|url| !url.trim().is_empty()),
        last_page_read,
    })
}

/// Returns the JSON object inside a JSONP wrapper.
///
/// Takes the text from the first `{` through the last `}`. Text without such a
/// pair is returned unchanged.
#[must_use]
pub fn strip_jsonp(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Decodes the JSONP metadata resource.
///
/// # Errors
///
/// Returns [`KindleError::Decoding`] when the unwrapped body does not match or
/// carries an empty `refEmId`.
pub fn decode_book_metadata(body: &str) -> Result<BookMetadata, KindleError> {
    const CONTEXT: &str = "book metadata";
    let raw: RawBookMetadata =
        serde_json::from_str(strip_jsonp(body)).map_err(|e| KindleError::decoding(CONTEXT, e))?;

    if raw.ref_em_id.trim().is_empty() {
        return Err(KindleError::decoding(
            CONTEXT,
            serde_json::Error::custom("refEmId is empty"),
        ));
    }

    Ok(BookMetadata {
        publisher: raw.publisher,
        release_date: raw.release_date,
        version: raw.version,
        start_position: raw.start_position,
        end_position: raw.end_position,
        ref_em_id: raw.ref_em_id,
    })
}

/// Decodes the JSON annotations response.
///
/// A missing or malformed `note` never fails the record; it decodes as `None`.
///
/// # Errors
///
/// Returns [`KindleError::Decoding`] when the body does not match.
pub fn decode_annotations(body: &str) -> Result<Vec<Annotation>, KindleError> {
    let raw: RawAnnotations =
        serde_json::from_str(body).map_err(|e| KindleError::decoding("annotations", e))?;

    Ok(raw
        .annotations
        .into_iter()
        .map(|a| Annotation {
            highlight: a.highlight,
            note: a.note,
            color: a.color.unwrap_or_default(),
            kind: a.kind,
            position: a.position,
            start_offset: a.start_offset,
            end_offset: a.end_offset,
        })
        .collect())
}
