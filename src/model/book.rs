use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A book from the JSON library search (currently owned titles).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryBook {
    /// Book identifier (ASIN). Never empty.
    pub asin: String,
    /// Cloud reader URL that opens the book.
    pub web_reader_url: String,
    /// Cover image URL.
    pub cover_url: String,
    /// Title as listed.
    pub title: String,
    /// Raw author strings (`"Lastname, Firstname:"` segments).
    pub authors: Vec<String>,
    /// Display author derived from the first raw author entry.
    pub author: String,
    /// Resource type tag (e.g. `EBOOK`).
    pub resource_type: String,
    /// Details, when fetched separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BookDetails>,
    /// Metadata, when fetched separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BookMetadata>,
}

impl LibraryBook {
    /// Attaches lazily fetched details and metadata.
    #[must_use]
    pub fn attach(mut self, details: BookDetails, metadata: BookMetadata) -> Self {
        self.details = Some(details);
        self.metadata = Some(metadata);
        self
    }
}

/// A book from the HTML notebook library (every annotated title).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookBook {
    /// Book identifier taken from the card element's id. Never empty.
    pub asin: String,
    /// Title.
    pub title: String,
    /// Display author with any `By: ` prefix removed.
    pub author: String,
    /// Date the book was last annotated.
    pub last_annotated: NaiveDate,
    /// Cover image URL.
    pub cover_url: String,
}

/// Reading details returned when a book is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetails {
    /// Content version string.
    pub content_version: String,
    /// Format version (`YJFormatVersion`), needed to fetch JSON annotations.
    pub format_version: String,
    /// Absolute metadata locator. Absent for some titles.
    pub metadata_url: Option<String>,
    /// Furthest read position synced from a device, if any.
    pub last_page_read: Option<LastPageRead>,
}

/// Last synced reading position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastPageRead {
    /// Content position.
    pub position: u64,
    /// When the position was synced.
    pub sync_time: DateTime<Utc>,
    /// Name of the device that synced it.
    pub device_name: Option<String>,
}

/// Publication metadata decoded from the JSONP metadata resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    /// Publisher.
    pub publisher: Option<String>,
    /// Release date as published (free-form).
    pub release_date: Option<String>,
    /// Content version.
    pub version: Option<String>,
    /// First content position.
    pub start_position: u64,
    /// Last content position.
    pub end_position: u64,
    /// Reference id required to fetch JSON annotations.
    pub ref_em_id: String,
}
