//! Wire shapes of the service API responses.

use serde::{Deserialize, Deserializer};

use crate::model::{AnnotationColor, AnnotationKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawLibraryPage {
    pub(super) items_list: Vec<RawLibraryItem>,
    pub(super) pagination_token: Option<String>,
    pub(super) library_type: Option<String>,
    pub(super) sort_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawLibraryItem {
    pub(super) asin: String,
    #[serde(default)]
    pub(super) web_reader_url: String,
    #[serde(default)]
    pub(super) product_url: String,
    pub(super) title: String,
    #[serde(default)]
    pub(super) authors: Vec<String>,
    #[serde(default)]
    pub(super) resource_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawBookDetails {
    #[serde(default)]
    pub(super) content_version: String,
    #[serde(rename = "YJFormatVersion", default)]
    pub(super) format_version: String,
    pub(super) metadata_url: Option<String>,
    pub(super) last_page_read_data: Option<RawLastPageRead>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawLastPageRead {
    pub(super) position: u64,
    pub(super) sync_time: i64,
    pub(super) device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawBookMetadata {
    pub(super) publisher: Option<String>,
    pub(super) release_date: Option<String>,
    pub(super) version: Option<String>,
    pub(super) start_position: u64,
    pub(super) end_position: u64,
    pub(super) ref_em_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawAnnotations {
    pub(super) annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawAnnotation {
    #[serde(default)]
    pub(super) highlight: String,
    #[serde(default, deserialize_with = "lenient_note")]
    pub(super) note: Option<String>,
    pub(super) color: Option<AnnotationColor>,
    #[serde(rename = "type")]
    pub(super) kind: AnnotationKind,
    #[serde(default)]
    pub(super) position: u64,
    #[serde(default)]
    pub(super) start_offset: u64,
    #[serde(default)]
    pub(super) end_offset: u64,
}

// Any value is accepted; only a non-blank string becomes a note.
fn lenient_note<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .map(str::trim)
        .filter(|note| !note.is_empty())
        .map(ToOwned::to_owned))
}
