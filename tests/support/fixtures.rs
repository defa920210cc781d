//! Session, config and page builders for the mock reader backend.

use kindle_notebook::{ClientConfig, KindleClient, SessionContext};
use wiremock::MockServer;

pub const SESSION_ID: &str = "139-1234567-7654321";
pub const DEVICE_TOKEN: &str = "device-session-token-abc";

pub fn session() -> SessionContext {
    SessionContext::new(
        [
            ("ubid-main", "131-0000000-0000000"),
            ("at-main", "Atza|IwEBIexample"),
            ("x-main", "x-main-value"),
            ("session-id", SESSION_ID),
            ("session-token", "short-lived-token"),
        ],
        DEVICE_TOKEN,
    )
    .expect("fixture session is complete")
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        read_base_url: server.uri(),
        sign_in_base_url: server.uri(),
        connect_timeout_secs: 5,
        read_timeout_secs: 5,
        ..ClientConfig::default()
    }
}

pub fn client_for(server: &MockServer) -> KindleClient {
    KindleClient::with_config(session(), config_for(server)).expect("client builds")
}

pub fn library_item(asin: &str, title: &str, author: &str) -> serde_json::Value {
    serde_json::json!({
        "asin": asin,
        "webReaderUrl": format!("https://read.amazon.com/?asin={asin}"),
        "productUrl": format!("https://m.media-amazon.com/images/I/{asin}.jpg"),
        "title": title,
        "authors": [author],
        "resourceType": "EBOOK",
        "originType": "PURCHASE"
    })
}

pub fn library_page(items: Vec<serde_json::Value>, token: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "itemsList": items,
        "paginationToken": token,
        "libraryType": "BOOKS",
        "sortType": "recency"
    })
}

pub fn notebook_card(asin: &str, title: &str, date: &str) -> String {
    format!(
        r#"<div id="{asin}" class="a-row kp-notebook-library-each-book">
             <img class="kp-notebook-cover-image" src="https://m.media-amazon.com/images/I/{asin}.jpg">
             <h2 class="kp-notebook-searchable">{title}</h2>
             <p class="kp-notebook-searchable">By: Jane Author</p>
             <input type="hidden" value="{date}" id="kp-notebook-annotated-date-{asin}">
           </div>"#
    )
}

pub fn notebook_library_page(cards: &[String], next: Option<&str>) -> String {
    let marker = next.map_or(String::new(), |value| {
        format!(r#"<input type="hidden" value="{value}" class="kp-notebook-library-next-page-start">"#)
    });
    format!(
        r#"<!DOCTYPE html><html><body><div id="kp-notebook-library">{}</div>{marker}</body></html>"#,
        cards.concat()
    )
}

/// Builds one annotation item; `note: None` leaves out the note block entirely.
pub fn notebook_annotation(
    id: &str,
    color: &str,
    page: u32,
    highlight: &str,
    note: Option<&str>,
) -> String {
    let note = note.map_or(String::new(), |text| {
        format!(r#"<div class="kp-notebook-note"><span id="note">{text}</span></div>"#)
    });
    format!(
        r#"<div id="{id}" class="a-row a-spacing-base">
             <input type="hidden" value="{location}" id="kp-annotation-location">
             <span id="annotationHighlightHeader">Highlight | Page: {page}</span>
             <div class="kp-notebook-highlight kp-notebook-highlight-{color}"><span id="highlight">{highlight}</span></div>
             {note}
           </div>"#,
        location = page * 10
    )
}

pub fn notebook_annotations_page(items: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
             <div id="kp-notebook-annotations" class="a-row">{}<div class="a-row kp-notebook-annotations-sentinel"></div></div>
           </body></html>"#,
        items.concat()
    )
}
