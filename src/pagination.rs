//! Page drivers for the two list surfaces.
//!
//! The JSON library search is cursor-driven: the first request carries an
//! empty token and the server returns the next cursor, or null when done. The
//! notebook library embeds its continuation marker in a hidden input, and the
//! first page uses a different query shape with no token at all.
//!
//! Both drivers are strictly sequential and stop at the first error, dropping
//! whatever they had accumulated.

use std::future::Future;

use tracing::debug;

use crate::error::KindleError;

/// One fetched and decoded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Continuation token reported by the page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

/// Drains a cursor-paginated listing.
///
/// The first call receives `""`. Iteration continues while the previous page
/// returned `Some` token, including `Some("")`.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`.
pub async fn drain_cursor_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, KindleError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>, KindleError>>,
{
    let mut items = Vec::new();
    let mut token = Some(String::new());
    let mut pages = 0_u32;

    while let Some(current) = token.take() {
        let page = fetch_page(current).await?;
        pages += 1;
        debug!(page = pages, items = page.items.len(), "fetched cursor page");
        items.extend(page.items);
        token = page.next_token;
    }

    debug!(pages, total = items.len(), "cursor pagination finished");
    Ok(items)
}

/// Drains a listing whose pages embed their own continuation marker.
///
/// The first call receives `None`. Iteration continues while the page carried
/// a non-empty marker.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page`.
pub async fn drain_marker_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, KindleError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, KindleError>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0_u32;

    loop {
        let page = fetch_page(token.take()).await?;
        pages += 1;
        debug!(page = pages, items = page.items.len(), "fetched marker page");
        items.extend(page.items);

        match page.next_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    debug!(pages, total = items.len(), "marker pagination finished");
    Ok(items)
}
