//! The public client facade.
//!
//! [`KindleClient`] wires the endpoint builder, transport guard, decoding
//! pipelines and page drivers together. Each operation is one logical fetch
//! (or one fully drained listing); nothing is cached between calls.

use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::endpoint::{Endpoint, EndpointBuilder};
use crate::error::KindleError;
use crate::html;
use crate::json;
use crate::model::{Annotation, BookDetails, BookMetadata, LibraryBook, NotebookAnnotation, NotebookBook};
use crate::pagination::{Page, drain_cursor_pages, drain_marker_pages};
use crate::session::SessionContext;
use crate::transport::{RetryPolicy, TransportGuard, build_http_client};

/// Client for one signed-in reader account.
///
/// Cloning is cheap and clones share the connection pool. There is no mutable
/// state, so a client can be used from several tasks at once.
///
/// # Example
///
/// ```no_run
/// use kindle_notebook::{ClientConfig, KindleClient, SessionContext};
///
/// # async fn example(session: SessionContext) -> Result<(), kindle_notebook::KindleError> {
/// let client = KindleClient::with_config(session, ClientConfig::default())?;
/// for book in client.fetch_notebook_library().await? {
///     let annotations = client.fetch_notebook_annotations(&book.asin).await?;
///     println!("{}: {} annotations", book.title, annotations.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KindleClient {
    guard: TransportGuard,
    endpoints: EndpointBuilder,
    html_policy: RetryPolicy,
    json_policy: RetryPolicy,
    library_page_size: u32,
}

impl KindleClient {
    /// Creates a client against the production hosts with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`KindleError::HttpClient`] when the HTTP client cannot be built.
    pub fn new(session: SessionContext) -> Result<Self, KindleError> {
        Self::with_config(session, ClientConfig::default())
    }

    /// Creates a client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`KindleError::InvalidConfig`] when `config` fails validation,
    /// or [`KindleError::HttpClient`] when the HTTP client cannot be built.
    pub fn with_config(session: SessionContext, config: ClientConfig) -> Result<Self, KindleError> {
        config.validate()?;
        let read_base = config.read_base()?;
        let client = build_http_client(&session, &read_base, &config.http_settings())?;

        Ok(Self {
            guard: TransportGuard::new(client),
            endpoints: config.endpoints(),
            html_policy: config.html_retry_policy(),
            json_policy: config.json_retry_policy(),
            library_page_size: config.library_page_size,
        })
    }

    /// Returns the endpoint builder this client targets.
    #[must_use]
    pub fn endpoints(&self) -> &EndpointBuilder {
        &self.endpoints
    }

    /// Lists every owned book from the JSON library search.
    ///
    /// # Errors
    ///
    /// Returns the first transport or decoding error; partial results are discarded.
    #[instrument(skip(self))]
    pub async fn fetch_library(&self) -> Result<Vec<LibraryBook>, KindleError> {
        let page_size = self.library_page_size;
        let books = drain_cursor_pages(|token: String| async move {
            let url = self.endpoints.build(&Endpoint::Library {
                pagination_token: &token,
                page_size,
            });
            let body = self.guard.fetch_text(&url, &self.json_policy).await?;
            let page = json::decode_library_page(&body)?;
            Ok(Page::new(page.items, page.next_token))
        })
        .await?;

        info!(books = books.len(), "fetched library");
        Ok(books)
    }

    /// Fetches reading details, then the metadata they point at.
    ///
    /// # Errors
    ///
    /// Returns [`KindleError::MissingMetadata`] when the details carry no
    /// metadata URL, or any transport or decoding error from either request.
    #[instrument(skip(self))]
    pub async fn fetch_book_details_and_metadata(
        &self,
        asin: &str,
    ) -> Result<(BookDetails, BookMetadata), KindleError> {
        let details_url = self.endpoints.build(&Endpoint::BookDetails { asin });
        let body = self.guard.fetch_text(&details_url, &self.json_policy).await?;
        let details = json::decode_book_details(&body)?;

        let metadata_url = details
            .metadata_url
            .as_deref()
            .ok_or_else(|| KindleError::MissingMetadata {
                asin: asin.to_string(),
            })?;
        let url = self.endpoints.build(&Endpoint::Metadata { url: metadata_url });
        let body = self.guard.fetch_text(&url, &self.json_policy).await?;
        let metadata = json::decode_book_metadata(&body)?;

        Ok((details, metadata))
    }

    /// Fetches a book's annotations from the service API.
    ///
    /// `ref_em_id` comes from [`BookMetadata`] and `yj_format_version` from
    /// [`BookDetails`].
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    #[instrument(skip(self))]
    pub async fn fetch_annotations(
        &self,
        asin: &str,
        ref_em_id: &str,
        yj_format_version: &str,
    ) -> Result<Vec<Annotation>, KindleError> {
        let url = self.endpoints.build(&Endpoint::Annotations {
            asin,
            ref_em_id,
            yj_format_version,
        });
        let body = self.guard.fetch_text(&url, &self.json_policy).await?;
        json::decode_annotations(&body)
    }

    /// Lists every annotated book from the notebook pages.
    ///
    /// # Errors
    ///
    /// Returns the first transport or page-level parse error; partial results
    /// are discarded.
    #[instrument(skip(self))]
    pub async fn fetch_notebook_library(&self) -> Result<Vec<NotebookBook>, KindleError> {
        let books = drain_marker_pages(|token: Option<String>| async move {
            let url = self.endpoints.build(&Endpoint::NotebookLibrary {
                token: token.as_deref(),
            });
            let body = self.guard.fetch_text(&url, &self.html_policy).await?;
            let page = html::parse_library_page(&body)?;
            Ok(Page::new(page.books, page.next_token))
        })
        .await?;

        info!(books = books.len(), "fetched notebook library");
        Ok(books)
    }

    /// Fetches the notebook annotations page of one book.
    ///
    /// # Errors
    ///
    /// Returns any transport error, or [`KindleError::HtmlDecoding`] when the
    /// page has no annotations container.
    #[instrument(skip(self))]
    pub async fn fetch_notebook_annotations(
        &self,
        asin: &str,
    ) -> Result<Vec<NotebookAnnotation>, KindleError> {
        let url = self.endpoints.build(&Endpoint::NotebookAnnotations { asin });
        let body = self.guard.fetch_text(&url, &self.html_policy).await?;
        html::parse_annotations_page(&body)
    }
}
