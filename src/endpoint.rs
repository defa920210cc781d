//! Request intent to URL mapping.
//!
//! Pure string construction: no network access and no parsing. Callers must
//! pass well-formed parameters; a malformed parameter is a contract violation,
//! not a runtime error, so the builder returns plain `String`s.

use urlencoding::encode;

/// Default reader service base URL.
pub const DEFAULT_READ_BASE_URL: &str = "https://read.amazon.com";

/// Default sign-in host base URL.
pub const DEFAULT_SIGN_IN_BASE_URL: &str = "https://www.amazon.com";

/// Path of the sign-in page. A 2xx response resolving here means the session expired.
pub const SIGN_IN_PATH: &str = "/ap/signin";

/// Client version the reader web app reports when opening a book.
const READER_CLIENT_VERSION: &str = "20000100";

/// A logical request intent plus its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// The sign-in page.
    SignIn,
    /// Device token registration lookup.
    DeviceToken {
        /// Device token used as both serial number and device type.
        device_token: &'a str,
    },
    /// One page of the JSON library search. An empty token requests the first page.
    Library {
        /// Cursor returned by the previous page, or `""` for page one.
        pagination_token: &'a str,
        /// Number of items per page.
        page_size: u32,
    },
    /// Book details (`startReading`).
    BookDetails {
        /// Book identifier.
        asin: &'a str,
    },
    /// Book metadata. The locator comes from [`BookDetails`](crate::BookDetails) and is absolute.
    Metadata {
        /// Absolute metadata URL.
        url: &'a str,
    },
    /// JSON annotations for a book.
    Annotations {
        /// Book identifier.
        asin: &'a str,
        /// Reference id from the book metadata.
        ref_em_id: &'a str,
        /// Format version from the book details.
        yj_format_version: &'a str,
    },
    /// One page of the HTML notebook library. `None` requests the first page.
    NotebookLibrary {
        /// Hidden-field token extracted from the previous page.
        token: Option<&'a str>,
    },
    /// The HTML annotations page for a book.
    NotebookAnnotations {
        /// Book identifier.
        asin: &'a str,
    },
}

/// Maps [`Endpoint`] intents onto concrete URLs for a given pair of hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBuilder {
    read_base_url: String,
    sign_in_base_url: String,
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_READ_BASE_URL, DEFAULT_SIGN_IN_BASE_URL)
    }
}

impl EndpointBuilder {
    /// Creates a builder with custom hosts (used by integration tests).
    #[must_use]
    pub fn new(read_base_url: impl Into<String>, sign_in_base_url: impl Into<String>) -> Self {
        Self {
            read_base_url: read_base_url.into().trim_end_matches('/').to_string(),
            sign_in_base_url: sign_in_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the reader base URL without a trailing slash.
    #[must_use]
    pub fn read_base_url(&self) -> &str {
        &self.read_base_url
    }

    /// Builds the URL for `endpoint`.
    #[must_use]
    pub fn build(&self, endpoint: &Endpoint<'_>) -> String {
        let read = &self.read_base_url;
        match *endpoint {
            Endpoint::SignIn => format!("{}{SIGN_IN_PATH}", self.sign_in_base_url),
            Endpoint::DeviceToken { device_token } => {
                let token = encode(device_token);
                format!(
                    "{read}/service/web/register/getDeviceToken?serialNumber={token}&deviceType={token}"
                )
            }
            Endpoint::Library {
                pagination_token,
                page_size,
            } => {
                let mut url = format!(
                    "{read}/kindle-library/search?query=&libraryType=BOOKS&sortType=recency&querySize={page_size}"
                );
                if !pagination_token.is_empty() {
                    url.push_str("&paginationToken=");
                    url.push_str(&encode(pagination_token));
                }
                url
            }
            Endpoint::BookDetails { asin } => format!(
                "{read}/service/mobile/reader/startReading?asin={}&clientVersion={READER_CLIENT_VERSION}",
                encode(asin)
            ),
            Endpoint::Metadata { url } => url.to_string(),
            Endpoint::Annotations {
                asin,
                ref_em_id,
                yj_format_version,
            } => format!(
                "{read}/service/mobile/reader/getAnnotations?asin={}&refEmId={}&yjFormatVersion={}",
                encode(asin),
                encode(ref_em_id),
                encode(yj_format_version)
            ),
            Endpoint::NotebookLibrary { token: None } => format!("{read}/notebook?library=list"),
            Endpoint::NotebookLibrary { token: Some(token) } => {
                format!("{read}/notebook?library=list&token={}", encode(token))
            }
            Endpoint::NotebookAnnotations { asin } => format!(
                "{read}/notebook?asin={}&contentLimitState=&",
                encode(asin)
            ),
        }
    }
}
