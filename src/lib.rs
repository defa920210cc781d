//! Kindle Notebook Client Library
//!
//! This library talks to the undocumented cloud reader backend that exposes a
//! user's library, book metadata and annotations through two surfaces: a JSON
//! service API and the HTML-rendered "notebook" page.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`endpoint`] - Request intent to URL mapping
//! - [`session`] - Hydrated session material, cookie file and session file loading
//! - [`transport`] - Response validation and bounded immediate retry
//! - [`json`] - JSON (and JSONP) body decoding
//! - [`html`] - Notebook page parsing
//! - [`pagination`] - Cursor and hidden-field page drivers
//! - [`client`] - The [`KindleClient`] facade
//!
//! # Example
//!
//! ```no_run
//! use kindle_notebook::{KindleClient, SessionContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionContext::new(
//!     [
//!         ("ubid-main", "131-0000000-0000000"),
//!         ("at-main", "Atza|..."),
//!         ("x-main", "..."),
//!         ("session-id", "139-0000000-0000000"),
//!     ],
//!     "device-session-token",
//! )?;
//! let client = KindleClient::new(session)?;
//! for book in client.fetch_library().await? {
//!     println!("{} by {}", book.title, book.author);
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod html;
pub mod json;
pub mod model;
pub mod pagination;
pub mod session;
#[cfg(test)]
pub mod test_support;
pub mod transport;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use client::KindleClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, EndpointBuilder, SIGN_IN_PATH};
pub use error::{HtmlFieldError, KindleError};
pub use model::{
    Annotation, AnnotationColor, AnnotationKind, BookDetails, BookMetadata, LastPageRead,
    LibraryBook, NotebookAnnotation, NotebookBook,
};
pub use session::{
    CookieError, CookieLine, ParseResult, REQUIRED_COOKIES, SessionContext, SessionError,
    load_cookie_file, load_session_file, parse_netscape_cookies,
};
pub use transport::{FailureType, RetryDecision, RetryPolicy, TransportGuard};
