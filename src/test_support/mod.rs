//! Shared helpers for unit tests that need a local HTTP server.
//!
//! The socket guard source is shared with the integration suite under `tests/support/`.

#[path = "../../tests/support/socket_guard.rs"]
pub mod socket_guard;
