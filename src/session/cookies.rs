//! Netscape cookie file parser.
//!
//! Browser cookie exporters write the Netscape HTTP cookie file format: 7
//! TAB-separated fields per line. Lines exported for `HttpOnly` cookies carry a
//! `#HttpOnly_` prefix on the domain and must not be treated as comments.

use std::fmt;
use std::io::BufRead;

use tracing::{debug, instrument, warn};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// A single parsed cookie from a Netscape-format cookie file.
///
/// The value is redacted in Debug output.
#[derive(Clone)]
pub struct CookieLine {
    /// The domain the cookie belongs to (e.g., `.amazon.com`).
    pub domain: String,
    /// Whether the line was exported with the `#HttpOnly_` marker.
    pub http_only: bool,
    /// The URL path scope for the cookie.
    pub path: String,
    /// Whether the cookie should only be sent over HTTPS.
    pub secure: bool,
    /// Unix timestamp for expiry (0 = session cookie).
    pub expires: u64,
    /// Cookie name.
    pub name: String,
    value: String,
}

impl CookieLine {
    /// Returns the cookie value. Sensitive: avoid logging.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true when the cookie applies to `host` (exact or parent-domain match).
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        host.eq_ignore_ascii_case(domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
    }
}

impl fmt::Debug for CookieLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieLine")
            .field("domain", &self.domain)
            .field("http_only", &self.http_only)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .field("expires", &self.expires)
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Errors that can occur while parsing a cookie file.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// A line in the cookie file has an invalid format.
    #[error("line {line_number}: {reason} (got: {content})")]
    InvalidLine {
        /// 1-based line number.
        line_number: usize,
        /// The offending line with its value redacted.
        content: String,
        /// What was wrong.
        reason: String,
    },

    /// I/O error reading the cookie file.
    #[error("failed to read cookie file: {0}")]
    Io(#[from] std::io::Error),

    /// No valid cookies found in a non-empty file.
    #[error("no valid cookies found in file ({malformed_count} lines failed to parse)")]
    NoCookiesFound {
        /// Number of malformed lines encountered.
        malformed_count: usize,
    },
}

/// Parsed cookies plus warnings for skipped lines.
#[derive(Debug)]
pub struct ParseResult {
    /// Successfully parsed cookies, in file order.
    pub cookies: Vec<CookieLine>,
    /// Malformed lines (line number and reason).
    pub warnings: Vec<(usize, String)>,
}

impl ParseResult {
    /// Keeps only cookies that apply to `host`.
    #[must_use]
    pub fn for_host(self, host: &str) -> Vec<CookieLine> {
        self.cookies
            .into_iter()
            .filter(|cookie| cookie.matches_host(host))
            .collect()
    }
}

/// Parses a Netscape-format cookie file.
///
/// # Errors
///
/// Returns [`CookieError::Io`] on read failure, or
/// [`CookieError::NoCookiesFound`] when a non-empty file yields zero valid
/// cookies. Individual malformed lines are collected as warnings.
#[instrument(level = "debug", skip(reader))]
pub fn parse_netscape_cookies(reader: impl BufRead) -> Result<ParseResult, CookieError> {
    let mut cookies = Vec::new();
    let mut warnings = Vec::new();
    let mut data_lines = 0;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line_result?;
        let line = line.trim_end();

        if line.is_empty() || (line.starts_with('#') && !line.starts_with(HTTP_ONLY_PREFIX)) {
            continue;
        }
        data_lines += 1;

        match parse_cookie_line(line, line_number) {
            Ok(cookie) => {
                debug!(line = line_number, domain = %cookie.domain, name = %cookie.name, "parsed cookie");
                cookies.push(cookie);
            }
            Err(e) => {
                warn!(line = line_number, reason = %e, "skipping malformed cookie line");
                warnings.push((line_number, e.to_string()));
            }
        }
    }

    if cookies.is_empty() && data_lines > 0 {
        return Err(CookieError::NoCookiesFound {
            malformed_count: warnings.len(),
        });
    }

    Ok(ParseResult { cookies, warnings })
}

fn parse_cookie_line(line: &str, line_number: usize) -> Result<CookieLine, CookieError> {
    let invalid = |reason: String| CookieError::InvalidLine {
        line_number,
        content: redact_value(line),
        reason,
    };

    let (http_only, body) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let fields: Vec<&str> = body.split('\t').collect();
    let [domain, _tailmatch, path, secure, expires, name, value] = fields[..] else {
        return Err(invalid(format!(
            "expected 7 TAB-separated fields, found {}",
            fields.len()
        )));
    };

    let secure = match secure {
        "TRUE" => true,
        "FALSE" => false,
        other => return Err(invalid(format!("secure field must be TRUE or FALSE, got '{other}'"))),
    };
    let expires = expires.parse::<u64>().map_err(|_| {
        invalid(format!(
            "expires field must be a non-negative integer, got '{expires}'"
        ))
    })?;
    if domain.is_empty() {
        return Err(invalid("domain field is empty".to_string()));
    }
    if name.is_empty() {
        return Err(invalid("cookie name field is empty".to_string()));
    }

    Ok(CookieLine {
        domain: domain.to_string(),
        http_only,
        path: path.to_string(),
        secure,
        expires,
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn redact_value(line: &str) -> String {
    match line.rsplit_once('\t') {
        Some((head, _)) if line.matches('\t').count() >= 6 => format!("{head}\t[REDACTED]"),
        _ => line.to_string(),
    }
}
