//! Error types for the civicscope library.
//!
//! Two layers exist:
//!
//! * [`CivicError`]: **Fatal** for the query that raised it: bad input,
//!   an upstream that answered with a failure status, a payload that is not
//!   what it claims to be. Returned as `Err(CivicError)` from
//!   [`crate::query::vote_query`] and [`crate::query::representative_query`].
//!
//! * [`ErrorPayload`]: the structured `{error, status, debug?}` body a
//!   consumer sees. Built from any `CivicError` via `From`, so every entry
//!   point can answer with JSON instead of unwinding.
//!
//! Non-fatal sub-path failures (a premier lookup that came back empty, say)
//! never become a `CivicError`; they are recorded in
//! [`crate::output::LookupResult::notes`].

use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the civicscope library.
#[derive(Debug, Error)]
pub enum CivicError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Caller input was rejected before any network call.
    #[error("Invalid request: {0}")]
    Validation(String),

    // ── Upstream errors ───────────────────────────────────────────────────
    /// A third-party endpoint answered with a non-success status.
    #[error("Upstream '{url}' returned HTTP {status}")]
    UpstreamUnavailable { url: String, status: u16 },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Request to '{url}' failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The transport gave up waiting.
    #[error("Request to '{url}' timed out after {secs}s\nIncrease --timeout.")]
    Timeout { url: String, secs: u64 },

    /// Body was received but could not be decoded as the expected JSON.
    #[error("Could not decode JSON from '{url}': {detail}")]
    InvalidJson { url: String, detail: String },

    /// The postal code is unknown to the primary index and the geocoding
    /// fallback could not place it either.
    #[error("No representatives found for postal code {postal}")]
    NotFound { postal: String, diagnostics: Value },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// Fetched bytes do not start with the `%PDF-` signature.
    #[error("Payload from '{url}' is not a PDF\nFirst bytes: {preview:?}")]
    NotAPdf { url: String, preview: String },

    /// pdfium could not open the document.
    #[error("PDF from '{url}' is corrupt: {detail}")]
    CorruptPdf { url: String, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium system-wide, or point --pdfium-lib\n\
(CIVICSCOPE_PDFIUM_LIB) at an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Override table file could not be read.
    #[error("Failed to read override table '{path}': {source}")]
    OverridesUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CivicError {
    /// HTTP-equivalent status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            CivicError::Validation(_) => 400,
            CivicError::NotFound { .. } => 404,
            CivicError::UpstreamUnavailable { .. }
            | CivicError::RequestFailed { .. }
            | CivicError::InvalidJson { .. }
            | CivicError::NotAPdf { .. }
            | CivicError::CorruptPdf { .. } => 502,
            CivicError::Timeout { .. } => 504,
            CivicError::PdfiumBindingFailed(_)
            | CivicError::InvalidConfig(_)
            | CivicError::OverridesUnreadable { .. }
            | CivicError::Internal(_) => 500,
        }
    }

    /// Diagnostic breadcrumbs worth surfacing next to the message.
    pub fn debug_detail(&self) -> Option<Value> {
        match self {
            CivicError::NotFound { diagnostics, .. } => Some(diagnostics.clone()),
            CivicError::UpstreamUnavailable { url, status } => {
                Some(json!({ "url": url, "upstream_status": status }))
            }
            CivicError::NotAPdf { url, preview } => {
                Some(json!({ "url": url, "preview": preview }))
            }
            CivicError::RequestFailed { url, .. }
            | CivicError::Timeout { url, .. }
            | CivicError::InvalidJson { url, .. }
            | CivicError::CorruptPdf { url, .. } => Some(json!({ "url": url })),
            _ => None,
        }
    }
}

/// Structured failure body returned to consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

impl From<&CivicError> for ErrorPayload {
    fn from(err: &CivicError) -> Self {
        ErrorPayload {
            error: err.to_string(),
            status: err.status_code(),
            debug: err.debug_detail(),
        }
    }
}

impl From<CivicError> for ErrorPayload {
    fn from(err: CivicError) -> Self {
        ErrorPayload::from(&err)
    }
}

/// Printable preview of the first bytes of a payload.
///
/// Non-printable bytes are escaped so the preview survives JSON and terminals.
pub fn byte_preview(bytes: &[u8], max: usize) -> String {
    bytes
        .iter()
        .take(max)
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect()
}
