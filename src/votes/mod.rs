//! Vote pipeline: from a records index page to per-member vote records.
//!
//! ## Data Flow
//!
//! ```text
//! locate ──▶ (fetch) ──▶ extract ──▶ norm ──▶ parse
//! (HTML)       (PDF)     (pdfium)   (text)   (divisions)
//! ```
//!
//! 1. [`locate`]: pick the most recent Votes & Proceedings PDF link
//! 2. [`extract`]: check the `%PDF-` signature and flatten page text;
//!    pdfium runs under `spawn_blocking`
//! 3. [`parse`]: split division blocks and decide Yes/No per member,
//!    with title, date and outcome heuristics as separate pure functions
//!
//! The orchestration (network calls, caps, notes) lives in
//! [`crate::query::vote_query`].

pub mod extract;
pub mod locate;
pub mod parse;
