//! # civicscope
//!
//! Canadian civic lookups: recorded divisions from the Alberta Legislative
//! Assembly's Votes & Proceedings, and the elected representatives for a
//! postal code.
//!
//! ## Pipeline Overview
//!
//! ```text
//! vote_query(name, riding?)
//!  │
//!  ├─ 1. Locate   newest *_vp.pdf link on the records index page
//!  ├─ 2. Extract  pdfium page text (spawn_blocking)
//!  └─ 3. Parse    "For the motion:" / "Against the motion:" blocks
//!
//! representative_query(postal)
//!  │
//!  ├─ 1. Fetch     postcode index, else geocode → point lookup
//!  ├─ 2. Reconcile de-duplicate, bucket by office level
//!  ├─ 3. Inject    premier + prime minister from legislature rosters
//!  └─ 4. Override  premier fallbacks, reserved postal codes (applied last)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use civicscope::{representative_query, respond, LookupConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LookupConfig::default();
//!     let body = respond(representative_query("T5J 2R7", &config).await);
//!     println!("{body:#}");
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `civicscope` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! civicscope = { version = "0.1", default-features = false }
//! ```
//!
//! Text extraction needs a pdfium shared library at runtime. Set
//! [`LookupConfig::pdfium_lib_path`] or install libpdfium system-wide.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod overrides;
pub mod postal;
pub mod query;
pub mod representatives;
pub mod text;
pub mod votes;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LookupConfig, LookupConfigBuilder};
pub use error::{CivicError, ErrorPayload};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use output::{
    LookupResult, MatchSource, MemberRef, Office, Representative, Vote, VoteDiagnostics,
    VoteRecord, VoteReport,
};
pub use overrides::OverrideTable;
pub use postal::{normalize_postal, PostalCode};
pub use query::{representative_query, respond, vote_query, VoteRequest};
pub use representatives::reconcile::Bucket;
