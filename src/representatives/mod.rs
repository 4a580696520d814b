//! Representative pipeline: postal code to classified, de-duplicated officials.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──(404)──▶ geocode ──▶ point lookup
//!   │                               │
//!   └───────────────┬───────────────┘
//!                   ▼
//!              reconcile ◀── roster (premier, prime minister)
//! ```
//!
//! 1. [`fetch`]: postcode index, with the geocode + point fallback
//! 2. [`geocode`]: try each known geocoder response shape for a point
//! 3. [`roster`]: paginated legislature rosters and role matching
//! 4. [`reconcile`]: de-duplicate, bucket, inject heads of government,
//!    apply overrides
//!
//! The orchestration lives in [`crate::query::representative_query`].

pub mod fetch;
pub mod geocode;
pub mod reconcile;
pub mod roster;
