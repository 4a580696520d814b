//! Static override table: roster slugs, premier fallbacks, reserved codes.
//!
//! The built-in table lives in `data/overrides.json` and is parsed once on
//! first use. A replacement table can be loaded from disk with
//! [`OverrideTable::from_path`]; the reconciliation code only ever reads it.

use crate::error::CivicError;
use crate::output::Representative;
use crate::representatives::reconcile::Bucket;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_JSON: &str = include_str!("../data/overrides.json");

static BUILTIN: Lazy<Arc<OverrideTable>> = Lazy::new(|| {
    Arc::new(OverrideTable::from_json(BUILTIN_JSON).expect("built-in override table is valid JSON"))
});

/// Head-of-government record for a province whose roster does not label it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremierOverride {
    pub province: String,
    pub representative: Representative,
}

/// A postal code answered entirely from the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservedCode {
    /// Compact form, e.g. `H0H0H0`.
    pub postal: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    pub bucket: Bucket,
    pub representative: Representative,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideTable {
    /// Roster slug of the federal chamber.
    #[serde(default)]
    pub federal_roster: Option<String>,
    /// Province code → legislature roster slug.
    #[serde(default)]
    pub legislatures: HashMap<String, String>,
    #[serde(default)]
    pub premiers: Vec<PremierOverride>,
    #[serde(default)]
    pub reserved: Vec<ReservedCode>,
}

impl OverrideTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Arc<OverrideTable> {
        Arc::clone(&BUILTIN)
    }

    pub fn from_json(raw: &str) -> Result<Self, CivicError> {
        serde_json::from_str(raw)
            .map_err(|e| CivicError::InvalidConfig(format!("override table: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self, CivicError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CivicError::OverridesUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn legislature_roster(&self, province: &str) -> Option<&str> {
        self.legislatures
            .get(&province.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn federal_roster(&self) -> Option<&str> {
        self.federal_roster.as_deref()
    }

    pub fn premier_for(&self, province: &str) -> Option<&Representative> {
        self.premiers
            .iter()
            .find(|p| p.province.eq_ignore_ascii_case(province))
            .map(|p| &p.representative)
    }

    pub fn reserved_for(&self, compact_postal: &str) -> Option<&ReservedCode> {
        self.reserved
            .iter()
            .find(|r| r.postal.replace(' ', "").eq_ignore_ascii_case(compact_postal))
    }
}
