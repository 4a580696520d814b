//! Result types returned by both query pipelines.
//!
//! Everything here is `Serialize` and constructed fresh per request; nothing
//! is persisted.

use serde::{Deserialize, Serialize};

// ── Vote pipeline ────────────────────────────────────────────────────────

/// Outcome for the target member in one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
    /// Matched in both lists or neither. Never surfaced to callers.
    Unknown,
}

/// One extracted voting event for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRecord {
    /// Bill/motion header found before the division, or `"Vote"`.
    pub title: String,
    /// Sitting date as printed near the top of the record.
    pub date: Option<String>,
    pub vote: Vote,
    /// `None` when no carried/defeated cue was found nearby.
    pub passed: Option<bool>,
    /// Source PDF, repeated on every record.
    pub official_url: String,
}

/// Who the vote query was about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRef {
    pub name: String,
    pub riding: Option<String>,
}

/// Breadcrumbs describing what the vote pipeline looked at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteDiagnostics {
    pub index_url: String,
    pub pdf_url: Option<String>,
    pub text_chars: usize,
    pub divisions_found: usize,
}

/// Response to a vote query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReport {
    pub jurisdiction: String,
    pub mla: MemberRef,
    pub items: Vec<VoteRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<VoteDiagnostics>,
}

// ── Representative pipeline ──────────────────────────────────────────────

/// A constituency or legislature office.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Office {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
}

/// Upstream-only extras; `roles` drives premier/prime-minister detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeExtra {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// An elected official, normalised regardless of upstream source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    pub name: String,
    pub elected_office: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offices: Vec<Office>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub extra: Option<RepresentativeExtra>,
}

impl Representative {
    /// De-duplication key: lowercased name + lowercased office title.
    pub fn identity(&self) -> (String, String) {
        (
            crate::text::norm_lower(&self.name),
            crate::text::norm_lower(&self.elected_office),
        )
    }

    pub fn roles(&self) -> &[String] {
        self.extra.as_ref().map(|e| e.roles.as_slice()).unwrap_or(&[])
    }
}

/// Which upstream path produced the raw representatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Direct postal-code index hit.
    Postcode,
    /// Geocoded to a point, then looked up by point.
    Point,
    /// Answered entirely from the override table.
    Override,
}

/// Response to a representative query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResult {
    pub postal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub source: MatchSource,
    pub municipal: Vec<Representative>,
    pub provincial: Vec<Representative>,
    pub federal: Vec<Representative>,
    /// Titles matching no keyword set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<Representative>,
    /// Degraded sub-paths (e.g. "premier not found").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}
