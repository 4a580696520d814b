//! Canadian postal code validation and FSA-based province inference.

use crate::error::CivicError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Compact form (no space) of a valid postal code.
///
/// First letter never D, F, I, O, Q, U, W or Z; the other two letters never
/// D, F, I, O, Q or U.
static RE_POSTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ABCEGHJ-NPRSTVXY][0-9][ABCEGHJ-NPRSTV-Z][0-9][ABCEGHJ-NPRSTV-Z][0-9]$")
        .expect("postal pattern compiles")
});

/// A validated postal code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode {
    compact: String,
}

impl PostalCode {
    /// Validate and canonicalise caller input.
    pub fn parse(input: &str) -> Result<Self, CivicError> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if compact.is_empty() {
            return Err(CivicError::Validation("postal code is required".into()));
        }
        if compact.len() < 6 {
            return Err(CivicError::Validation(format!(
                "postal code '{}' is too short",
                input.trim()
            )));
        }
        if !RE_POSTAL.is_match(&compact) {
            return Err(CivicError::Validation(format!(
                "'{}' is not a valid Canadian postal code (expected A1A 1A1)",
                input.trim()
            )));
        }
        Ok(Self { compact })
    }

    /// `T5J2R7`, the form upstream URLs take.
    pub fn compact(&self) -> &str {
        &self.compact
    }

    /// `T5J 2R7`, the form shown to people.
    pub fn display(&self) -> String {
        format!("{} {}", &self.compact[..3], &self.compact[3..])
    }

    /// Forward Sortation Area (first three characters).
    pub fn fsa(&self) -> &str {
        &self.compact[..3]
    }

    /// Coarse province/territory code derived from the FSA.
    pub fn province(&self) -> &'static str {
        province_from_fsa(self.fsa())
    }
}

/// Canonical `A1A 1A1` form of caller input, or the validation error.
pub fn normalize_postal(input: &str) -> Result<String, CivicError> {
    PostalCode::parse(input).map(|p| p.display())
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Province code for an FSA. Unknown leading letters map to `""`.
pub fn province_from_fsa(fsa: &str) -> &'static str {
    let upper = fsa.to_ascii_uppercase();
    match upper.chars().next() {
        Some('A') => "NL",
        Some('B') => "NS",
        Some('C') => "PE",
        Some('E') => "NB",
        Some('G' | 'H' | 'J') => "QC",
        Some('K' | 'L' | 'M' | 'N' | 'P') => "ON",
        Some('R') => "MB",
        Some('S') => "SK",
        Some('T') => "AB",
        Some('V') => "BC",
        Some('X') if matches!(upper.get(..3), Some("X0A" | "X0B" | "X0C")) => "NU",
        Some('X') => "NT",
        Some('Y') => "YT",
        _ => "",
    }
}

/// Map a province name or code as upstream reports it to its two-letter code.
pub fn province_code(raw: &str) -> Option<&'static str> {
    let key = crate::text::norm_lower(raw);
    let code = match key.as_str() {
        "ab" | "alberta" => "AB",
        "bc" | "british columbia" => "BC",
        "mb" | "manitoba" => "MB",
        "nb" | "new brunswick" => "NB",
        "nl" | "newfoundland and labrador" | "newfoundland" => "NL",
        "ns" | "nova scotia" => "NS",
        "nt" | "northwest territories" => "NT",
        "nu" | "nunavut" => "NU",
        "on" | "ontario" => "ON",
        "pe" | "prince edward island" => "PE",
        "qc" | "quebec" | "québec" => "QC",
        "sk" | "saskatchewan" => "SK",
        "yt" | "yukon" => "YT",
        _ => return None,
    };
    Some(code)
}
