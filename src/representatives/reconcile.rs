//! De-duplication, office-level classification and role injection.
//!
//! ## Rules
//!
//! - Identity is `(lowercased name, lowercased office title)`; the first
//!   record seen under an identity wins.
//! - Classifiers run independently. Provincial and federal keywords are
//!   word-boundary matched so "MPP" never counts as "MP".
//! - A title matching no classifier lands in `unclassified`.
//! - Injection skips any bucket that already holds a same-named person, so
//!   applying it twice is a no-op.

use crate::output::{LookupResult, MatchSource, Representative};
use crate::text::norm_lower;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static RE_MUNICIPAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)mayor|council+or|alderm[ae]n|reeve").expect("valid municipal regex")
});

static RE_PROVINCIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:mla|mpp|mna|mha|premier)\b").expect("valid provincial regex")
});

static RE_FEDERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:mp|prime\s+minister)\b").expect("valid federal regex")
});

/// Level of government a representative belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Municipal,
    Provincial,
    Federal,
}

/// Drop later records whose identity was already seen.
pub fn dedupe(reps: Vec<Representative>) -> Vec<Representative> {
    let mut seen = HashSet::new();
    reps.into_iter()
        .filter(|rep| seen.insert(rep.identity()))
        .collect()
}

/// Every bucket whose keywords appear in `office`.
pub fn classify(office: &str) -> Vec<Bucket> {
    let mut buckets = Vec::with_capacity(1);
    if RE_MUNICIPAL.is_match(office) {
        buckets.push(Bucket::Municipal);
    }
    if RE_PROVINCIAL.is_match(office) {
        buckets.push(Bucket::Provincial);
    }
    if RE_FEDERAL.is_match(office) {
        buckets.push(Bucket::Federal);
    }
    buckets
}

/// Classified representatives, in first-seen order within each bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pub municipal: Vec<Representative>,
    pub provincial: Vec<Representative>,
    pub federal: Vec<Representative>,
    pub unclassified: Vec<Representative>,
}

impl Buckets {
    /// De-duplicate then classify.
    pub fn from_representatives(reps: Vec<Representative>) -> Self {
        let mut out = Buckets::default();
        for rep in dedupe(reps) {
            let targets = classify(&rep.elected_office);
            if targets.is_empty() {
                out.unclassified.push(rep);
                continue;
            }
            for bucket in targets {
                out.bucket_mut(bucket).push(rep.clone());
            }
        }
        out
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Representative] {
        match bucket {
            Bucket::Municipal => &self.municipal,
            Bucket::Provincial => &self.provincial,
            Bucket::Federal => &self.federal,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Representative> {
        match bucket {
            Bucket::Municipal => &mut self.municipal,
            Bucket::Provincial => &mut self.provincial,
            Bucket::Federal => &mut self.federal,
        }
    }

    /// Append `rep` unless someone with the same name already sits in
    /// `bucket`. Returns whether it was added.
    pub fn inject(&mut self, bucket: Bucket, rep: Representative) -> bool {
        let name = norm_lower(&rep.name);
        let target = self.bucket_mut(bucket);
        if target.iter().any(|existing| norm_lower(&existing.name) == name) {
            return false;
        }
        target.push(rep);
        true
    }

    /// Whether the provincial bucket already names a premier.
    pub fn has_premier(&self) -> bool {
        self.provincial
            .iter()
            .any(|rep| norm_lower(&rep.elected_office).starts_with("premier"))
    }

    /// Fill in a premier from the override table when upstream did not.
    pub fn apply_premier_override(&mut self, fallback: &Representative) -> bool {
        if self.has_premier() {
            return false;
        }
        self.inject(Bucket::Provincial, fallback.clone())
    }

    pub fn total(&self) -> usize {
        self.municipal.len() + self.provincial.len() + self.federal.len() + self.unclassified.len()
    }

    pub fn into_result(
        self,
        postal: String,
        city: Option<String>,
        province: Option<String>,
        source: MatchSource,
        notes: Vec<String>,
    ) -> LookupResult {
        LookupResult {
            postal,
            city,
            province,
            source,
            municipal: self.municipal,
            provincial: self.provincial,
            federal: self.federal,
            unclassified: self.unclassified,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(name: &str, office: &str) -> Representative {
        Representative {
            name: name.into(),
            elected_office: office.into(),
            ..Default::default()
        }
    }

    #[test]
    fn dedupe_collapses_identical_identity() {
        let input = vec![
            rep("Jane Doe", "MLA"),
            rep("Sam Roe", "MP"),
            rep("jane  doe", "mla"),
            rep("Jane Doe", "Premier"),
        ];
        let out = dedupe(input);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].name, "Jane Doe");
        assert_eq!(out[2].elected_office, "Premier");
    }

    #[test]
    fn dedupe_ignores_source_order() {
        let a = dedupe(vec![rep("A", "MP"), rep("B", "MLA"), rep("A", "MP")]);
        let b = dedupe(vec![rep("A", "MP"), rep("A", "MP"), rep("B", "MLA")]);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn mp_is_federal_only() {
        assert_eq!(classify("MP"), vec![Bucket::Federal]);
        assert_eq!(classify("MPP"), vec![Bucket::Provincial]);
        assert_eq!(classify("mpp"), vec![Bucket::Provincial]);
    }

    #[test]
    fn keyword_sets() {
        assert_eq!(classify("Mayor"), vec![Bucket::Municipal]);
        assert_eq!(classify("Deputy Mayor"), vec![Bucket::Municipal]);
        assert_eq!(classify("City Councillor"), vec![Bucket::Municipal]);
        assert_eq!(classify("Councilor"), vec![Bucket::Municipal]);
        assert_eq!(classify("Reeve"), vec![Bucket::Municipal]);
        assert_eq!(classify("MLA"), vec![Bucket::Provincial]);
        assert_eq!(classify("MNA"), vec![Bucket::Provincial]);
        assert_eq!(classify("MHA"), vec![Bucket::Provincial]);
        assert_eq!(classify("Premier"), vec![Bucket::Provincial]);
        assert_eq!(classify("Prime Minister"), vec![Bucket::Federal]);
        assert!(classify("Senator").is_empty());
    }

    #[test]
    fn unmatched_titles_are_kept_aside() {
        let b = Buckets::from_representatives(vec![rep("A", "MP"), rep("B", "Chair")]);
        assert_eq!(b.federal.len(), 1);
        assert!(b.provincial.is_empty());
        assert_eq!(b.unclassified[0].name, "B");
        assert_eq!(b.total(), 2);
    }

    #[test]
    fn injection_is_idempotent() {
        let mut b = Buckets::from_representatives(vec![rep("Jane Doe", "MLA")]);
        let premier = rep("Dan Smith", "Premier");
        assert!(b.inject(Bucket::Provincial, premier.clone()));
        assert!(!b.inject(Bucket::Provincial, premier));
        let premiers = b
            .provincial
            .iter()
            .filter(|r| r.elected_office == "Premier")
            .count();
        assert_eq!(premiers, 1);
    }

    #[test]
    fn injection_skips_same_name_under_other_office() {
        let mut b = Buckets::from_representatives(vec![rep("Dan Smith", "MLA")]);
        assert!(!b.inject(Bucket::Provincial, rep("Dan  Smith", "Premier")));
        assert_eq!(b.provincial.len(), 1);
    }

    #[test]
    fn premier_override_only_fills_gaps() {
        let fallback = rep("R.J. Simpson", "Premier");

        let mut empty = Buckets::default();
        assert!(empty.apply_premier_override(&fallback));
        assert!(!empty.apply_premier_override(&fallback));
        assert_eq!(empty.provincial.len(), 1);

        let mut labelled = Buckets::from_representatives(vec![rep("Other Person", "Premier")]);
        assert!(!labelled.apply_premier_override(&fallback));
        assert_eq!(labelled.provincial.len(), 1);
    }

    #[test]
    fn bucket_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Bucket::Provincial).unwrap(), "\"provincial\"");
    }
}
