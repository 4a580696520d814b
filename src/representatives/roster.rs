//! Legislature rosters and head-of-government detection.
//!
//! Rosters are paginated through `meta.next`. The loop is bounded by
//! `max_roster_pages` and stops on a repeated page URL, so a cyclic or
//! endless `next` pointer still terminates.

use crate::config::LookupConfig;
use crate::error::CivicError;
use crate::http::{get_json, Transport};
use crate::output::Representative;
use crate::representatives::fetch::ObjectsPage;
use crate::representatives::reconcile::Bucket;
use crate::text::norm_lower;
use reqwest::Url;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Staff and deputy titles that would otherwise look like the top job.
/// Checked before the allow-list.
const ROLE_DENY: &[&str] = &[
    "parliamentary secretary",
    "parliamentary assistant",
    "chief of staff",
    "deputy premier",
    "deputy prime minister",
    "associate minister",
    "executive assistant",
    "press secretary",
    "principal secretary",
    "premier's",
    "prime minister's",
    "office of the",
];

/// A head-of-government role injected into the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadOfGovernment {
    Premier,
    PrimeMinister,
}

impl HeadOfGovernment {
    /// Office title given to the injected record.
    pub fn title(self) -> &'static str {
        match self {
            HeadOfGovernment::Premier => "Premier",
            HeadOfGovernment::PrimeMinister => "Prime Minister",
        }
    }

    pub fn bucket(self) -> Bucket {
        match self {
            HeadOfGovernment::Premier => Bucket::Provincial,
            HeadOfGovernment::PrimeMinister => Bucket::Federal,
        }
    }

    fn role_prefix(self) -> &'static str {
        match self {
            HeadOfGovernment::Premier => "premier",
            HeadOfGovernment::PrimeMinister => "prime minister",
        }
    }

    /// Deny-list first, then "starts with the office name".
    pub fn matches_role(self, role: &str) -> bool {
        let role = norm_lower(role);
        if ROLE_DENY.iter().any(|deny| role.contains(deny)) {
            return false;
        }
        role.starts_with(self.role_prefix())
    }
}

/// First roster member holding `office`, relabelled with its title.
pub fn find_officeholder(
    roster: &[Representative],
    office: HeadOfGovernment,
) -> Option<Representative> {
    roster
        .iter()
        .find(|rep| rep.roles().iter().any(|role| office.matches_role(role)))
        .map(|rep| Representative {
            elected_office: office.title().to_string(),
            ..rep.clone()
        })
}

fn roster_url(config: &LookupConfig, slug: &str) -> String {
    format!(
        "{}/representatives/{}/?limit={}",
        config.represent_base(),
        slug,
        config.roster_page_size
    )
}

/// Resolve a `meta.next` pointer, which is usually root-relative.
fn next_url(config: &LookupConfig, next: &str) -> Option<String> {
    let base = Url::parse(&format!("{}/", config.represent_base())).ok()?;
    base.join(next.trim()).ok().map(String::from)
}

/// Every member of the roster `slug`, across pages.
pub async fn fetch_roster(
    transport: &dyn Transport,
    config: &LookupConfig,
    slug: &str,
) -> Result<Vec<Representative>, CivicError> {
    let mut members = Vec::new();
    let mut seen = HashSet::new();
    let mut url = Some(roster_url(config, slug));

    for page in 0..config.max_roster_pages {
        let Some(current) = url.take() else { break };
        if !seen.insert(current.clone()) {
            warn!("Roster '{}' pagination revisits {}; stopping", slug, current);
            break;
        }

        let body: ObjectsPage = get_json(transport, &current).await?;
        debug!("Roster '{}' page {}: {} members", slug, page + 1, body.objects.len());
        members.extend(body.objects);

        url = body
            .meta
            .and_then(|m| m.next)
            .filter(|n| !n.trim().is_empty())
            .and_then(|n| {
                let resolved = next_url(config, &n);
                if resolved.is_none() {
                    warn!("Roster '{}' has an unresolvable next pointer {:?}", slug, n);
                }
                resolved
            });
    }

    if url.is_some() {
        warn!(
            "Roster '{}' still had pages after {} requests; truncated",
            slug, config.max_roster_pages
        );
    }
    Ok(members)
}

/// Look up who holds `office` in the roster `slug`.
pub async fn find_head_of_government(
    transport: &dyn Transport,
    config: &LookupConfig,
    slug: &str,
    office: HeadOfGovernment,
) -> Result<Option<Representative>, CivicError> {
    let roster = fetch_roster(transport, config, slug).await?;
    Ok(find_officeholder(&roster, office))
}
