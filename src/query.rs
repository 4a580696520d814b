//! The two query entry points and the JSON response boundary.
//!
//! Each call is self-contained: a transport is resolved from the config,
//! the pipeline runs, and nothing is kept between calls.

use crate::config::LookupConfig;
use crate::error::{CivicError, ErrorPayload};
use crate::http::{get_bytes, get_text, Transport};
use crate::output::{LookupResult, MatchSource, MemberRef, VoteDiagnostics, VoteReport};
use crate::postal::{province_code, PostalCode};
use crate::representatives::fetch::fetch_representatives;
use crate::representatives::reconcile::Buckets;
use crate::representatives::roster::{find_head_of_government, HeadOfGovernment};
use crate::text::norm;
use crate::votes::extract::extract_text;
use crate::votes::locate::{latest_vp_pdf, LocatorRules};
use crate::votes::parse::{parse_votes, surname};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Who to report votes for.
#[derive(Debug, Clone, Default)]
pub struct VoteRequest {
    pub name: String,
    /// Narrows matches to `Surname (Riding)` when set.
    pub riding: Option<String>,
}

impl VoteRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            riding: None,
        }
    }

    pub fn with_riding(mut self, riding: impl Into<String>) -> Self {
        self.riding = Some(riding.into());
        self
    }
}

/// Recorded divisions for one member in the latest Votes & Proceedings.
///
/// A missing PDF link or a parse with no matching divisions is not an
/// error: the report comes back with empty `items` and a `note`.
///
/// # Errors
/// - [`CivicError::Validation`] for an empty name, before any network call
/// - [`CivicError::UpstreamUnavailable`] if the index or PDF fetch fails
/// - [`CivicError::NotAPdf`] if the linked document is not a PDF
pub async fn vote_query(
    request: &VoteRequest,
    config: &LookupConfig,
) -> Result<VoteReport, CivicError> {
    let start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let name = norm(&request.name);
    if name.is_empty() {
        return Err(CivicError::Validation("name is required".into()));
    }
    let riding = request
        .riding
        .as_deref()
        .map(norm)
        .filter(|r| !r.is_empty());
    info!("Vote query for {} ({:?})", name, riding);

    let transport = config.resolve_transport()?;
    let mut report = VoteReport {
        jurisdiction: config.jurisdiction.clone(),
        mla: MemberRef {
            name: name.clone(),
            riding: riding.clone(),
        },
        items: Vec::new(),
        note: None,
        diagnostics: None,
    };
    let mut diagnostics = VoteDiagnostics {
        index_url: config.records_index_url.clone(),
        ..Default::default()
    };

    // ── Step 2: Locate the latest record ─────────────────────────────────
    let html = get_text(transport.as_ref(), &config.records_index_url).await?;
    let rules = LocatorRules {
        host: &config.records_host,
        domain: &config.records_domain,
        vp_marker: &config.vp_marker,
    };
    let Some(pdf_url) = latest_vp_pdf(&html, &rules) else {
        warn!("No Votes & Proceedings link on {}", config.records_index_url);
        report.note = Some("no Votes & Proceedings PDF found".into());
        report.diagnostics = Some(diagnostics);
        return Ok(report);
    };
    debug!("Latest record: {}", pdf_url);
    diagnostics.pdf_url = Some(pdf_url.clone());

    // ── Step 3: Fetch and extract ────────────────────────────────────────
    let bytes = get_bytes(transport.as_ref(), &pdf_url).await?;
    let text = extract_text(&pdf_url, bytes, config.pdfium_lib_path.as_deref()).await?;
    diagnostics.text_chars = text.chars().count();

    // ── Step 4: Parse ────────────────────────────────────────────────────
    let parsed = parse_votes(&text, &name, riding.as_deref(), &pdf_url);
    diagnostics.divisions_found = parsed.divisions_found;

    let mut items = parsed.records;
    let excess = items.len().saturating_sub(config.max_vote_items);
    items.drain(..excess);
    if items.is_empty() {
        let who = surname(&name).unwrap_or_else(|| name.clone());
        report.note = Some(format!("no recorded divisions matched {who}"));
    }

    info!(
        "{} vote records from {} divisions in {}ms",
        items.len(),
        diagnostics.divisions_found,
        start.elapsed().as_millis()
    );
    report.items = items;
    report.diagnostics = Some(diagnostics);
    Ok(report)
}

/// Municipal, provincial and federal representatives for a postal code.
///
/// Reserved codes in the override table still go upstream first; their
/// record is added last and never replaces a same-name upstream entry. If
/// the upstream lookup fails, the table alone answers.
///
/// # Errors
/// - [`CivicError::Validation`] for a malformed postal code
/// - [`CivicError::NotFound`] when the geocode fallback cannot place it
/// - [`CivicError::UpstreamUnavailable`] when the postcode index fails
pub async fn representative_query(
    postal: &str,
    config: &LookupConfig,
) -> Result<LookupResult, CivicError> {
    let start = Instant::now();

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let postal = PostalCode::parse(postal)?;
    info!("Representative query for {}", postal);

    // ── Step 2: Fetch ────────────────────────────────────────────────────
    let transport = config.resolve_transport()?;
    let reserved = config.overrides.reserved_for(postal.compact());
    let raw = match fetch_representatives(transport.as_ref(), config, &postal).await {
        Ok(raw) => raw,
        Err(e) => {
            let Some(reserved) = reserved else {
                return Err(e);
            };
            info!(
                "Upstream failed for reserved code {} ({}); answering from the override table",
                postal, e
            );
            let mut buckets = Buckets::default();
            buckets.inject(reserved.bucket, reserved.representative.clone());
            return Ok(buckets.into_result(
                postal.display(),
                reserved.city.clone(),
                reserved.province.clone(),
                MatchSource::Override,
                Vec::new(),
            ));
        }
    };

    let province = raw
        .province
        .as_deref()
        .and_then(province_code)
        .unwrap_or_else(|| postal.province());

    // ── Step 3: Reconcile ────────────────────────────────────────────────
    let mut buckets = Buckets::from_representatives(raw.representatives);
    debug!(
        "{} municipal, {} provincial, {} federal, {} unclassified",
        buckets.municipal.len(),
        buckets.provincial.len(),
        buckets.federal.len(),
        buckets.unclassified.len()
    );

    // ── Step 4: Heads of government ──────────────────────────────────────
    let mut notes = Vec::new();
    inject_heads_of_government(transport.as_ref(), config, province, &mut buckets, &mut notes)
        .await;

    // ── Step 5: Overrides ────────────────────────────────────────────────
    if let Some(fallback) = config.overrides.premier_for(province) {
        if buckets.apply_premier_override(fallback) {
            debug!("Applied premier override for {}", province);
            notes.retain(|n| n != "premier not found");
        }
    }
    if let Some(reserved) = reserved {
        if buckets.inject(reserved.bucket, reserved.representative.clone()) {
            debug!("Added reserved-code record for {}", postal);
        }
    }

    info!(
        "{}: {} representatives via {:?} in {}ms",
        postal,
        buckets.total(),
        raw.source,
        start.elapsed().as_millis()
    );
    Ok(buckets.into_result(
        postal.display(),
        raw.city,
        raw.province.or_else(|| Some(province.to_string())),
        raw.source,
        notes,
    ))
}

/// Look up premier and prime minister together; each failure becomes a note.
async fn inject_heads_of_government(
    transport: &dyn Transport,
    config: &LookupConfig,
    province: &str,
    buckets: &mut Buckets,
    notes: &mut Vec<String>,
) {
    let mut lookups = Vec::new();
    if let Some(slug) = config.overrides.legislature_roster(province) {
        lookups.push((HeadOfGovernment::Premier, slug));
    } else {
        notes.push("premier not found".into());
    }
    if let Some(slug) = config.overrides.federal_roster() {
        lookups.push((HeadOfGovernment::PrimeMinister, slug));
    } else {
        notes.push("prime minister not found".into());
    }

    let results = join_all(
        lookups
            .iter()
            .map(|(office, slug)| find_head_of_government(transport, config, slug, *office)),
    )
    .await;

    for ((office, slug), result) in lookups.into_iter().zip(results) {
        let label = office.title().to_lowercase();
        match result {
            Ok(Some(rep)) => {
                if !buckets.inject(office.bucket(), rep) {
                    debug!("{} already present; not injected", office.title());
                }
            }
            Ok(None) => {
                warn!("No {} in roster '{}'", label, slug);
                notes.push(format!("{label} not found"));
            }
            Err(e) => {
                warn!("Roster '{}' failed: {}", slug, e);
                notes.push(format!("{label} not found"));
            }
        }
    }
}

/// Convert any query result into the JSON payload handed to consumers.
pub fn respond<T: Serialize>(result: Result<T, CivicError>) -> Value {
    let payload = match result {
        Ok(value) => serde_json::to_value(value)
            .map_err(|e| CivicError::Internal(format!("result serialisation failed: {e}"))),
        Err(e) => Err(e),
    };
    match payload {
        Ok(value) => value,
        Err(e) => {
            warn!("Query failed: {}", e);
            serde_json::to_value(ErrorPayload::from(&e)).unwrap_or_else(|_| {
                serde_json::json!({ "error": e.to_string(), "status": e.status_code() })
            })
        }
    }
}
