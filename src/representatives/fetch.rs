//! Raw representative retrieval for a postal code.
//!
//! The postcode index answers most codes directly. A 404 there starts the
//! fallback chain: geocode the code to a point, then ask for the
//! representatives at that point. Any failure inside the chain becomes a
//! [`CivicError::NotFound`] carrying which step failed and which endpoints
//! were called.

use crate::config::LookupConfig;
use crate::error::CivicError;
use crate::http::{decode_json, Transport};
use crate::output::{MatchSource, Representative};
use crate::postal::PostalCode;
use crate::representatives::geocode::{coordinates_from_response, Coordinates};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Body of `GET /postcodes/{code}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostcodeResponse {
    #[serde(default, alias = "code")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub representatives_centroid: Vec<Representative>,
    #[serde(default)]
    pub representatives_concordance: Vec<Representative>,
}

/// Pagination block on list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next: Option<String>,
}

/// Body of any `{objects: [...]}` list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectsPage {
    #[serde(default)]
    pub objects: Vec<Representative>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Representatives as fetched, before reconciliation.
#[derive(Debug, Clone)]
pub struct RawRepresentatives {
    pub source: MatchSource,
    pub city: Option<String>,
    pub province: Option<String>,
    /// Centroid matches first, then concordance matches.
    pub representatives: Vec<Representative>,
}

/// Step of the fallback chain that gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackStep {
    Geocode,
    PointLookup,
}

impl FallbackStep {
    fn as_str(self) -> &'static str {
        match self {
            FallbackStep::Geocode => "geocode",
            FallbackStep::PointLookup => "point_lookup",
        }
    }
}

struct Breadcrumbs<'a> {
    postal: &'a PostalCode,
    postcode_url: &'a str,
    geocode_url: &'a str,
    point_url: Option<String>,
}

impl Breadcrumbs<'_> {
    fn fail(&self, step: FallbackStep, reason: impl Into<String>) -> CivicError {
        let reason = reason.into();
        warn!("Fallback for {} failed at {}: {}", self.postal, step.as_str(), reason);
        CivicError::NotFound {
            postal: self.postal.display(),
            diagnostics: json!({
                "step": step.as_str(),
                "postcode_url": self.postcode_url,
                "geocode_attempted": true,
                "geocode_url": self.geocode_url,
                "point_url": self.point_url,
                "reason": reason,
            }),
        }
    }
}

pub fn postcode_url(config: &LookupConfig, postal: &PostalCode) -> String {
    format!("{}/postcodes/{}/", config.represent_base(), postal.compact())
}

pub fn geocode_url(config: &LookupConfig, postal: &PostalCode) -> String {
    let sep = if config.geocoder_url.contains('?') { '&' } else { '?' };
    format!("{}{}q={}", config.geocoder_url, sep, postal.compact())
}

pub fn point_url(config: &LookupConfig, at: Coordinates) -> String {
    format!(
        "{}/representatives/?point={},{}",
        config.represent_base(),
        at.lat,
        at.lon
    )
}

/// Fetch raw representatives for `postal`, falling back to a point lookup.
pub async fn fetch_representatives(
    transport: &dyn Transport,
    config: &LookupConfig,
    postal: &PostalCode,
) -> Result<RawRepresentatives, CivicError> {
    let url = postcode_url(config, postal);
    let response = transport.get(&url).await?;

    if response.status == 404 {
        info!("{} not in postcode index, trying geocoder", postal);
        return fetch_by_point(transport, config, postal, &url).await;
    }
    if !response.is_success() {
        return Err(CivicError::UpstreamUnavailable {
            url,
            status: response.status,
        });
    }

    let body: PostcodeResponse = decode_json(&url, &response.body)?;
    debug!(
        "{}: {} centroid, {} concordance",
        postal,
        body.representatives_centroid.len(),
        body.representatives_concordance.len()
    );

    let mut representatives = body.representatives_centroid;
    representatives.extend(body.representatives_concordance);

    Ok(RawRepresentatives {
        source: MatchSource::Postcode,
        city: body.city.filter(|s| !s.trim().is_empty()),
        province: body.province.filter(|s| !s.trim().is_empty()),
        representatives,
    })
}

async fn fetch_by_point(
    transport: &dyn Transport,
    config: &LookupConfig,
    postal: &PostalCode,
    postcode_url: &str,
) -> Result<RawRepresentatives, CivicError> {
    let geo_url = geocode_url(config, postal);
    let mut crumbs = Breadcrumbs {
        postal,
        postcode_url,
        geocode_url: &geo_url,
        point_url: None,
    };

    // ── Step 1: geocode ──────────────────────────────────────────────────
    let response = transport
        .get(&geo_url)
        .await
        .map_err(|e| crumbs.fail(FallbackStep::Geocode, e.to_string()))?;
    if !response.is_success() {
        return Err(crumbs.fail(
            FallbackStep::Geocode,
            format!("geocoder returned HTTP {}", response.status),
        ));
    }
    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|e| crumbs.fail(FallbackStep::Geocode, format!("invalid JSON: {e}")))?;
    let (point, shape) = coordinates_from_response(&body)
        .map_err(|e| crumbs.fail(FallbackStep::Geocode, e.to_string()))?;
    debug!("{} geocoded to {:?} via {:?}", postal, point, shape);

    // ── Step 2: point lookup ─────────────────────────────────────────────
    let url = point_url(config, point);
    crumbs.point_url = Some(url.clone());

    let response = transport
        .get(&url)
        .await
        .map_err(|e| crumbs.fail(FallbackStep::PointLookup, e.to_string()))?;
    if !response.is_success() {
        return Err(crumbs.fail(
            FallbackStep::PointLookup,
            format!("point lookup returned HTTP {}", response.status),
        ));
    }
    let page: ObjectsPage = decode_json(&url, &response.body)
        .map_err(|e| crumbs.fail(FallbackStep::PointLookup, e.to_string()))?;
    if page.objects.is_empty() {
        return Err(crumbs.fail(FallbackStep::PointLookup, "no representatives at point"));
    }

    info!("{}: {} representatives by point", postal, page.objects.len());
    Ok(RawRepresentatives {
        source: MatchSource::Point,
        city: None,
        province: None,
        representatives: page.objects,
    })
}
