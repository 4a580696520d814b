//! Configuration for both query pipelines.
//!
//! Every upstream endpoint, timeout and limit is a field on [`LookupConfig`],
//! built via [`LookupConfigBuilder`]. The defaults point at the public
//! services the pipelines were written against.

use crate::error::CivicError;
use crate::http::{ReqwestTransport, Transport};
use crate::overrides::OverrideTable;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_REPRESENT_URL: &str = "https://represent.opennorth.ca";
pub const DEFAULT_GEOCODER_URL: &str = "https://geogratis.gc.ca/services/geolocation/en/locate";
pub const DEFAULT_RECORDS_INDEX_URL: &str =
    "https://www.assembly.ab.ca/assembly-business/assembly-records/votes-and-proceedings";
pub const DEFAULT_RECORDS_HOST: &str = "https://www.assembly.ab.ca";

/// Configuration shared by the vote and representative queries.
///
/// # Example
/// ```rust
/// use civicscope::LookupConfig;
///
/// let config = LookupConfig::builder()
///     .request_timeout_secs(10)
///     .max_vote_items(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_vote_items, 5);
/// ```
#[derive(Clone)]
pub struct LookupConfig {
    /// Base URL of the Represent API. Default: `https://represent.opennorth.ca`.
    pub represent_base_url: String,

    /// Geocoder queried with `?q=<postal>` when the postcode index misses.
    pub geocoder_url: String,

    /// HTML page listing the Votes & Proceedings PDFs.
    pub records_index_url: String,

    /// Scheme + host used to absolutise root-relative and relative links.
    pub records_host: String,

    /// Host fragment a PDF link must contain to count as an official record.
    pub records_domain: String,

    /// Path fragment marking a Votes & Proceedings document.
    pub vp_marker: String,

    /// Jurisdiction name echoed in vote reports. Default: `Alberta`.
    pub jurisdiction: String,

    /// Per-request transport timeout in seconds. Default: 30.
    pub request_timeout_secs: u64,

    /// `User-Agent` header for upstream calls.
    pub user_agent: String,

    /// Path to a libpdfium shared library, or a directory holding one.
    /// `None` binds the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Hard ceiling on roster pages followed via `meta.next`. Default: 20.
    pub max_roster_pages: usize,

    /// `limit` requested per roster page. Default: 100.
    pub roster_page_size: usize,

    /// Most recent vote records kept per report. Default: 10.
    pub max_vote_items: usize,

    /// Pre-built transport. Takes precedence over the reqwest default.
    pub transport: Option<Arc<dyn Transport>>,

    /// Roster slugs, premier fallbacks and reserved postal codes.
    pub overrides: Arc<OverrideTable>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            represent_base_url: DEFAULT_REPRESENT_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            records_index_url: DEFAULT_RECORDS_INDEX_URL.to_string(),
            records_host: DEFAULT_RECORDS_HOST.to_string(),
            records_domain: "assembly.ab.ca".to_string(),
            vp_marker: "/vp/".to_string(),
            jurisdiction: "Alberta".to_string(),
            request_timeout_secs: 30,
            user_agent: concat!("civicscope/", env!("CARGO_PKG_VERSION")).to_string(),
            pdfium_lib_path: None,
            max_roster_pages: 20,
            roster_page_size: 100,
            max_vote_items: 10,
            transport: None,
            overrides: OverrideTable::builtin(),
        }
    }
}

impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("represent_base_url", &self.represent_base_url)
            .field("geocoder_url", &self.geocoder_url)
            .field("records_index_url", &self.records_index_url)
            .field("records_host", &self.records_host)
            .field("records_domain", &self.records_domain)
            .field("vp_marker", &self.vp_marker)
            .field("jurisdiction", &self.jurisdiction)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("max_roster_pages", &self.max_roster_pages)
            .field("roster_page_size", &self.roster_page_size)
            .field("max_vote_items", &self.max_vote_items)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .finish()
    }
}

impl LookupConfig {
    /// Create a new builder for `LookupConfig`.
    pub fn builder() -> LookupConfigBuilder {
        LookupConfigBuilder {
            config: Self::default(),
        }
    }

    /// The injected transport, or a fresh reqwest-backed one.
    pub fn resolve_transport(&self) -> Result<Arc<dyn Transport>, CivicError> {
        match &self.transport {
            Some(t) => Ok(Arc::clone(t)),
            None => Ok(Arc::new(ReqwestTransport::new(
                self.request_timeout_secs,
                &self.user_agent,
            )?)),
        }
    }

    /// Represent base URL without a trailing slash.
    pub(crate) fn represent_base(&self) -> &str {
        self.represent_base_url.trim_end_matches('/')
    }
}

/// Builder for [`LookupConfig`].
#[derive(Debug)]
pub struct LookupConfigBuilder {
    config: LookupConfig,
}

impl LookupConfigBuilder {
    pub fn represent_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.represent_base_url = url.into();
        self
    }

    pub fn geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.config.geocoder_url = url.into();
        self
    }

    pub fn records_index_url(mut self, url: impl Into<String>) -> Self {
        self.config.records_index_url = url.into();
        self
    }

    pub fn records_host(mut self, host: impl Into<String>) -> Self {
        self.config.records_host = host.into();
        self
    }

    pub fn records_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.records_domain = domain.into();
        self
    }

    pub fn vp_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.vp_marker = marker.into();
        self
    }

    pub fn jurisdiction(mut self, name: impl Into<String>) -> Self {
        self.config.jurisdiction = name.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn max_roster_pages(mut self, n: usize) -> Self {
        self.config.max_roster_pages = n.max(1);
        self
    }

    pub fn roster_page_size(mut self, n: usize) -> Self {
        self.config.roster_page_size = n.clamp(1, 1000);
        self
    }

    pub fn max_vote_items(mut self, n: usize) -> Self {
        self.config.max_vote_items = n;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn overrides(mut self, table: OverrideTable) -> Self {
        self.config.overrides = Arc::new(table);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<LookupConfig, CivicError> {
        let c = &self.config;
        for (field, url) in [
            ("represent_base_url", &c.represent_base_url),
            ("geocoder_url", &c.geocoder_url),
            ("records_index_url", &c.records_index_url),
            ("records_host", &c.records_host),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CivicError::InvalidConfig(format!(
                    "{field} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if c.records_domain.trim().is_empty() {
            return Err(CivicError::InvalidConfig(
                "records_domain must not be empty".into(),
            ));
        }
        if c.max_vote_items == 0 {
            return Err(CivicError::InvalidConfig(
                "max_vote_items must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
