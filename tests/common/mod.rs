//! Shared fixtures for the integration tests: a canned-response transport
//! and a config pointed at fake hosts.

#![allow(dead_code)]

use async_trait::async_trait;
use civicscope::{CivicError, HttpResponse, LookupConfig, Transport};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const REPRESENT: &str = "http://rep.test";
pub const GEOCODER: &str = "http://geo.test/locate";
pub const RECORDS_INDEX: &str = "http://records.test/votes-and-proceedings";

/// Serves fixed bodies by exact URL; anything else is a connection failure.
#[derive(Default)]
pub struct CannedTransport {
    routes: HashMap<String, HttpResponse>,
    calls: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn json(self, url: &str, body: serde_json::Value) -> Self {
        self.route(url, 200, body.to_string())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, url: &str) -> bool {
        self.calls().iter().any(|c| c == url)
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, CivicError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .ok_or_else(|| CivicError::RequestFailed {
                url: url.to_string(),
                reason: "no canned response".into(),
            })
    }
}

pub fn config_with(transport: Arc<CannedTransport>) -> LookupConfig {
    LookupConfig::builder()
        .represent_base_url(REPRESENT)
        .geocoder_url(GEOCODER)
        .records_index_url(RECORDS_INDEX)
        .transport(transport)
        .build()
        .unwrap()
}
