//! Request and response types for the serve phase.
//!
//! No transport is implemented here: a `FabRequest` is whatever the
//! embedding server hands the dispatcher, and a `FabResponse` is handed
//! back for it to write out.

use crate::config::FabSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// An incoming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabRequest {
    /// Request method, uppercase.
    pub method: String,

    /// Full request URL.
    pub url: String,

    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Request body.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl FabRequest {
    /// A GET request for a URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }
}

/// A response produced by a responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabResponse {
    /// HTTP status code.
    pub status: u16,

    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response body.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl FabResponse {
    /// An empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self { status, headers: BTreeMap::new(), body: Vec::new() }
    }

    /// A 200 response with a body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, headers: BTreeMap::new(), body: body.into() }
    }

    /// A redirect response with a `Location` header.
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self::new(status).with_header("Location", location)
    }

    /// Add a header, replacing any existing value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The body as UTF-8 text, if it is valid.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Everything a responder sees for one request.
///
/// The URL is parsed once per dispatch; settings are the flat map selected
/// for the active environment.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The incoming request.
    pub request: FabRequest,

    /// Environment settings for this deployment.
    pub settings: FabSettings,

    /// The request URL, parsed.
    pub url: Url,
}

/// What a responder decided about a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponderOutcome {
    /// Handle the request with this response; later responders are not
    /// consulted.
    Respond(FabResponse),

    /// Decline; the next responder in the chain is tried.
    Decline,
}
