//! Request body parsing
//!
//! JSON bodies carry two reserved control fields (`algo`, `routerConfig`)
//! that are stripped before forwarding; everything else is worker payload.
//! An empty body is valid and means "no payload", so parsing is modeled as
//! an explicit tri-state instead of treating the empty case as an error.

use crate::overrides::{OverrideFields, RouterOverrides};
use serde::Deserialize;

/// A JSON request body as received from the client.
#[derive(Debug, Default, Deserialize)]
pub struct ClientBody {
    /// Requested algorithm; unrecognized values are ignored downstream.
    #[serde(default)]
    pub algo: Option<String>,

    /// Router-level override configuration, never forwarded.
    #[serde(default, rename = "routerConfig")]
    pub router_config: Option<RouterOverrides>,

    /// Everything else: the worker payload.
    #[serde(flatten)]
    pub payload: OverrideFields,
}

/// Outcome of parsing a JSON request body.
#[derive(Debug)]
pub enum ParsedBody {
    /// No content; treated as an empty object.
    Empty,
    /// A well-formed JSON object.
    Parsed(ClientBody),
    /// Malformed JSON; a terminal client error.
    Invalid(serde_json::Error),
}

/// Parse a JSON request body into its tri-state outcome.
pub fn parse_json_body(bytes: &[u8]) -> ParsedBody {
    if bytes.iter().all(|byte| byte.is_ascii_whitespace()) {
        return ParsedBody::Empty;
    }
    match serde_json::from_slice::<ClientBody>(bytes) {
        Ok(body) => ParsedBody::Parsed(body),
        Err(error) => ParsedBody::Invalid(error),
    }
}
