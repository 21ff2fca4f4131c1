//! Plain-data request and outcome types crossing the transport boundary.
//!
//! # Design
//! The shim builds a `TransportRequest` and consumes a `TransportOutcome`
//! without touching the network; all fields are owned so values can move
//! onto whatever task or thread the host runs the request on.

use crate::http::method::Method;
use std::collections::HashMap;

/// How the transport should decode the response body.
///
/// Derived once from the configured `responseType`: `"json"` requests
/// structured decoding, `"arraybuffer"` raw bytes, anything else text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Text,
    Json,
    Binary,
}

impl DecodeMode {
    pub fn from_response_type(response_type: &str) -> Self {
        match response_type {
            "json" => DecodeMode::Json,
            "arraybuffer" => DecodeMode::Binary,
            _ => DecodeMode::Text,
        }
    }
}

/// Outgoing request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Text(String),
    Bytes(Vec<u8>),
}

impl RequestBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Text(s) => s.as_bytes(),
            RequestBody::Bytes(b) => b,
        }
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::Text(s.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Text(s)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(b: Vec<u8>) -> Self {
        RequestBody::Bytes(b)
    }
}

/// An HTTP request described as plain data, handed to the host transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    /// Snapshot of the request headers at `send()` time, not a live view.
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
    pub decode: DecodeMode,
}

/// Decoded response body, shaped by the requested [`DecodeMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Successful completion: status code, response headers, decoded body.
#[derive(Debug, Clone)]
pub struct TransportSuccess {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: ResponseBody,
}

/// The single tagged outcome delivered per started request.
///
/// Failure carries only the host's error message; the request object maps it
/// to `status = 0` without touching `readyState`.
#[derive(Debug, Clone)]
pub enum TransportOutcome {
    Success(TransportSuccess),
    Failure { message: String },
}
