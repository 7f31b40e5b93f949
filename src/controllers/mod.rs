//! Endpoint handlers, one per binding strategy.
//!
//! Every handler has the same signature, takes the shared [`Binder`] and the
//! request's [`RawRequest`], and answers with a [`HandlerResponse`]. Binding
//! failures become a 400 carrying the error's problem body.
//!
//! | handler | what it binds |
//! |---|---|
//! | `request_param_v1` | parameters read by hand from the raw map |
//! | `request_param_v2`..`v4` | `username` and `age`, both required |
//! | `request_param_required` | `username` required, `age` optional |
//! | `request_param_default` | `username` defaults to `guest`, `age` to `-1` |
//! | `request_param_map` | every parameter, one value each |
//! | `request_param_multivaluemap` | every parameter, all values |
//! | `request_body_json_v1`, `v2` | body read as text, parsed afterwards |
//! | `request_body_json_v3`, `v4` | body bound straight to [`HelloData`] |
//! | `request_body_json_v5` | like v3, and echoes the record back |

mod log_test;
mod request_body_json;
mod request_param;
mod types;

pub use log_test::log_test;
pub use request_body_json::*;
pub use request_param::*;
pub use types::*;

use crate::binder::Binder;
use crate::error::BindError;
use crate::request::RawRequest;
use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

/// Signature shared by all handlers
pub type Handler = fn(&Binder, &RawRequest) -> HandlerResponse;

/// Status and body produced by a handler.
///
/// A string body is plain text; anything else is JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResponse {
    pub fn ok_text(text: impl Into<String>) -> Self {
        HandlerResponse {
            status: StatusCode::OK,
            body: Value::String(text.into()),
        }
    }

    pub fn ok_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => HandlerResponse {
                status: StatusCode::OK,
                body,
            },
            Err(e) => HandlerResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({
                    "error": "Failed to serialize response",
                    "message": e.to_string(),
                }),
            },
        }
    }

    pub fn bind_error(err: &BindError) -> Self {
        HandlerResponse {
            status: err.status(),
            body: err.to_problem(),
        }
    }

    pub fn not_found(name: &str) -> Self {
        HandlerResponse {
            status: StatusCode::NOT_FOUND,
            body: json!({
                "error": "Handler not found",
                "handler": name,
            }),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self.body {
            Value::String(_) => "text/plain",
            _ => "application/json",
        }
    }

    /// Body bytes as they would go on the wire.
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            Value::String(s) => s.clone().into_bytes(),
            other => other.to_string().into_bytes(),
        }
    }
}

/// Log a binding failure and turn it into a 400.
fn reject(endpoint: &str, err: BindError) -> HandlerResponse {
    warn!(endpoint, kind = err.kind(), error = %err, "Request binding failed");
    HandlerResponse::bind_error(&err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_follows_body() {
        assert_eq!(HandlerResponse::ok_text("ok").content_type(), "text/plain");
        assert_eq!(
            HandlerResponse::ok_json(&json!({"a": 1})).content_type(),
            "application/json"
        );
    }

    #[test]
    fn test_body_bytes() {
        assert_eq!(HandlerResponse::ok_text("ok").body_bytes(), b"ok".to_vec());
        assert_eq!(
            HandlerResponse::ok_json(&json!({"a": 1})).body_bytes(),
            br#"{"a":1}"#.to_vec()
        );
    }

    #[test]
    fn test_not_found() {
        let res = HandlerResponse::not_found("nope");
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body["handler"], "nope");
    }
}
