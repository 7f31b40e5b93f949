use super::{reject, HandlerResponse, HelloData};
use crate::binder::{record_from_str, Binder};
use crate::error::BindError;
use crate::request::RawRequest;
use tracing::info;

fn read_then_parse(endpoint: &str, binder: &Binder, raw: &RawRequest) -> Result<HelloData, BindError> {
    let message_body = binder.bind_text(raw)?;
    info!(endpoint, message_body = %message_body, "Body read");
    record_from_str::<HelloData>(&message_body)
}

/// Reads the body as text and converts it in a second step.
pub fn request_body_json_v1(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match read_then_parse("request_body_json_v1", binder, raw) {
        Ok(data) => {
            info!(hello_data = ?data, "request_body_json_v1");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_body_json_v1", e),
    }
}

pub fn request_body_json_v2(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match read_then_parse("request_body_json_v2", binder, raw) {
        Ok(data) => {
            info!(hello_data = ?data, "request_body_json_v2");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_body_json_v2", e),
    }
}

/// Binds the body straight into [`HelloData`].
pub fn request_body_json_v3(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_json::<HelloData>(raw) {
        Ok(data) => {
            info!(hello_data = ?data, "request_body_json_v3");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_body_json_v3", e),
    }
}

pub fn request_body_json_v4(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_json::<HelloData>(raw) {
        Ok(data) => {
            info!(hello_data = ?data, "request_body_json_v4");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_body_json_v4", e),
    }
}

/// Binds [`HelloData`] and answers with it as JSON.
pub fn request_body_json_v5(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_json::<HelloData>(raw) {
        Ok(data) => {
            info!(hello_data = ?data, "request_body_json_v5");
            HandlerResponse::ok_json(&data)
        }
        Err(e) => reject("request_body_json_v5", e),
    }
}
