use super::{reject, HandlerResponse, OptionalAgeParams, UserParams};
use crate::binder::Binder;
use crate::error::BindError;
use crate::request::RawRequest;
use crate::spec::{FieldSpec, ParamKind};
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::info;

static USER_FIELDS: Lazy<Vec<FieldSpec>> =
    Lazy::new(|| vec![FieldSpec::string("username"), FieldSpec::integer("age")]);

static REQUIRED_FIELDS: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        FieldSpec::string("username"),
        FieldSpec::integer("age").optional(),
    ]
});

static DEFAULT_FIELDS: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        FieldSpec::string("username").optional().with_default("guest"),
        FieldSpec::integer("age").optional().with_default("-1"),
    ]
});

/// Field list used by `request_param_v2` through `v4`.
pub fn user_fields() -> &'static [FieldSpec] {
    &USER_FIELDS
}

pub fn required_fields() -> &'static [FieldSpec] {
    &REQUIRED_FIELDS
}

pub fn default_fields() -> &'static [FieldSpec] {
    &DEFAULT_FIELDS
}

/// Reads `username` and `age` straight off the parameter map, no FieldSpec.
///
/// A missing `username` is logged as absent; `age` must be present and numeric.
pub fn request_param_v1(_binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    let params = raw.params();
    let username = params.first("username");
    let age = match params.first("age") {
        None => Err(BindError::MissingParameter {
            name: "age".to_string(),
        }),
        Some(v) => v.parse::<i64>().map_err(|_| BindError::TypeConversionError {
            name: "age".to_string(),
            value: v.to_string(),
            kind: ParamKind::Integer,
        }),
    };
    match age {
        Ok(age) => {
            info!(username = ?username, age, "request_param_v1");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_param_v1", e),
    }
}

fn bind_user(endpoint: &str, binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_parameters_as::<UserParams>(raw, user_fields()) {
        Ok(p) => {
            info!(username = %p.username, age = p.age, endpoint, "Parameters bound");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject(endpoint, e),
    }
}

pub fn request_param_v2(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    bind_user("request_param_v2", binder, raw)
}

pub fn request_param_v3(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    bind_user("request_param_v3", binder, raw)
}

pub fn request_param_v4(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    bind_user("request_param_v4", binder, raw)
}

/// `username=` binds as the empty string, which satisfies `required`.
pub fn request_param_required(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_parameters_as::<OptionalAgeParams>(raw, required_fields()) {
        Ok(p) => {
            info!(username = %p.username, age = ?p.age, "request_param_required");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_param_required", e),
    }
}

/// Defaults apply only to parameters that were not submitted at all.
pub fn request_param_default(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    match binder.bind_parameters_as::<UserParams>(raw, default_fields()) {
        Ok(p) => {
            info!(username = %p.username, age = p.age, "request_param_default");
            HandlerResponse::ok_text("ok")
        }
        Err(e) => reject("request_param_default", e),
    }
}

pub fn request_param_map(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    let params = binder.bind_single_values(raw);
    let username = params.get("username").and_then(Value::as_str);
    let age = params.get("age").and_then(Value::as_str);
    info!(username = ?username, age = ?age, "request_param_map");
    HandlerResponse::ok_text("ok")
}

pub fn request_param_multivaluemap(binder: &Binder, raw: &RawRequest) -> HandlerResponse {
    let params = binder.bind_all_parameters(raw);
    info!(params = ?params, "request_param_multivaluemap");
    HandlerResponse::ok_text("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_v1_missing_age() {
        let res = request_param_v1(&Binder::new(), &RawRequest::from_query("username=kim"));
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["kind"], "missing_parameter");
    }

    #[test]
    fn test_v1_tolerates_missing_username() {
        let res = request_param_v1(&Binder::new(), &RawRequest::from_query("age=3"));
        assert_eq!(res, HandlerResponse::ok_text("ok"));
    }

    #[test]
    fn test_map_handler_with_and_without_params() {
        let binder = Binder::new();
        let res = request_param_map(&binder, &RawRequest::from_query("username=kim&age=20"));
        assert_eq!(res, HandlerResponse::ok_text("ok"));
        let res = request_param_map(&binder, &RawRequest::default());
        assert_eq!(res, HandlerResponse::ok_text("ok"));
    }

    #[test]
    fn test_default_fields_shape() {
        assert!(default_fields().iter().all(|f| f.default.is_some()));
        assert_eq!(user_fields().len(), 2);
        assert!(!required_fields()[1].required);
    }
}
