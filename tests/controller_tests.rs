use http::StatusCode;
use reqbind::controllers::HandlerResponse;
use reqbind::registry::Registry;
use reqbind::{Binder, ContentKind, RawRequest};
use serde_json::json;

fn registry() -> Registry {
    Registry::with_builtin(Binder::new())
}

fn query(name: &str, qs: &str) -> HandlerResponse {
    registry().dispatch(name, &RawRequest::from_query(qs))
}

fn json_body(name: &str, body: &str) -> HandlerResponse {
    registry().dispatch(name, &RawRequest::from_body(ContentKind::Json, body))
}

fn assert_rejected(res: &HandlerResponse, kind: &str) {
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Invalid request data");
    assert_eq!(res.body["kind"], kind);
    assert!(res.body["message"].is_string());
}

#[test]
fn test_request_param_variants_accept_valid_input() {
    for name in [
        "request_param_v1",
        "request_param_v2",
        "request_param_v3",
        "request_param_v4",
        "request_param_required",
        "request_param_default",
        "request_param_map",
        "request_param_multivaluemap",
    ] {
        let res = query(name, "username=kim&age=20");
        assert_eq!(res, HandlerResponse::ok_text("ok"), "{name}");
    }
}

#[test]
fn test_request_param_v2_rejects_bad_age() {
    assert_rejected(&query("request_param_v2", "username=kim&age=abc"), "type_conversion_error");
    assert_rejected(&query("request_param_v2", "username=kim"), "missing_parameter");
}

#[test]
fn test_request_param_required() {
    assert_eq!(
        query("request_param_required", "username="),
        HandlerResponse::ok_text("ok")
    );
    assert_rejected(&query("request_param_required", "age=20"), "missing_parameter");
}

#[test]
fn test_request_param_default() {
    assert_eq!(query("request_param_default", ""), HandlerResponse::ok_text("ok"));
    assert_eq!(
        query("request_param_default", "username=&age=3"),
        HandlerResponse::ok_text("ok")
    );
    assert_rejected(&query("request_param_default", "age="), "type_conversion_error");
}

#[test]
fn test_map_handlers_accept_anything() {
    assert_eq!(query("request_param_map", ""), HandlerResponse::ok_text("ok"));
    assert_eq!(
        query("request_param_multivaluemap", "a=1&a=2&b="),
        HandlerResponse::ok_text("ok")
    );
}

#[test]
fn test_request_body_json_variants() {
    let body = r#"{"username":"kim","age":20}"#;
    for name in [
        "request_body_json_v1",
        "request_body_json_v2",
        "request_body_json_v3",
        "request_body_json_v4",
    ] {
        assert_eq!(json_body(name, body), HandlerResponse::ok_text("ok"), "{name}");
        assert_rejected(&json_body(name, "not-json"), "malformed_body");
        assert_rejected(&json_body(name, r#"{"username":"kim"}"#), "schema_mismatch");
    }
}

#[test]
fn test_request_body_json_v5_echoes() {
    let res = json_body("request_body_json_v5", r#"{"username":"kim","age":20,"extra":true}"#);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({"username": "kim", "age": 20}));
    assert_eq!(res.content_type(), "application/json");
}

#[test]
fn test_log_test() {
    assert_eq!(query("log_test", ""), HandlerResponse::ok_text("ok"));
}

#[test]
fn test_unknown_handler() {
    let res = query("nope", "");
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Handler not found");
}

#[test]
fn test_dispatch_from_http_request() {
    let req = http::Request::builder()
        .method("POST")
        .uri("/request-param-v2?username=kim")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(b"age=20".to_vec())
        .unwrap();
    let raw = RawRequest::from_http(&req);
    assert_eq!(raw.content_kind(), ContentKind::Form);
    assert_eq!(
        registry().dispatch("request_param_v2", &raw),
        HandlerResponse::ok_text("ok")
    );
}

#[test]
fn test_question_mark_inside_query_value() {
    let req = http::Request::builder()
        .uri("/request-param-v2?q=what?&username=kim&age=20")
        .body(Vec::new())
        .unwrap();
    let raw = RawRequest::from_http(&req);
    assert_eq!(raw.params().first("q"), Some("what?"));
    assert_eq!(
        registry().dispatch("request_param_v2", &raw),
        HandlerResponse::ok_text("ok")
    );
}
