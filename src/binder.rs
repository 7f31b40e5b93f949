//! # Request Binder
//!
//! Turns a [`RawRequest`] into typed values according to a [`BindingSpec`].
//!
//! ## Parameter binding
//!
//! Each [`FieldSpec`] is resolved in declared order:
//!
//! 1. Look the name up in the request's parameters.
//! 2. Not submitted: use the default if one is configured, otherwise fail with
//!    [`BindError::MissingParameter`] for required fields or resolve to
//!    [`BoundValue::Absent`] for optional ones.
//! 3. Submitted more than once: the first value wins, unless the binder was
//!    configured with [`RepeatedParamPolicy::Last`].
//! 4. Submitted as an empty string: that is a real value and beats the
//!    default. It stays `""` for string fields and fails conversion for the
//!    other kinds.
//! 5. Convert to the field's [`ParamKind`], failing with
//!    [`BindError::TypeConversionError`].
//!
//! The first failing field aborts the whole bind; no partial result is returned.
//!
//! ## Body binding
//!
//! - [`BodyShape::Json`] parses the body and checks it against a [`RecordShape`].
//! - [`BodyShape::Text`] returns the body as UTF-8 text, untouched.
//!
//! ## Example
//!
//! ```rust
//! use reqbind::binder::{Binder, BoundValue};
//! use reqbind::request::RawRequest;
//! use reqbind::spec::FieldSpec;
//!
//! let fields = vec![
//!     FieldSpec::string("username").with_default("guest"),
//!     FieldSpec::integer("age").with_default("-1"),
//! ];
//! let raw = RawRequest::from_query("username=&age=20");
//! let bound = Binder::new().bind_parameters(&raw, &fields).unwrap();
//! assert_eq!(bound.get("username"), Some(&BoundValue::Str(String::new())));
//! assert_eq!(bound.get("age"), Some(&BoundValue::Int(20)));
//! ```
//!
//! The binder holds only immutable configuration, so one value can be shared
//! by every handler on every thread.

use crate::error::BindError;
use crate::request::{ParamMap, RawRequest};
use crate::spec::{BindingSpec, BodyShape, FieldSpec, ParamKind, RecordShape};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Which value wins when a scalar parameter is submitted more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatedParamPolicy {
    /// `key=v1&key=v2` binds `v1`
    #[default]
    First,
    /// `key=v1&key=v2` binds `v2`
    Last,
}

impl RepeatedParamPolicy {
    /// `first` or `last`, any case. Anything else falls back to `First` with a warning.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "first" => RepeatedParamPolicy::First,
            "last" => RepeatedParamPolicy::Last,
            other => {
                warn!(
                    value = other,
                    "Unknown repeated-parameter policy, using 'first'"
                );
                RepeatedParamPolicy::First
            }
        }
    }
}

/// Binder settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinderConfig {
    pub repeated: RepeatedParamPolicy,
}

/// A converted parameter or body field
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Optional field with no submitted value and no default
    Absent,
}

impl BoundValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoundValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BoundValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BoundValue::Float(f) => Some(*f),
            BoundValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoundValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, BoundValue::Absent)
    }

    pub fn to_json(&self) -> Value {
        match self {
            BoundValue::Str(s) => Value::String(s.clone()),
            BoundValue::Int(i) => Value::from(*i),
            BoundValue::Float(f) => Value::from(*f),
            BoundValue::Bool(b) => Value::Bool(*b),
            BoundValue::Absent => Value::Null,
        }
    }
}

impl std::fmt::Display for BoundValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundValue::Str(s) => write!(f, "{}", s),
            BoundValue::Int(i) => write!(f, "{}", i),
            BoundValue::Float(x) => write!(f, "{}", x),
            BoundValue::Bool(b) => write!(f, "{}", b),
            BoundValue::Absent => write!(f, "null"),
        }
    }
}

impl Serialize for BoundValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoundValue::Str(s) => serializer.serialize_str(s),
            BoundValue::Int(i) => serializer.serialize_i64(*i),
            BoundValue::Float(f) => serializer.serialize_f64(*f),
            BoundValue::Bool(b) => serializer.serialize_bool(*b),
            BoundValue::Absent => serializer.serialize_none(),
        }
    }
}

/// Converted fields in declared order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: Vec<(String, BoundValue)>,
}

impl BoundParams {
    fn with_capacity(n: usize) -> Self {
        BoundParams {
            values: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, name: &str, value: BoundValue) {
        self.values.push((name.to_string(), value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values
            .iter()
            .find(|entry| entry.0 == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON object with one member per field; absent fields become `null`.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for BoundParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Result of binding a request body
#[derive(Debug, Clone, PartialEq)]
pub enum BoundBody {
    /// JSON record, fields in shape order
    Record(BoundParams),
    /// Verbatim UTF-8 text
    Text(String),
}

impl Serialize for BoundBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoundBody::Record(r) => r.serialize(serializer),
            BoundBody::Text(t) => serializer.serialize_str(t),
        }
    }
}

/// Result of binding against a whole [`BindingSpec`]
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Params(BoundParams),
    Body(BoundBody),
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::Params(p) => p.serialize(serializer),
            Bound::Body(b) => b.serialize(serializer),
        }
    }
}

/// A record type that can be bound from a JSON body.
///
/// The shape is checked before serde sees the document, so missing or
/// mistyped fields are reported by name.
pub trait JsonRecord: DeserializeOwned {
    fn shape() -> RecordShape;
}

/// Convert a raw parameter string to `kind`.
///
/// Integers are base-10 `i64`; floats must be finite; booleans are
/// `true`/`false` in any case. Returns `None` when the string does not convert.
pub fn convert_primitive(raw: &str, kind: ParamKind) -> Option<BoundValue> {
    match kind {
        ParamKind::String => Some(BoundValue::Str(raw.to_string())),
        ParamKind::Integer => raw.parse::<i64>().ok().map(BoundValue::Int),
        ParamKind::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(BoundValue::Float),
        ParamKind::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Some(BoundValue::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Some(BoundValue::Bool(false))
            } else {
                None
            }
        }
    }
}

fn json_kind_matches(value: &Value, kind: ParamKind) -> Option<BoundValue> {
    match kind {
        ParamKind::String => value.as_str().map(|s| BoundValue::Str(s.to_string())),
        ParamKind::Integer => value.as_i64().map(BoundValue::Int),
        ParamKind::Float => value.as_f64().map(BoundValue::Float),
        ParamKind::Boolean => value.as_bool().map(BoundValue::Bool),
    }
}

/// Stateless request binder
#[derive(Debug, Clone, Copy, Default)]
pub struct Binder {
    config: BinderConfig,
}

impl Binder {
    /// Binder with the default configuration (first value wins).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BinderConfig) -> Self {
        Binder { config }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind against either binding style.
    pub fn bind(&self, raw: &RawRequest, spec: &BindingSpec) -> Result<Bound, BindError> {
        match spec {
            BindingSpec::Params(fields) => self.bind_parameters(raw, fields).map(Bound::Params),
            BindingSpec::Body(shape) => self.bind_body(raw, shape).map(Bound::Body),
        }
    }

    /// Bind query/form parameters field by field.
    ///
    /// # Errors
    ///
    /// [`BindError::MissingParameter`] or [`BindError::TypeConversionError`]
    /// for the first field that fails.
    pub fn bind_parameters(
        &self,
        raw: &RawRequest,
        fields: &[FieldSpec],
    ) -> Result<BoundParams, BindError> {
        let mut bound = BoundParams::with_capacity(fields.len());
        for field in fields {
            let value = self.bind_field(raw.params(), field).inspect_err(|e| {
                debug!(field = %field.name, kind = e.kind(), "Parameter binding failed");
            })?;
            bound.push(&field.name, value);
        }
        info!(field_count = bound.len(), "Parameters bound");
        Ok(bound)
    }

    /// Bind parameters and deserialize the result into `T`.
    ///
    /// Absent optional fields arrive as `null`, so they map onto `Option` members.
    ///
    /// # Errors
    ///
    /// Everything [`Binder::bind_parameters`] reports. If the bound values do
    /// not fit `T` (the field list and the target type disagree), the result is
    /// [`BindError::SchemaMismatch`] with field `"$"` and the target type name;
    /// this is the only parameter-path use of that variant.
    pub fn bind_parameters_as<T: DeserializeOwned>(
        &self,
        raw: &RawRequest,
        fields: &[FieldSpec],
    ) -> Result<T, BindError> {
        let bound = self.bind_parameters(raw, fields)?;
        serde_json::from_value(bound.to_json()).map_err(|e| BindError::SchemaMismatch {
            field: "$".to_string(),
            expected: format!("{} ({})", std::any::type_name::<T>(), e),
        })
    }

    fn bind_field(&self, params: &ParamMap, field: &FieldSpec) -> Result<BoundValue, BindError> {
        let submitted = match self.config.repeated {
            RepeatedParamPolicy::First => params.first(&field.name),
            RepeatedParamPolicy::Last => params.last(&field.name),
        };

        let (raw_value, source) = match (submitted, field.default.as_deref()) {
            (Some(v), _) => (v, "submitted"),
            (None, Some(d)) => (d, "default"),
            (None, None) if field.required => {
                return Err(BindError::MissingParameter {
                    name: field.name.clone(),
                })
            }
            (None, None) => {
                debug!(field = %field.name, source = "absent", "Parameter bound");
                return Ok(BoundValue::Absent);
            }
        };

        let value = convert_primitive(raw_value, field.kind).ok_or_else(|| {
            BindError::TypeConversionError {
                name: field.name.clone(),
                value: raw_value.to_string(),
                kind: field.kind,
            }
        })?;
        debug!(field = %field.name, source, value = %value, "Parameter bound");
        Ok(value)
    }

    /// Every submitted parameter, unconverted, keeping repeated values.
    pub fn bind_all_parameters(&self, raw: &RawRequest) -> ParamMap {
        raw.params().clone()
    }

    /// Every submitted parameter with a single value each, chosen by the
    /// repeated-parameter policy.
    pub fn bind_single_values(&self, raw: &RawRequest) -> Map<String, Value> {
        raw.params()
            .iter()
            .filter_map(|(k, values)| {
                let v = match self.config.repeated {
                    RepeatedParamPolicy::First => values.first(),
                    RepeatedParamPolicy::Last => values.last(),
                }?;
                Some((k.to_string(), Value::String(v.clone())))
            })
            .collect()
    }

    /// Bind the request body as a whole.
    pub fn bind_body(&self, raw: &RawRequest, shape: &BodyShape) -> Result<BoundBody, BindError> {
        match shape {
            BodyShape::Json(record) => self.bind_json_record(raw, record).map(BoundBody::Record),
            BodyShape::Text => self.bind_text(raw).map(BoundBody::Text),
        }
    }

    /// The body as UTF-8 text. A missing body is the empty string.
    ///
    /// # Errors
    ///
    /// [`BindError::EncodingError`] if the bytes are not valid UTF-8.
    pub fn bind_text(&self, raw: &RawRequest) -> Result<String, BindError> {
        let bytes = raw.body().unwrap_or_default();
        let text = std::str::from_utf8(bytes).map_err(|e| BindError::EncodingError {
            reason: e.to_string(),
        })?;
        debug!(body_size_bytes = bytes.len(), "Body read as text");
        Ok(text.to_string())
    }

    /// Parse the body as JSON and check it against `shape`.
    ///
    /// # Errors
    ///
    /// [`BindError::MalformedBody`] for invalid JSON (an empty body included),
    /// [`BindError::SchemaMismatch`] for a non-object document or a missing or
    /// mistyped required field.
    pub fn bind_json_record(
        &self,
        raw: &RawRequest,
        shape: &RecordShape,
    ) -> Result<BoundParams, BindError> {
        let value = parse_json(raw)?;
        check_shape(&value, shape)
    }

    /// Parse the body into a typed record.
    pub fn bind_json<T: JsonRecord>(&self, raw: &RawRequest) -> Result<T, BindError> {
        decode_record(parse_json(raw)?)
    }
}

/// Parse already-read body text into a typed record.
///
/// Same checks as [`Binder::bind_json`], for handlers that read the body as
/// text first and convert it themselves.
pub fn record_from_str<T: JsonRecord>(text: &str) -> Result<T, BindError> {
    let value: Value = serde_json::from_str(text).map_err(|e| BindError::MalformedBody {
        reason: e.to_string(),
    })?;
    decode_record(value)
}

fn decode_record<T: JsonRecord>(value: Value) -> Result<T, BindError> {
    check_shape(&value, &T::shape())?;
    serde_json::from_value(value).map_err(|e| BindError::SchemaMismatch {
        field: "$".to_string(),
        expected: format!("{} ({})", std::any::type_name::<T>(), e),
    })
}

fn parse_json(raw: &RawRequest) -> Result<Value, BindError> {
    let bytes = raw.body().unwrap_or_default();
    let value: Value = serde_json::from_slice(bytes).map_err(|e| BindError::MalformedBody {
        reason: e.to_string(),
    })?;
    debug!(
        body_size_bytes = bytes.len(),
        body_fields = value.as_object().map(|o| o.len()),
        "JSON body parsed"
    );
    Ok(value)
}

fn check_shape(value: &Value, shape: &RecordShape) -> Result<BoundParams, BindError> {
    let obj = value.as_object().ok_or_else(|| BindError::SchemaMismatch {
        field: "$".to_string(),
        expected: "object".to_string(),
    })?;

    let mut bound = BoundParams::with_capacity(shape.fields.len());
    for field in &shape.fields {
        let mismatch = || BindError::SchemaMismatch {
            field: field.name.clone(),
            expected: field.kind.to_string(),
        };
        let value = match obj.get(&field.name) {
            None | Some(Value::Null) if field.required => return Err(mismatch()),
            None | Some(Value::Null) => BoundValue::Absent,
            Some(v) => json_kind_matches(v, field.kind).ok_or_else(mismatch)?,
        };
        bound.push(&field.name, value);
    }
    info!(field_count = bound.len(), "JSON body bound");
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ContentKind;

    #[test]
    fn test_convert_primitive() {
        assert_eq!(convert_primitive("-1", ParamKind::Integer), Some(BoundValue::Int(-1)));
        assert_eq!(convert_primitive("1.5", ParamKind::Float), Some(BoundValue::Float(1.5)));
        assert_eq!(convert_primitive("TRUE", ParamKind::Boolean), Some(BoundValue::Bool(true)));
        assert_eq!(convert_primitive("", ParamKind::Integer), None);
        assert_eq!(convert_primitive("NaN", ParamKind::Float), None);
        assert_eq!(convert_primitive("yes", ParamKind::Boolean), None);
        assert_eq!(
            convert_primitive("", ParamKind::String),
            Some(BoundValue::Str(String::new()))
        );
    }

    #[test]
    fn test_last_value_policy() {
        let binder = Binder::with_config(BinderConfig {
            repeated: RepeatedParamPolicy::Last,
        });
        let raw = RawRequest::from_query("age=1&age=2");
        let bound = binder
            .bind_parameters(&raw, &[FieldSpec::integer("age")])
            .unwrap();
        assert_eq!(bound.get("age"), Some(&BoundValue::Int(2)));
        assert_eq!(binder.bind_single_values(&raw)["age"], "2");
    }

    #[test]
    fn test_repeated_policy_parse() {
        assert_eq!(RepeatedParamPolicy::parse("LAST"), RepeatedParamPolicy::Last);
        assert_eq!(RepeatedParamPolicy::parse(" first "), RepeatedParamPolicy::First);
        assert_eq!(RepeatedParamPolicy::parse("lsat"), RepeatedParamPolicy::First);
    }

    #[test]
    fn test_bind_parameters_as_target_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct NeedsFlag {
            #[allow(dead_code)]
            flag: bool,
        }
        let raw = RawRequest::from_query("flag=yes");
        let err = Binder::new()
            .bind_parameters_as::<NeedsFlag>(&raw, &[FieldSpec::string("flag")])
            .unwrap_err();
        match err {
            BindError::SchemaMismatch { field, expected } => {
                assert_eq!(field, "$");
                assert!(expected.contains("NeedsFlag"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_default_reports_conversion_error() {
        let raw = RawRequest::default();
        let err = Binder::new()
            .bind_parameters(&raw, &[FieldSpec::integer("age").with_default("old")])
            .unwrap_err();
        assert_eq!(
            err,
            BindError::TypeConversionError {
                name: "age".to_string(),
                value: "old".to_string(),
                kind: ParamKind::Integer,
            }
        );
    }

    #[test]
    fn test_json_integer_rejects_fraction() {
        let raw = RawRequest::from_body(ContentKind::Json, r#"{"age": 20.5}"#);
        let shape = RecordShape::new().field("age", ParamKind::Integer);
        let err = Binder::new().bind_json_record(&raw, &shape).unwrap_err();
        assert_eq!(
            err,
            BindError::SchemaMismatch {
                field: "age".to_string(),
                expected: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_json_optional_null_is_absent() {
        let raw = RawRequest::from_body(ContentKind::Json, r#"{"username":"kim","age":null}"#);
        let shape = RecordShape::new()
            .field("username", ParamKind::String)
            .optional_field("age", ParamKind::Integer);
        let bound = Binder::new().bind_json_record(&raw, &shape).unwrap();
        assert!(bound.get("age").unwrap().is_absent());
    }

    #[test]
    fn test_json_top_level_must_be_object() {
        let raw = RawRequest::from_body(ContentKind::Json, "[1,2]");
        let err = Binder::new()
            .bind_json_record(&raw, &RecordShape::new())
            .unwrap_err();
        assert_eq!(
            err,
            BindError::SchemaMismatch {
                field: "$".to_string(),
                expected: "object".to_string(),
            }
        );
    }

    #[test]
    fn test_bound_params_serialize_in_declared_order() {
        let raw = RawRequest::from_query("b=2&a=x");
        let bound = Binder::new()
            .bind_parameters(
                &raw,
                &[
                    FieldSpec::string("a"),
                    FieldSpec::integer("b"),
                    FieldSpec::boolean("c").optional(),
                ],
            )
            .unwrap();
        assert_eq!(
            serde_json::to_string(&bound).unwrap(),
            r#"{"a":"x","b":2,"c":null}"#
        );
    }
}
