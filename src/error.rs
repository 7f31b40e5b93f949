use crate::spec::ParamKind;
use http::StatusCode;
use serde_json::{json, Value};
use std::fmt;

/// Binding failure
///
/// Returned by every [`Binder`](crate::binder::Binder) operation that can fail.
/// Binding is fail-fast: the first failing field is the one reported, and no
/// partially bound value ever accompanies an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    /// A required parameter was not submitted and has no default
    MissingParameter {
        /// Parameter name
        name: String,
    },
    /// A submitted (or default) value could not be converted to the declared kind
    TypeConversionError {
        /// Parameter name
        name: String,
        /// The raw string that failed to convert
        value: String,
        /// The kind it was supposed to convert to
        kind: ParamKind,
    },
    /// The body is not valid for its content kind (e.g. invalid JSON)
    MalformedBody {
        /// Parser diagnostic
        reason: String,
    },
    /// The body parsed but a required field is absent or has the wrong JSON type
    ///
    /// `field` is `"$"` when the top-level value itself has the wrong shape.
    SchemaMismatch {
        /// Offending field
        field: String,
        /// Expected JSON kind for that field
        expected: String,
    },
    /// The body bytes are not valid UTF-8
    EncodingError {
        /// Decoder diagnostic
        reason: String,
    },
}

impl BindError {
    /// Stable snake_case tag for the variant, used in problem bodies and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            BindError::MissingParameter { .. } => "missing_parameter",
            BindError::TypeConversionError { .. } => "type_conversion_error",
            BindError::MalformedBody { .. } => "malformed_body",
            BindError::SchemaMismatch { .. } => "schema_mismatch",
            BindError::EncodingError { .. } => "encoding_error",
        }
    }

    /// HTTP status a caller should answer with. Every binding failure is a client error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// JSON body describing the failure.
    #[must_use]
    pub fn to_problem(&self) -> Value {
        json!({
            "error": "Invalid request data",
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::MissingParameter { name } => {
                write!(f, "Required parameter '{}' is not present", name)
            }
            BindError::TypeConversionError { name, value, kind } => {
                write!(
                    f,
                    "Failed to convert value '{}' of parameter '{}' to {}",
                    value, name, kind
                )
            }
            BindError::MalformedBody { reason } => {
                write!(f, "Malformed request body: {}", reason)
            }
            BindError::SchemaMismatch { field, expected } => {
                write!(
                    f,
                    "Request body field '{}' is missing or not of type {}",
                    field, expected
                )
            }
            BindError::EncodingError { reason } => {
                write!(f, "Request body is not valid UTF-8: {}", reason)
            }
        }
    }
}

impl std::error::Error for BindError {}
