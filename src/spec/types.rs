use http::Method;
use serde::{Deserialize, Deserializer};

/// Primitive kind a parameter or body field converts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Float,
    Boolean,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Boolean => "boolean",
        };
        write!(f, "{}", s)
    }
}

fn default_required() -> bool {
    true
}

/// Declarative description of one expected request parameter.
///
/// Fields are required unless marked otherwise. A default is kept as text and
/// converted to `kind` at bind time, the same way a submitted value would be.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub default: Option<String>,
}

/// Catalog defaults may be written as strings, numbers or booleans; all are
/// kept as text and converted to the field's kind at bind time.
fn scalar_as_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Bool(bool),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

impl FieldSpec {
    /// Required field with no default.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            required: true,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when the parameter is not submitted at all.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// One field of a JSON record target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShapeField {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default = "default_required")]
    pub required: bool,
}

/// Ordered field list describing the record a JSON body binds to
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RecordShape {
    pub fields: Vec<ShapeField>,
}

impl RecordShape {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.fields.push(ShapeField {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    #[must_use]
    pub fn optional_field(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.fields.push(ShapeField {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }
}

/// How a request body is interpreted
///
/// Written in a catalog as `body: text` or as `body: { json: [fields...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "BodyDef")]
pub enum BodyShape {
    /// JSON document bound to a record
    Json(RecordShape),
    /// UTF-8 text, verbatim
    Text,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BodyDef {
    Keyword(BodyKeyword),
    Json { json: RecordShape },
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum BodyKeyword {
    Text,
}

impl From<BodyDef> for BodyShape {
    fn from(def: BodyDef) -> Self {
        match def {
            BodyDef::Keyword(BodyKeyword::Text) => BodyShape::Text,
            BodyDef::Json { json } => BodyShape::Json(json),
        }
    }
}

/// Everything needed to bind one endpoint's input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSpec {
    /// Query/form parameters, bound field by field in declared order
    Params(Vec<FieldSpec>),
    /// The whole body bound as one value
    Body(BodyShape),
}

/// Endpoint entry as written in a catalog document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointDef {
    pub name: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub params: Option<Vec<FieldSpec>>,
    #[serde(default)]
    pub body: Option<BodyShape>,
}

/// Top-level catalog document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogDoc {
    #[serde(default)]
    pub endpoints: Vec<EndpointDef>,
}

/// Validated endpoint with its binding
#[derive(Debug, Clone)]
pub struct EndpointMeta {
    pub name: String,
    pub method: Method,
    pub path: String,
    pub binding: BindingSpec,
}

/// Validated set of endpoints, in document order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub endpoints: Vec<EndpointMeta>,
}

impl Catalog {
    /// Look up an endpoint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EndpointMeta> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}
