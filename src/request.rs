use http::header::CONTENT_TYPE;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::debug;

/// Values submitted under one parameter name, in submission order.
///
/// Nearly every parameter is submitted once, so one value is kept inline.
pub type ValueVec = SmallVec<[String; 1]>;

/// Ordered multi-valued parameter mapping.
///
/// Names keep the order of their first submission; repeated names
/// (`key=v1&key=v2`) collect their values in submission order. Lookups go
/// through a name index, so parsing stays linear in the number of pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, ValueVec)>,
    index: HashMap<String, usize>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value under `name`, after any values already present.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1.push(value),
            None => {
                let mut values = ValueVec::new();
                values.push(value);
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, values));
            }
        }
    }

    /// All values for `name`, or `None` if it was never submitted.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .and_then(|&pos| self.entries.get(pos))
            .map(|(_, v)| v.as_slice())
    }

    /// First submitted value for `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Last submitted value for `name`.
    #[must_use]
    pub fn last(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get_all(name).is_some()
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append every pair from a `application/x-www-form-urlencoded` string.
    pub fn extend_urlencoded(&mut self, input: &[u8]) {
        for (k, v) in url::form_urlencoded::parse(input) {
            self.append(k.into_owned(), v.into_owned());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.append(k, v);
        }
        map
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v.as_slice())?;
        }
        map.end()
    }
}

/// Declared kind of the request body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Text,
    #[default]
    None,
}

impl ContentKind {
    /// Classify a `Content-Type` header value. Media type parameters are ignored.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(ct) = content_type else {
            return ContentKind::None;
        };
        let mime = ct
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if mime.is_empty() {
            ContentKind::None
        } else if mime == "application/json" || mime.ends_with("+json") {
            ContentKind::Json
        } else if mime == "application/x-www-form-urlencoded" {
            ContentKind::Form
        } else {
            ContentKind::Text
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentKind::Json => "json",
            ContentKind::Form => "form",
            ContentKind::Text => "text",
            ContentKind::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// Decoded but unconverted request data.
///
/// Built once per request by the HTTP layer and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    params: ParamMap,
    body: Option<Vec<u8>>,
    content_kind: ContentKind,
}

impl RawRequest {
    pub fn new(params: ParamMap, body: Option<Vec<u8>>, content_kind: ContentKind) -> Self {
        RawRequest {
            params,
            body,
            content_kind,
        }
    }

    /// Request carrying only query parameters.
    pub fn from_query(query: &str) -> Self {
        Self::new(parse_query_string(query), None, ContentKind::None)
    }

    /// Request carrying the query of a full target, e.g. `/users?a=1`.
    pub fn from_path_and_query(target: &str) -> Self {
        Self::new(parse_path_and_query(target), None, ContentKind::None)
    }

    /// Request carrying only a body.
    pub fn from_body(content_kind: ContentKind, body: impl Into<Vec<u8>>) -> Self {
        Self::new(ParamMap::new(), Some(body.into()), content_kind)
    }

    /// Assemble a request from its decoded parts.
    ///
    /// Form-encoded bodies contribute parameters after the query string ones.
    /// The body bytes are kept either way.
    pub fn from_parts(query: Option<&str>, content_type: Option<&str>, body: Option<Vec<u8>>) -> Self {
        let mut params = query.map(parse_query_string).unwrap_or_default();
        let content_kind = ContentKind::from_content_type(content_type);
        if content_kind == ContentKind::Form {
            if let Some(bytes) = body.as_deref() {
                params.extend_urlencoded(bytes);
            }
        }
        debug!(
            param_count = params.len(),
            content_kind = %content_kind,
            body_size_bytes = body.as_ref().map(Vec::len).unwrap_or(0),
            "Raw request assembled"
        );
        Self::new(params, body, content_kind)
    }

    /// Extract query, content type and body from an [`http::Request`].
    pub fn from_http<B: AsRef<[u8]>>(req: &http::Request<B>) -> Self {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let body: &[u8] = req.body().as_ref();
        let body = (!body.is_empty()).then(|| body.to_vec());
        Self::from_parts(req.uri().query(), content_type, body)
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }
}

/// Decode a query string into a [`ParamMap`].
///
/// The input is the query component alone (`a=1&b=2`), optionally with a
/// leading `?`. Any later `?` is part of a value: `q=what?` binds `what?`.
pub fn parse_query_string(input: &str) -> ParamMap {
    let query = input.strip_prefix('?').unwrap_or(input);
    let mut params = ParamMap::new();
    params.extend_urlencoded(query.as_bytes());
    params
}

/// Decode the query of a request target such as `/users?a=1`.
///
/// Only the first `?` separates path from query; a target without one has no
/// parameters.
pub fn parse_path_and_query(target: &str) -> ParamMap {
    match target.split_once('?') {
        Some((_, query)) => parse_query_string(query),
        None => ParamMap::new(),
    }
}
