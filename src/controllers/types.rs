// Record types bound by the handlers
use crate::binder::JsonRecord;
use crate::spec::{ParamKind, RecordShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloData {
    pub username: String,
    pub age: i64,
}

impl JsonRecord for HelloData {
    fn shape() -> RecordShape {
        RecordShape::new()
            .field("username", ParamKind::String)
            .field("age", ParamKind::Integer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserParams {
    pub username: String,
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionalAgeParams {
    pub username: String,
    pub age: Option<i64>,
}
