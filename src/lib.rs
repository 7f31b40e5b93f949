//! # reqbind
//!
//! **reqbind** binds decoded HTTP request data (query and form parameters,
//! raw bodies, JSON payloads) to typed values, following a declarative
//! binding specification instead of reflection.
//!
//! ## Overview
//!
//! The HTTP server, routing and response writing belong to the caller. This
//! crate starts where they hand over: a [`RawRequest`] holding the decoded but
//! unconverted request data, and a [`BindingSpec`] describing what the
//! endpoint expects.
//!
//! ## Architecture
//!
//! - **[`request`]** - `RawRequest`, the ordered multi-valued `ParamMap`, content kinds
//! - **[`spec`]** - `FieldSpec`, `RecordShape`, `BindingSpec` and the endpoint catalog
//! - **[`binder`]** - the stateless [`Binder`]: parameter, map and body binding
//! - **[`error`]** - the [`BindError`] taxonomy
//! - **[`validator`]** - catalog checks run at load time
//! - **[`controllers`]** / **[`registry`]** - one handler per binding strategy, dispatched by name
//! - **[`cli`]** - the `reqbind` command-line tool
//! - **[`logging`]** / **[`config`]** - tracing setup and environment configuration
//!
//! ### Binding Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Http as HTTP layer
//!     participant Raw as RawRequest
//!     participant Binder
//!     participant Handler
//!
//!     Http->>Raw: RawRequest::from_parts(query, content-type, body)
//!     Http->>Handler: registry.dispatch(name, &raw)
//!     Handler->>Binder: bind_parameters(&raw, &fields)
//!
//!     alt Missing / unconvertible value
//!         Binder-->>Handler: Err(BindError)
//!         Handler-->>Http: 400 + problem body
//!     end
//!
//!     Binder-->>Handler: Ok(BoundParams)
//!     Handler-->>Http: 200 "ok"
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use reqbind::{Binder, BindError, FieldSpec, ParamKind, RawRequest};
//!
//! let fields = [FieldSpec::string("username"), FieldSpec::integer("age")];
//! let binder = Binder::new();
//!
//! let raw = RawRequest::from_query("username=kim&age=20");
//! let bound = binder.bind_parameters(&raw, &fields).unwrap();
//! assert_eq!(bound.get("age").and_then(|v| v.as_i64()), Some(20));
//!
//! let raw = RawRequest::from_query("username=kim&age=abc");
//! let err = binder.bind_parameters(&raw, &fields).unwrap_err();
//! assert_eq!(
//!     err,
//!     BindError::TypeConversionError {
//!         name: "age".into(),
//!         value: "abc".into(),
//!         kind: ParamKind::Integer,
//!     }
//! );
//! ```
//!
//! ## Concurrency
//!
//! Binding is synchronous and side-effect free. `Binder` and every spec type
//! are immutable after construction, so a single instance can serve any
//! number of threads without locking.

pub mod binder;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod error;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod request;
pub mod spec;
pub mod validator;

pub use binder::{
    Binder, BinderConfig, Bound, BoundBody, BoundParams, BoundValue, JsonRecord,
    RepeatedParamPolicy,
};
pub use error::BindError;
pub use request::{ContentKind, ParamMap, RawRequest};
pub use spec::{
    load_catalog, BindingSpec, BodyShape, Catalog, EndpointMeta, FieldSpec, ParamKind, RecordShape,
};
