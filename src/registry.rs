// Handler registry: endpoint name -> handler function
use crate::binder::Binder;
use crate::controllers::{self, Handler, HandlerResponse};
use crate::ids::RequestId;
use crate::request::RawRequest;
use std::collections::HashMap;
use tracing::{info, info_span};

/// Name-keyed handler table.
///
/// Lookup is by endpoint name only; mapping paths and methods to names stays
/// with the caller's HTTP layer.
#[derive(Clone, Default)]
pub struct Registry {
    binder: Binder,
    handlers: HashMap<String, Handler>,
}

impl Registry {
    pub fn new(binder: Binder) -> Self {
        Registry {
            binder,
            handlers: HashMap::new(),
        }
    }

    /// Registry with every built-in handler.
    pub fn with_builtin(binder: Binder) -> Self {
        let mut registry = Registry::new(binder);
        register_all(&mut registry);
        registry
    }

    /// Add or replace a handler.
    pub fn register_handler(&mut self, name: &str, handler: Handler) {
        self.handlers.insert(name.to_string(), handler);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the handler registered under `name`, or answer 404.
    pub fn dispatch(&self, name: &str, raw: &RawRequest) -> HandlerResponse {
        let request_id = RequestId::new();
        let span = info_span!("dispatch", endpoint = name, request_id = %request_id);
        let _guard = span.enter();

        let response = match self.handlers.get(name) {
            Some(handler) => handler(&self.binder, raw),
            None => HandlerResponse::not_found(name),
        };
        info!(status = response.status.as_u16(), "Request dispatched");
        response
    }
}

pub fn register_all(registry: &mut Registry) {
    registry.register_handler("request_param_v1", controllers::request_param_v1);
    registry.register_handler("request_param_v2", controllers::request_param_v2);
    registry.register_handler("request_param_v3", controllers::request_param_v3);
    registry.register_handler("request_param_v4", controllers::request_param_v4);
    registry.register_handler("request_param_required", controllers::request_param_required);
    registry.register_handler("request_param_default", controllers::request_param_default);
    registry.register_handler("request_param_map", controllers::request_param_map);
    registry.register_handler("request_param_multivaluemap", controllers::request_param_multivaluemap);
    registry.register_handler("request_body_json_v1", controllers::request_body_json_v1);
    registry.register_handler("request_body_json_v2", controllers::request_body_json_v2);
    registry.register_handler("request_body_json_v3", controllers::request_body_json_v3);
    registry.register_handler("request_body_json_v4", controllers::request_body_json_v4);
    registry.register_handler("request_body_json_v5", controllers::request_body_json_v5);
    registry.register_handler("log_test", controllers::log_test);
}
