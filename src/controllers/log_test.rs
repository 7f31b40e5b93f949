use super::HandlerResponse;
use crate::binder::Binder;
use crate::request::RawRequest;
use tracing::{debug, error, info, trace, warn};

/// Emits one event per level; handy for checking `REQBIND_LOG_LEVEL` filtering.
pub fn log_test(_binder: &Binder, _raw: &RawRequest) -> HandlerResponse {
    let name = "reqbind";

    trace!("trace log = {}", name);
    debug!("debug log = {}", name);
    info!("info log = {}", name);
    warn!("warn log = {}", name);
    error!("error log = {}", name);

    HandlerResponse::ok_text("ok")
}
