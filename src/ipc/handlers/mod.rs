pub mod core;
pub mod exchange;
pub mod form;
pub mod present;

use crate::binding::{Session, ViewUpdate};
use crate::ipc::error::HandlerErr;
use crate::ipc::types::AppState;
use serde_json::json;

pub(crate) fn session_mut(state: &mut AppState) -> Result<&mut Session, HandlerErr> {
    state.session.as_mut().ok_or_else(HandlerErr::no_workspace)
}

pub(crate) fn param_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing params.{}", key)))
}

/// Record plus everything derived from it, as returned after each edit.
pub(crate) fn update_payload(session: &Session, update: &ViewUpdate) -> serde_json::Value {
    let mut out = json!({
        "state": session.record(),
        "view": update.view,
    });
    if let Some(slide) = &update.slide {
        out["slide"] = json!(slide);
    }
    out
}
