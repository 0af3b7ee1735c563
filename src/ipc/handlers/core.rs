use crate::binding::Session;
use crate::db;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::{param_str, session_mut, update_payload};
use crate::ipc::types::{AppState, Request};
use crate::store::{SqliteStorage, Store};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Opens (or creates) the workspace database and loads the stored record.
/// Replaces any session that was open before.
pub fn select_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let store = Store::new(Box::new(SqliteStorage::new(conn)), state.config.storage_key.clone());
    state.session = Some(Session::open(store));
    state.workspace = Some(path.to_path_buf());
    info!(workspace = %path.to_string_lossy(), "workspace selected");
    Ok(())
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let path = PathBuf::from(param_str(&req.params, "path")?);
    if let Err(e) = select_workspace(state, &path) {
        warn!(error = %e, "workspace open failed");
        return Err(HandlerErr::new("db_open_failed", format!("{e:#}")));
    }
    let session = session_mut(state)?;
    let update = session.view();
    let mut out = update_payload(session, &update);
    out["workspacePath"] = json!(path.to_string_lossy());
    Ok(out)
}

fn handle_state_get(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(state)?;
    let update = session.view();
    Ok(update_payload(session, &update))
}

fn handle_view_get(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(state)?;
    let update = session.view();
    Ok(json!({ "view": update.view }))
}

fn handle_state_reset(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(state)?;
    let update = session
        .reset()
        .map_err(|e| HandlerErr::new("storage_write_failed", format!("{e:#}")))?;
    Ok(update_payload(session, &update))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "health" => return Some(handle_health(state, req)),
        "workspace.select" => handle_workspace_select(state, req),
        "state.get" => handle_state_get(state),
        "view.get" => handle_view_get(state),
        "state.reset" => handle_state_reset(state),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
