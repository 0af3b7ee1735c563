use crate::binding::FormEvent;
use crate::exchange;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::{param_str, session_mut, update_payload};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

fn handle_export_json(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let out_dir = req.params.get("outDir").and_then(|v| v.as_str()).map(PathBuf::from);
    let out_path = req.params.get("outPath").and_then(|v| v.as_str()).map(PathBuf::from);
    if out_dir.is_none() && out_path.is_none() {
        return Err(HandlerErr::bad_params("missing params.outDir or params.outPath"));
    }
    let session = session_mut(state)?;
    let summary = exchange::write_export(session.record(), out_dir.as_deref(), out_path.as_deref())
        .map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?;
    info!(path = %summary.path.to_string_lossy(), "state exported");
    Ok(json!({
        "path": summary.path.to_string_lossy(),
        "filename": summary.filename,
        "version": exchange::EXPORT_VERSION,
    }))
}

fn handle_import_json(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let in_path = PathBuf::from(param_str(&req.params, "inPath")?);
    let session = session_mut(state)?;
    let text = std::fs::read_to_string(&in_path).map_err(|e| {
        HandlerErr::new(
            "io_failed",
            format!("failed to read {}: {}", in_path.to_string_lossy(), e),
        )
    })?;
    let record = match exchange::parse_import(&text) {
        Ok(r) => r,
        Err(e) => {
            warn!(path = %in_path.to_string_lossy(), code = e.code(), "import rejected");
            return Err(HandlerErr::new(e.code(), e.to_string()));
        }
    };
    let update = session
        .apply(FormEvent::Imported(record))
        .map_err(HandlerErr::from_update)?;
    let mut out = update_payload(session, &update);
    out["message"] = json!("Imported successfully!");
    Ok(out)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "exchange.exportJson" => handle_export_json(state, req),
        "exchange.importJson" => handle_import_json(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
