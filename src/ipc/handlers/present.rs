use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::{param_str, session_mut};
use crate::ipc::types::{AppState, Request};
use crate::present::{print_document, RenderedSlide};
use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;

fn slide_payload(slide: Option<RenderedSlide>) -> Result<serde_json::Value, HandlerErr> {
    let slide =
        slide.ok_or_else(|| HandlerErr::new("present_closed", "presentation is not open"))?;
    Ok(json!({ "slide": slide }))
}

fn handle_print_document(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let out_path = PathBuf::from(param_str(&req.params, "outPath")?);
    let session = session_mut(state)?;
    let html = print_document(session.record());
    let write = || -> anyhow::Result<()> {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.to_string_lossy())
                })?;
            }
        }
        std::fs::write(&out_path, html)
            .with_context(|| format!("failed to write {}", out_path.to_string_lossy()))
    };
    write().map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?;
    Ok(json!({
        "path": out_path.to_string_lossy(),
        "slideCount": crate::slides::DECK_LEN,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "present.open" => session_mut(state).map(|s| json!({ "slide": s.open_presentation() })),
        "present.next" => session_mut(state).and_then(|s| slide_payload(s.next_slide())),
        "present.prev" => session_mut(state).and_then(|s| slide_payload(s.prev_slide())),
        "present.current" => session_mut(state).and_then(|s| slide_payload(s.current_slide())),
        "present.close" => session_mut(state).map(|s| {
            s.close_presentation();
            json!({ "open": false })
        }),
        "present.printDocument" => handle_print_document(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
