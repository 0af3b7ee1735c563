use crate::binding::FormEvent;
use crate::images;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::{param_str, session_mut, update_payload};
use crate::ipc::types::{AppState, Request};
use crate::model::{Field, ImageSlot};
use crate::subjects::SubjectGroup;
use std::path::Path;

fn apply_event(state: &mut AppState, event: FormEvent) -> Result<serde_json::Value, HandlerErr> {
    let session = session_mut(state)?;
    let update = session.apply(event).map_err(HandlerErr::from_update)?;
    Ok(update_payload(session, &update))
}

fn handle_form_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let field_raw = param_str(&req.params, "field")?;
    let field = Field::parse(field_raw)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown field: {}", field_raw)))?;
    let value = param_str(&req.params, "value")?.to_string();
    apply_event(state, FormEvent::FieldChanged { field, value })
}

fn handle_ratings_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let group_raw = param_str(&req.params, "group")?;
    let group = SubjectGroup::parse(group_raw)
        .ok_or_else(|| HandlerErr::bad_params("group must be one of: core, cocore"))?;
    let subject = param_str(&req.params, "subject")?.to_string();
    let stars = req
        .params
        .get("stars")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("stars must be an integer"))?;
    let stars = u8::try_from(stars).map_err(|_| HandlerErr::bad_params("stars must be in 1..=5"))?;
    apply_event(
        state,
        FormEvent::RatingSelected {
            group,
            subject,
            stars,
        },
    )
}

fn parse_slot(req: &Request) -> Result<ImageSlot, HandlerErr> {
    let raw = param_str(&req.params, "slot")?;
    ImageSlot::parse(raw).ok_or_else(|| {
        HandlerErr::bad_params("slot must be one of: studentPhoto, imgCore, imgCoCore")
    })
}

fn handle_images_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let slot = parse_slot(req)?;
    let data_uri = if let Some(uri) = req.params.get("dataUri").and_then(|v| v.as_str()) {
        uri.to_string()
    } else {
        let path = param_str(&req.params, "path")
            .map_err(|_| HandlerErr::bad_params("missing params.path or params.dataUri"))?;
        images::data_uri_from_path(Path::new(path))
            .map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?
    };
    apply_event(state, FormEvent::ImageChanged { slot, data_uri })
}

fn handle_images_clear(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let slot = parse_slot(req)?;
    apply_event(
        state,
        FormEvent::ImageChanged {
            slot,
            data_uri: String::new(),
        },
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "form.set" => handle_form_set(state, req),
        "ratings.set" => handle_ratings_set(state, req),
        "images.set" => handle_images_set(state, req),
        "images.clear" => handle_images_clear(state, req),
        _ => return None,
    };
    Some(match result {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    })
}
