use crate::model::StateRecord;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload<'a> {
    pub version: u32,
    pub exported_at: String,
    pub state: &'a StateRecord,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub filename: String,
}

/// Import failures shown to the user. Neither one touches the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    InvalidJson,
    MissingState,
}

impl ImportError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidJson => "invalid_json",
            Self::MissingState => "missing_state",
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson => f.write_str("That file is not valid JSON."),
            Self::MissingState => f.write_str("JSON file missing 'state'."),
        }
    }
}

impl std::error::Error for ImportError {}

pub fn export_payload(record: &StateRecord, exported_at: DateTime<Utc>) -> ExportPayload<'_> {
    ExportPayload {
        version: EXPORT_VERSION,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        state: record,
    }
}

/// `slc-<slug>.json`, where the slug is the lowercased student name with runs
/// of anything outside `[a-z0-9]` collapsed to one hyphen.
pub fn export_filename(student_name: &str) -> String {
    let lowered = student_name.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("name");
    }
    format!("slc-{}.json", slug)
}

/// Writes the export file. `out_path` wins over `out_dir`; with only a
/// directory the file name comes from `export_filename`.
pub fn write_export(
    record: &StateRecord,
    out_dir: Option<&Path>,
    out_path: Option<&Path>,
) -> anyhow::Result<ExportSummary> {
    let path = match (out_path, out_dir) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(dir)) => dir.join(export_filename(&record.student_name)),
        (None, None) => anyhow::bail!("an output directory or path is required"),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }

    let payload = export_payload(record, Utc::now());
    let text = serde_json::to_string_pretty(&payload).context("failed to serialize export")?;
    std::fs::write(&path, text)
        .with_context(|| format!("failed to write export {}", path.to_string_lossy()))?;

    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(ExportSummary { path, filename })
}

pub fn parse_import(text: &str) -> Result<StateRecord, ImportError> {
    let payload: serde_json::Value =
        serde_json::from_str(text).map_err(|_| ImportError::InvalidJson)?;
    let incoming = payload
        .get("state")
        .filter(|v| v.is_object())
        .ok_or(ImportError::MissingState)?;
    Ok(StateRecord::merged_over_defaults(incoming))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_slug_rules() {
        assert_eq!(export_filename("Somchai Jaidee"), "slc-somchai-jaidee.json");
        assert_eq!(export_filename("  --Ann__Marie!! "), "slc-ann-marie.json");
        assert_eq!(export_filename(""), "slc-name.json");
        assert_eq!(export_filename("ส้ม"), "slc-name.json");
        assert_eq!(export_filename("Class 5/B"), "slc-class-5-b.json");
    }

    #[test]
    fn payload_shape() {
        let rec = StateRecord::default();
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).single().expect("date");
        let v = serde_json::to_value(export_payload(&rec, at)).expect("serialize");
        assert_eq!(v["version"], 1);
        assert_eq!(v["exportedAt"], "2026-03-04T05:06:07.000Z");
        assert!(v["state"].is_object());
    }

    #[test]
    fn import_rejects_bad_json_and_missing_state() {
        assert_eq!(parse_import("not json"), Err(ImportError::InvalidJson));
        assert_eq!(parse_import("{\"version\":1}"), Err(ImportError::MissingState));
        assert_eq!(parse_import("{\"state\":\"x\"}"), Err(ImportError::MissingState));
        assert_eq!(parse_import("null"), Err(ImportError::MissingState));
    }

    #[test]
    fn import_merges_over_defaults() {
        let rec = parse_import(r#"{"state":{"comments":"hi"}}"#).expect("import");
        assert_eq!(rec.comments, "hi");
        assert_eq!(rec.student_name, "");
    }
}
