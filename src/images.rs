use anyhow::{anyhow, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

pub fn data_uri_from_bytes(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file into a `data:` URI suitable for the record.
pub fn data_uri_from_path(path: &Path) -> anyhow::Result<String> {
    let mime = mime_for(path)
        .ok_or_else(|| anyhow!("unsupported image type: {}", path.to_string_lossy()))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image {}", path.to_string_lossy()))?;
    Ok(data_uri_from_bytes(mime, &bytes))
}

pub fn is_image_data_uri(s: &str) -> bool {
    s.starts_with("data:image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_bytes_with_mime() {
        assert_eq!(data_uri_from_bytes("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn mime_is_taken_from_extension() {
        assert_eq!(mime_for(Path::new("a/b/photo.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("scan.webp")), Some("image/webp"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("noext")), None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = data_uri_from_path(Path::new("/nonexistent/file.txt")).expect_err("should fail");
        assert!(err.to_string().contains("unsupported image type"));
    }
}
