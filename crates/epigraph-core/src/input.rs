// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction of the material submitted for analysis.
//!
//! File contents are read client-side and forwarded as text. Images are
//! never transmitted: a textual placeholder describing the image is sent in
//! their place.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::EpigraphError;

/// Where the submitted material came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputKind {
    File,
    Text,
    Camera,
}

/// User-submitted material, serialized as the `inputData` request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl InputPayload {
    /// Free text typed by the user. Blank text is rejected.
    pub fn text(content: impl Into<String>) -> Result<Self, EpigraphError> {
        let data = content.into();
        if data.trim().is_empty() {
            return Err(EpigraphError::Input("no text provided".into()));
        }
        Ok(Self {
            data,
            kind: InputKind::Text,
            file_name: None,
            file_size: None,
            file_type: None,
        })
    }

    /// An uploaded file, given its name and raw bytes.
    pub fn file(name: &str, bytes: &[u8]) -> Self {
        let mime = mime_for(name);
        let size = bytes.len() as u64;
        let data = if is_image(mime) {
            format!(
                "[Image: {name}]\n\nImage file detected. Size: {}KB\nNote: Image processing available - OCR capabilities enabled.",
                size_kb(size)
            )
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };
        Self {
            data,
            kind: InputKind::File,
            file_name: Some(name.to_string()),
            file_size: Some(size),
            file_type: mime.map(str::to_string),
        }
    }

    /// A camera capture. Non-image captures are read as text like uploads.
    pub fn camera(name: &str, bytes: &[u8]) -> Self {
        let mime = mime_for(name);
        let size = bytes.len() as u64;
        let data = if is_image(mime) {
            format!(
                "[Camera Image: {name}]\n\nImage captured from camera - ready for OCR processing.\nFile size: {}KB",
                size_kb(size)
            )
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };
        Self {
            data,
            kind: InputKind::Camera,
            file_name: Some(name.to_string()),
            file_size: Some(size),
            file_type: mime.map(str::to_string),
        }
    }

    /// Reads a file from disk as an upload.
    pub fn load_file(path: &Path) -> Result<Self, EpigraphError> {
        let (name, bytes) = read(path)?;
        Ok(Self::file(&name, &bytes))
    }

    /// Reads a file from disk as a camera capture.
    pub fn load_camera(path: &Path) -> Result<Self, EpigraphError> {
        let (name, bytes) = read(path)?;
        Ok(Self::camera(&name, &bytes))
    }
}

fn read(path: &Path) -> Result<(String, Vec<u8>), EpigraphError> {
    let bytes = std::fs::read(path)
        .map_err(|e| EpigraphError::Input(format!("cannot read {}: {e}", path.display())))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, bytes))
}

/// Sizes are shown rounded to the nearest kilobyte.
fn size_kb(size: u64) -> u64 {
    (size + 512) / 1024
}

fn is_image(mime: Option<&str>) -> bool {
    mime.is_some_and(|m| m.starts_with("image/"))
}

/// MIME type guessed from the file extension.
fn mime_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let err = InputPayload::text("   \n").unwrap_err();
        assert!(matches!(err, EpigraphError::Input(_)));
    }

    #[test]
    fn text_payload_serializes_with_wire_names() {
        let payload = InputPayload::text("lugal-e").unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"data": "lugal-e", "type": "text"}));
    }

    #[test]
    fn image_upload_becomes_placeholder() {
        let bytes = vec![0u8; 2048];
        let payload = InputPayload::file("tablet.PNG", &bytes);
        assert_eq!(payload.kind, InputKind::File);
        assert_eq!(payload.file_type.as_deref(), Some("image/png"));
        assert_eq!(payload.file_size, Some(2048));
        assert!(payload.data.starts_with("[Image: tablet.PNG]"));
        assert!(payload.data.contains("Size: 2KB"));
    }

    #[test]
    fn text_upload_is_read_lossily() {
        let payload = InputPayload::file("notes.txt", b"dumu \xff lugal");
        assert_eq!(payload.data, "dumu \u{fffd} lugal");
        assert_eq!(payload.file_type.as_deref(), Some("text/plain"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["fileName"], "notes.txt");
        assert_eq!(json["fileSize"], 12);
        assert_eq!(json["type"], "file");
    }

    #[test]
    fn camera_capture_of_image_uses_camera_placeholder() {
        let payload = InputPayload::camera("IMG_0001.jpg", &[1, 2, 3]);
        assert_eq!(payload.kind, InputKind::Camera);
        assert!(payload.data.starts_with("[Camera Image: IMG_0001.jpg]"));
        assert!(payload.data.contains("File size: 0KB"));
    }

    #[test]
    fn unknown_extension_has_no_mime() {
        let payload = InputPayload::file("stela.atf", b"&P123456");
        assert_eq!(payload.file_type, None);
        assert_eq!(payload.data, "&P123456");
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = InputPayload::load_file(Path::new("/nonexistent/epigraph/tablet.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
