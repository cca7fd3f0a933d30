use std::{path::Path, sync::LazyLock};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use regex::Regex;
use tokio::fs;
use tracing::debug;

use crate::{
    error::{FramelensError, Result},
    types::EncodedMedia,
};

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

static MIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(.*?);").expect("mime pattern is a valid regex"));

/// Guess the media type a browser would tag a file with, from its extension.
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" | "qt" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "ogv" => "video/ogg",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => return None,
    };
    Some(mime)
}

/// Build a single-part `data:<mime>;base64,<payload>` URL.
pub fn to_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Split a data URL into its base64 payload and media type.
pub fn split_data_url(url: &str) -> Result<EncodedMedia> {
    let parts: Vec<&str> = url.split(',').collect();
    let [prefix, payload] = parts.as_slice() else {
        return Err(FramelensError::format(format!(
            "expected a single-part data URL, found {} segments",
            parts.len()
        )));
    };

    let mime_type = MIME_PATTERN
        .captures(prefix)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|mime| !mime.is_empty())
        .ok_or_else(|| FramelensError::format("could not determine MIME type"))?;

    Ok(EncodedMedia {
        data: payload.to_string(),
        mime_type: mime_type.to_string(),
    })
}

pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> Result<EncodedMedia> {
    split_data_url(&to_data_url(bytes, mime_type))
}

/// Read a file and encode it for an inline-data request.
///
/// The media type comes from `mime_override` when given, otherwise from the
/// file extension. Unknown extensions are tagged as
/// `application/octet-stream`, which the analysis client rejects.
pub async fn encode_file(path: &Path, mime_override: Option<&str>) -> Result<EncodedMedia> {
    let mime_type = mime_override
        .or_else(|| detect_mime_type(path))
        .unwrap_or(FALLBACK_MIME_TYPE);

    let bytes = fs::read(path).await?;
    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        mime_type,
        "read media file"
    );

    encode_bytes(&bytes, mime_type)
}
