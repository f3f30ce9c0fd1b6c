//! Image files as embedded `data:` URLs for a node's image field.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

/// MIME type from the file extension; `None` for non-image files.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read an image file and embed it as a data URL.
pub fn load_image_data_url(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<String> {
    let mime = image_mime_type(path).ok_or_else(|| ApplicationError::OperationFailed {
        context: format!("not an image file: {}", path.display()),
        source: Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "unsupported image extension",
        )),
    })?;
    let bytes = fs.read(path).with_path_context("read image", path)?;
    Ok(to_data_url(mime, &bytes))
}
