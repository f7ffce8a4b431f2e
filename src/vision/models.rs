// Vision models and types

use crate::models::InlineData;
use base64::Engine;

/// Supported upload formats (common raster formats only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl UploadFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
            UploadFormat::WebP => "image/webp",
            UploadFormat::Gif => "image/gif",
        }
    }

    /// Detect format from magic bytes at the start of the upload
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(UploadFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(UploadFormat::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(UploadFormat::Gif)
        } else if data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
            Some(UploadFormat::WebP)
        } else {
            None
        }
    }
}

/// Validation limits
pub const MAX_IMAGE_SIZE_BYTES: usize = 20 * 1024 * 1024; // 20MB (Gemini limit)

/// Validate upload size
pub fn validate_image_size(data_len: usize) -> Result<(), String> {
    if data_len > MAX_IMAGE_SIZE_BYTES {
        return Err(format!(
            "Image size {} bytes exceeds maximum of {} bytes (20MB)",
            data_len, MAX_IMAGE_SIZE_BYTES
        ));
    }
    Ok(())
}

/// An uploaded image in its canonical wire form: lossless PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    data: Vec<u8>,
}

impl PngImage {
    /// Wrap already-encoded PNG bytes. Callers go through
    /// [`crate::vision::encode_png`] for arbitrary uploads.
    pub(crate) fn from_png_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The raw PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Base64-encoded `image/png` inline data for the Gemini request.
    pub fn to_inline_data(&self) -> InlineData {
        InlineData {
            mime_type: "image/png".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(&self.data),
        }
    }
}
