// Upload normalization: validate the raster format, then re-encode to PNG.

use super::models::{validate_image_size, PngImage, UploadFormat};
use crate::error::{AppError, Result};
use std::io::Cursor;
use tracing::debug;

/// Convert an uploaded image into its canonical PNG wire form.
///
/// The upload is sniffed by magic bytes and must be one of the common raster
/// formats (JPEG, PNG, WebP, GIF). The decoded pixels are re-encoded to PNG
/// so the downstream call always receives one supported, lossless format.
/// No resizing and no quality negotiation happen here.
pub fn encode_png(data: &[u8]) -> Result<PngImage> {
    let format = UploadFormat::sniff(data).ok_or_else(|| {
        AppError::Image(
            "Unrecognized image data. Supported formats: JPEG, PNG, WebP, GIF.".to_string(),
        )
    })?;

    validate_image_size(data.len()).map_err(AppError::Image)?;

    let decoded = image::load_from_memory(data)
        .map_err(|e| AppError::Image(format!("Could not decode {} image: {}", format.mime_type(), e)))?;

    let mut png_bytes = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| AppError::Image(format!("PNG encoding failed: {}", e)))?;

    debug!(
        "Re-encoded {} upload ({} bytes) to PNG ({} bytes)",
        format.mime_type(),
        data.len(),
        png_bytes.len()
    );

    Ok(PngImage::from_png_bytes(png_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    // Tiny 1x1 PNG (base64 encoded)
    const PNG_1X1: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    fn png_fixture() -> Vec<u8> {
        base64::engine::general_purpose::STANDARD
            .decode(PNG_1X1)
            .unwrap()
    }

    #[test]
    fn test_png_roundtrip() {
        let encoded = encode_png(&png_fixture()).unwrap();
        // Output is always a well-formed PNG
        assert!(encoded.as_bytes().starts_with(b"\x89PNG\r\n\x1a\n"));
        let inline = encoded.to_inline_data();
        assert_eq!(inline.mime_type, "image/png");
    }

    #[test]
    fn test_jpeg_upload_becomes_png() {
        // Build a real JPEG in memory, then feed it through the normalizer
        let rgb = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let mut jpeg_bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut jpeg_bytes), image::ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(UploadFormat::sniff(&jpeg_bytes), Some(UploadFormat::Jpeg));

        let encoded = encode_png(&jpeg_bytes).unwrap();
        assert!(encoded.as_bytes().starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_unrecognized_data_rejected() {
        let result = encode_png(b"this is definitely not an image at all");
        assert!(matches!(result, Err(AppError::Image(_))));
    }

    #[test]
    fn test_truncated_image_rejected() {
        // Valid PNG magic, garbage body
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let result = encode_png(&data);
        assert!(matches!(result, Err(AppError::Image(_))));
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(UploadFormat::sniff(&png_fixture()), Some(UploadFormat::Png));
        assert_eq!(
            UploadFormat::sniff(b"GIF89a\x00\x00\x00\x00\x00\x00"),
            Some(UploadFormat::Gif)
        );
        assert_eq!(UploadFormat::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(UploadFormat::WebP));
        assert_eq!(UploadFormat::sniff(b"\xFF\xD8\xFF\xE0\x00\x10JFIF\x00\x01"), Some(UploadFormat::Jpeg));
        assert_eq!(UploadFormat::sniff(b"BM\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"), None);
        assert_eq!(UploadFormat::sniff(b"short"), None);
    }
}
