//! Image Normalizer — downsizes and recompresses oversized images before
//! transmission so the payload guard sees the post-compression size.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use thiserror::Error;
use tracing::debug;

/// Larger image dimension after normalization.
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG re-encode quality (0–100).
const JPEG_QUALITY: u8 = 70;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),
}

/// Base64 payload plus its (possibly rewritten) MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUpload {
    pub base64_data: String,
    pub mime_type: String,
}

/// Static images qualify for JPEG re-encoding. Animated GIFs would collapse
/// to a single frame, so they pass through untouched.
pub fn is_resizable_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/") && mime_type != "image/gif"
}

/// Decodes the image, scales it so the larger dimension is at most
/// [`MAX_DIMENSION`] (aspect ratio preserved), and re-encodes as JPEG.
/// Non-image and GIF input passes through unchanged.
///
/// Callers treat failure as recoverable: fall back to the original payload
/// rather than aborting the analysis.
pub fn normalize(base64_data: &str, mime_type: &str) -> Result<NormalizedUpload, NormalizeError> {
    if !is_resizable_image(mime_type) {
        return Ok(NormalizedUpload {
            base64_data: base64_data.to_string(),
            mime_type: mime_type.to_string(),
        });
    }

    let bytes = BASE64
        .decode(base64_data.as_bytes())
        .map_err(|e| NormalizeError::Decode(e.to_string()))?;

    let decoded =
        image::load_from_memory(&bytes).map_err(|e| NormalizeError::Decode(e.to_string()))?;

    let (width, height) = decoded.dimensions();
    let scaled = if width > MAX_DIMENSION || height > MAX_DIMENSION {
        // CatmullRom over Lanczos3: no ringing around text edges.
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::CatmullRom)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = scaled.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| NormalizeError::Encode(e.to_string()))?;

    debug!(
        "normalized image: {}x{} -> {}x{}, {} -> {} bytes",
        width,
        height,
        rgb.width(),
        rgb.height(),
        bytes.len(),
        encoded.len()
    );

    Ok(NormalizedUpload {
        base64_data: BASE64.encode(&encoded),
        mime_type: "image/jpeg".to_string(),
    })
}
