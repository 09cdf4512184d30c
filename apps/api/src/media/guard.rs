//! Payload Guard — rejects oversize uploads before any capability call.

use crate::errors::AppError;

/// Transmitted-payload ceiling in decoded bytes.
pub const MAX_PAYLOAD_BYTES: f64 = 3.0 * 1024.0 * 1024.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Approximate decoded size of a base64 string. Ignores padding; close
/// enough for a limit check and matches what the user sees reported.
pub fn approx_decoded_bytes(base64_data: &str) -> f64 {
    base64_data.len() as f64 * 0.75
}

/// Fails with `PayloadTooLarge` (size in MB, two-decimal display) when the
/// approximate decoded size exceeds the 3 MB ceiling. Runs after
/// normalization, so downsized images are measured at their new size.
pub fn check_payload(base64_data: &str) -> Result<(), AppError> {
    let bytes = approx_decoded_bytes(base64_data);
    if bytes > MAX_PAYLOAD_BYTES {
        return Err(AppError::PayloadTooLarge {
            size_mb: bytes / BYTES_PER_MB,
        });
    }
    Ok(())
}
