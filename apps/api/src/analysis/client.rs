//! Analysis Client — the one place the upload-to-result pipeline is wired
//! together: normalize → guard → submit → parse.
//!
//! Flow per call: downsize the image if it qualifies, enforce the payload
//! ceiling on the post-compression size, submit the document with the
//! instruction exactly once, decode the reply into a typed report.
//! Each call is stateless with respect to every other call.

use tracing::{info, warn};

use crate::analysis::parser::parse_report;
use crate::analysis::prompts::build_analysis_instruction;
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::gemini::{DocumentRequest, GenerativeModel};
use crate::media::guard::check_payload;
use crate::media::normalizer::{self, NormalizedUpload};

pub async fn analyze(
    model: &dyn GenerativeModel,
    base64_data: &str,
    mime_type: &str,
    target_job: &str,
) -> Result<AnalysisReport, AppError> {
    // Normalizer failure is recoverable: the capability can usually still
    // read the original image, so fall back instead of aborting.
    let upload = match normalizer::normalize(base64_data, mime_type) {
        Ok(upload) => upload,
        Err(e) => {
            warn!("image normalization failed, sending original payload: {e}");
            NormalizedUpload {
                base64_data: base64_data.to_string(),
                mime_type: mime_type.to_string(),
            }
        }
    };

    // Measured AFTER normalization. Failure here means no capability call.
    check_payload(&upload.base64_data)?;

    let request = DocumentRequest {
        instruction: build_analysis_instruction(target_job),
        base64_data: upload.base64_data,
        mime_type: upload.mime_type,
    };

    info!(
        "submitting analysis: mime={}, target_job={:?}",
        request.mime_type,
        if target_job.trim().is_empty() {
            "general"
        } else {
            target_job
        }
    );

    let reply = model.generate(&request).await?;
    let report = parse_report(&reply)?;
    info!("analysis complete: matchScore={}", report.match_score);
    Ok(report)
}
