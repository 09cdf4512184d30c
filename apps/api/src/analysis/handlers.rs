//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::analysis::client::analyze;
use crate::analysis::report::AnalysisReport;
use crate::errors::AppError;
use crate::gemini::DocumentRequest;
use crate::state::AppState;

/// Body of POST /api/v1/analyze. `fileData` is accepted as an alias for
/// `base64Data` — older front-end builds send one or the other.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(alias = "fileData")]
    pub base64_data: Option<String>,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub target_job: String,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub status: String,
    pub model: String,
    pub reply: String,
}

/// POST /api/v1/analyze
///
/// One upload in, one validated report out. All pipeline failures arrive
/// here already classified as `AppError`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let base64_data = request
        .base64_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("Missing base64Data or fileData".to_string()))?;
    let mime_type = request
        .mime_type
        .filter(|mime| !mime.is_empty())
        .ok_or_else(|| AppError::Validation("Missing mimeType".to_string()))?;

    let report = analyze(
        state.model.as_ref(),
        &base64_data,
        &mime_type,
        &request.target_job,
    )
    .await?;

    Ok(Json(report))
}

/// GET /api/v1/diagnostics
///
/// Operator check: proves the credential and model are usable with a one-line
/// generation through the same call path as a real analysis. Never returns
/// the key.
pub async fn handle_diagnostics(
    State(state): State<AppState>,
) -> Result<Json<DiagnosticsResponse>, AppError> {
    let request = DocumentRequest {
        instruction: "Reply with the single word OK.".to_string(),
        base64_data: BASE64.encode(b"ping"),
        mime_type: "text/plain".to_string(),
    };

    let reply = state.model.generate(&request).await?;

    Ok(Json(DiagnosticsResponse {
        status: "ok".to_string(),
        model: state.config.model.model_name.clone(),
        reply: reply.trim().to_string(),
    }))
}
