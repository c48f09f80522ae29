//! PII analysis handler

use crate::error::{AppError, MISSING_PARAGRAPH};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use pii_core::{PiiError, PiiFinding};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

/// Analyze request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Free-form text to scan
    #[schema(example = "My Aadhaar number is 456700000786 and PAN is AKKJM7875665D")]
    pub paragraph: String,
}

/// A single detected PII value
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PiiFindingBody {
    #[schema(example = "PAN Number")]
    pub pii_type: String,

    #[schema(example = "AKKJM7875665D")]
    pub pii_value: String,
}

impl From<PiiFinding> for PiiFindingBody {
    fn from(finding: PiiFinding) -> Self {
        Self {
            pii_type: finding.pii_type.to_string(),
            pii_value: finding.pii_value,
        }
    }
}

/// Analyze response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub pii_detected: Vec<PiiFindingBody>,
}

/// Detect and classify PII in a paragraph
#[utoipa::path(
    post,
    path = "/analyze-pii",
    tag = "pii",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Detected PII, or an error message in the body", body = AnalyzeResponse)
    )
)]
pub async fn analyze_pii_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let body = body.map_err(|rejection| PiiError::ValidationError(rejection.body_text()))?;
    let paragraph = parse_paragraph(&body)?;
    let detector = state.get_detector().await.ok_or(AppError::NotInitialized)?;

    let chars = paragraph.chars().count();
    let start = Instant::now();
    let findings = tokio::task::spawn_blocking(move || detector.analyze_pii(&paragraph))
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {e}")))??;
    state.record_analysis(findings.len());

    tracing::info!(
        %request_id,
        chars,
        findings = findings.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Analyzed paragraph"
    );

    Ok(Json(AnalyzeResponse {
        pii_detected: findings.into_iter().map(Into::into).collect(),
    }))
}

/// Pull the `paragraph` string out of a raw JSON body
fn parse_paragraph(body: &[u8]) -> pii_core::Result<String> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PiiError::ValidationError(format!("Invalid JSON body: {e}")))?;

    let object = value.as_object().ok_or_else(|| {
        PiiError::ValidationError("Request body must be a JSON object.".to_string())
    })?;

    match object.get("paragraph") {
        None => Err(PiiError::ValidationError(MISSING_PARAGRAPH.to_string())),
        Some(Value::String(paragraph)) => Ok(paragraph.clone()),
        Some(_) => Err(PiiError::ValidationError(
            "'paragraph' must be a string.".to_string(),
        )),
    }
}
