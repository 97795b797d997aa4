use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use super::body::{read_bounded, BodyReadError, MAX_BODY_BYTES};
use crate::models::{AnalyzeRequest, AnalyzeResult, ErrorBody};
use crate::server::connection::abort_response;
use crate::services::ark_response::extract_text;
use crate::services::VisionService;

const NOT_CONFIGURED_MESSAGE: &str = "Server API key is not configured.";
const INVALID_PAYLOAD_MESSAGE: &str = "Invalid image payload.";
const INTERNAL_ERROR_MESSAGE: &str = "Server error while analyzing image.";
const UPSTREAM_FALLBACK_MESSAGE: &str = "AI request failed.";
const NO_TEXT_MESSAGE: &str = "AI returned no readable text.";

/// Every way an analyze request can end without a result.
#[derive(Debug)]
pub enum AnalyzeError {
    NotConfigured,
    BodyTooLarge,
    BodyInterrupted,
    InvalidPayload,
    Internal(anyhow::Error),
    Upstream {
        status: u16,
        message: String,
        details: Value,
    },
    NoReadableText {
        details: Value,
    },
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(NOT_CONFIGURED_MESSAGE),
            ),
            Self::BodyTooLarge | Self::BodyInterrupted => return abort_response(),
            Self::InvalidPayload => (StatusCode::BAD_REQUEST, ErrorBody::new(INVALID_PAYLOAD_MESSAGE)),
            Self::Internal(e) => {
                log::error!("❌ Analyze failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(INTERNAL_ERROR_MESSAGE),
                )
            }
            Self::Upstream {
                status,
                message,
                details,
            } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorBody::with_details(message, details),
            ),
            Self::NoReadableText { details } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody::with_details(NO_TEXT_MESSAGE, details),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Run one analysis: check configuration, buffer the body, call the provider once
/// and pull the readable text out of its answer.
///
/// `vision` is `None` when no API key is configured; the body is not read then.
pub async fn analyze_image(
    vision: Option<&dyn VisionService>,
    body: Body,
) -> Result<String, AnalyzeError> {
    let Some(vision) = vision else {
        log::error!("❌ Analyze request rejected: ARK_API_KEY is not configured");
        return Err(AnalyzeError::NotConfigured);
    };

    let bytes = match read_bounded(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(BodyReadError::TooLarge) => {
            log::warn!("⚠️ Request body exceeded {} bytes, dropping connection", MAX_BODY_BYTES);
            return Err(AnalyzeError::BodyTooLarge);
        }
        Err(BodyReadError::Interrupted(reason)) => {
            log::warn!("⚠️ Request body interrupted: {}", reason);
            return Err(AnalyzeError::BodyInterrupted);
        }
    };
    log::info!("📸 Analyze request received ({} bytes)", bytes.len());

    let request = AnalyzeRequest::parse(&bytes).ok_or(AnalyzeError::InvalidPayload)?;

    let reply = vision
        .analyze_image(&request.image_data_url)
        .await
        .map_err(AnalyzeError::Internal)?;

    if !reply.is_success() {
        let message = reply
            .error_message()
            .unwrap_or(UPSTREAM_FALLBACK_MESSAGE)
            .to_string();
        log::error!("❌ Ark API error ({}): {}", reply.status, message);
        return Err(AnalyzeError::Upstream {
            status: reply.status,
            message,
            details: reply.body,
        });
    }

    let text = extract_text(&reply.body);
    if text.is_empty() {
        log::warn!("⚠️ Ark returned no readable text");
        return Err(AnalyzeError::NoReadableText {
            details: reply.body,
        });
    }

    log::info!("✅ Analysis complete ({} chars)", text.chars().count());
    Ok(text)
}

pub fn success_response(result: String) -> Response {
    (StatusCode::OK, Json(AnalyzeResult { result })).into_response()
}
