use axum::body::{Body, Bytes};
use http_body_util::{BodyExt, LengthLimitError, Limited};

/// Largest request body accepted by `/api/analyze`.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub enum BodyReadError {
    /// More than the allowed number of bytes arrived.
    TooLarge,
    /// The client stream broke before the body ended.
    Interrupted(String),
}

/// Buffer a request body, failing as soon as it grows past `limit` bytes.
pub async fn read_bounded(body: Body, limit: usize) -> Result<Bytes, BodyReadError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(BodyReadError::TooLarge),
        Err(err) => Err(BodyReadError::Interrupted(err.to_string())),
    }
}
