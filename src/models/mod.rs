use serde::{Deserialize, Serialize};
use serde_json::Value;

const IMAGE_DATA_URL_PREFIX: &str = "data:image/";

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub image_data_url: String,
}

impl AnalyzeRequest {
    /// Parse a raw request body. An empty body reads as `{}`.
    /// Returns `None` for malformed JSON, a missing or non-string `imageDataUrl`,
    /// or a value that is not an image data URL.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let value: Value = if body.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body).ok()?
        };

        match value.get("imageDataUrl") {
            Some(Value::String(url)) if url.starts_with(IMAGE_DATA_URL_PREFIX) => Some(Self {
                image_data_url: url.clone(),
            }),
            _ => None,
        }
    }
}

/// Successful analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub result: String,
}

/// JSON error payload shared by every failing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_request() {
        let body = br#"{"imageDataUrl":"data:image/png;base64,AAAA"}"#;
        let request = AnalyzeRequest::parse(body).unwrap();

        assert_eq!(request.image_data_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(AnalyzeRequest::parse(b"").is_none());
        assert!(AnalyzeRequest::parse(b"{not json").is_none());
        assert!(AnalyzeRequest::parse(b"null").is_none());
        assert!(AnalyzeRequest::parse(br#"["data:image/png;base64,AAAA"]"#).is_none());
        assert!(AnalyzeRequest::parse(br#"{"imageDataUrl":42}"#).is_none());
        assert!(AnalyzeRequest::parse(br#"{"imageDataUrl":"not-a-data-url"}"#).is_none());
        assert!(AnalyzeRequest::parse(br#"{"imageDataUrl":"data:text/plain;base64,AAAA"}"#).is_none());
    }

    #[test]
    fn test_error_body_omits_missing_details() {
        let plain = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(plain, json!({ "error": "boom" }));

        let detailed =
            serde_json::to_value(ErrorBody::with_details("boom", json!({ "code": 1 }))).unwrap();
        assert_eq!(detailed, json!({ "error": "boom", "details": { "code": 1 } }));
    }
}
