use anyhow::Result;
use serde_json::Value;

/// Raw answer from the vision provider: HTTP status plus the parsed JSON body.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error.message` from the provider, when it sent a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }
}

/// Trait for vision providers that can look at an image and answer in text.
///
/// `Err` means the call itself failed (transport, timeout, unparsable body);
/// provider-level failures come back as an `UpstreamReply` with a non-2xx status.
#[async_trait::async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze_image(&self, image_data_url: &str) -> Result<UpstreamReply>;
}
