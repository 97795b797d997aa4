//! Reading text out of a Responses API payload.
//!
//! The provider answers in one of two shapes: a flat `output_text` string, or an
//! `output` list of items whose `content` blocks carry the text. The flat form
//! wins when it holds anything besides whitespace. Fields that are missing or of
//! the wrong type are skipped, never treated as errors.

use serde_json::Value;

const OUTPUT_TEXT: &str = "output_text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArkOutput {
    /// Non-blank top-level `output_text`, already trimmed.
    Flat(String),
    /// Everything found under `output`, in order.
    Nested(Vec<OutputItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    OutputText(String),
    Other,
}

impl ArkOutput {
    /// Classify a payload. Returns `None` when it is not a JSON object.
    pub fn from_value(payload: &Value) -> Option<Self> {
        let fields = payload.as_object()?;

        if let Some(Value::String(text)) = fields.get(OUTPUT_TEXT) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(Self::Flat(trimmed.to_string()));
            }
        }

        let items = match fields.get("output") {
            Some(Value::Array(items)) => items.iter().filter_map(OutputItem::from_value).collect(),
            _ => Vec::new(),
        };

        Some(Self::Nested(items))
    }

    pub fn text(&self) -> String {
        match self {
            Self::Flat(text) => text.clone(),
            Self::Nested(items) => items
                .iter()
                .flat_map(|item| item.content.iter())
                .filter_map(|block| match block {
                    ContentBlock::OutputText(text) => Some(text.as_str()),
                    ContentBlock::Other => None,
                })
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
        }
    }
}

impl OutputItem {
    fn from_value(item: &Value) -> Option<Self> {
        match item.get("content") {
            Some(Value::Array(blocks)) => Some(Self {
                content: blocks.iter().map(ContentBlock::from_value).collect(),
            }),
            _ => None,
        }
    }
}

impl ContentBlock {
    fn from_value(block: &Value) -> Self {
        match (block.get("type"), block.get("text")) {
            (Some(Value::String(kind)), Some(Value::String(text))) if kind == OUTPUT_TEXT => {
                Self::OutputText(text.clone())
            }
            _ => Self::Other,
        }
    }
}

/// Readable text of a provider payload, trimmed; empty when there is none.
pub fn extract_text(payload: &Value) -> String {
    ArkOutput::from_value(payload)
        .map(|output| output.text())
        .unwrap_or_default()
}
