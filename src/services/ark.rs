use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::ai_service::{UpstreamReply, VisionService};

const ANALYSIS_PROMPT: &str = "请根据这张牙齿照片给出结构化分析，使用简体中文。\n\
                               请按以下格式回答：\n\
                               1) 观察到的问题（如果不确定请说明）\n\
                               2) 清洁和护理建议（可执行、日常化）\n\
                               3) 是否建议尽快就医，以及建议挂什么科\n\
                               4) 温馨提醒：你的回答不能替代专业诊断";

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputContent<'a> {
    InputImage { image_url: &'a str },
    InputText { text: &'a str },
}

/// Client for the Volcengine Ark Responses API.
pub struct ArkService {
    api_key: String,
    model: String,
    responses_url: String,
    client: reqwest::Client,
}

impl ArkService {
    pub fn new(
        api_key: String,
        model: String,
        responses_url: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            model,
            responses_url,
            client: builder.build()?,
        })
    }

    fn build_request<'a>(&'a self, image_data_url: &'a str) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.model,
            input: vec![InputMessage {
                role: "user",
                content: vec![
                    InputContent::InputImage {
                        image_url: image_data_url,
                    },
                    InputContent::InputText {
                        text: ANALYSIS_PROMPT,
                    },
                ],
            }],
        }
    }
}

#[async_trait::async_trait]
impl VisionService for ArkService {
    async fn analyze_image(&self, image_data_url: &str) -> Result<UpstreamReply> {
        let request = self.build_request(image_data_url);

        log::info!("🤖 Sending image to Ark with model: {}", self.model);
        log::debug!("📊 Image data URL size: {} bytes", image_data_url.len());

        let response = self
            .client
            .post(&self.responses_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::info!("📥 Ark response status: {}", status);

        let body: Value = response.json().await?;

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
        })
    }
}
