/// Gemini 客户端
///
/// 直接调用 `models/{model}:generateContent`，并要求以 `application/json` 返回
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// 第一个候选的所有文本片段拼接
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiClient {
    /// 创建客户端，缺少 GEMINI_API_KEY 时返回配置错误
    pub fn new(config: &Config) -> AppResult<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| AppError::missing_api_key("GEMINI_API_KEY"))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            api_base_url: config.gemini_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.gemini_model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model_name)
    }

    /// 发送生成请求，返回模型输出的文本
    pub async fn generate(&self, user_message: &str, system_message: &str) -> AppResult<String> {
        debug!("正在调用 Gemini API，模型: {}", self.model_name);

        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_message,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: user_message }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API 调用失败: {} {}", status, body);
            return Err(AppError::llm_api_failed(
                &self.model_name,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        debug!("Gemini API 调用成功");

        let text = parsed.text().ok_or_else(|| LlmError::EmptyContent {
            model: self.model_name.clone(),
        })?;

        Ok(text.trim().to_string())
    }
}
