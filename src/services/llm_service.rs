//! LLM 服务 - 业务能力层
//!
//! 只负责"让 LLM 给出答案"能力，不关心流程
//!
//! ## 技术栈
//! - OpenAI：`async-openai` crate
//! - Gemini：`reqwest` 直接调用 generateContent
//! - 启动时根据 [`LlmProvider`] 只构建一个客户端，没有全局单例

use std::future::Future;

use tracing::{debug, info};

use crate::clients::{GeminiClient, OpenAiClient};
use crate::config::{Config, LlmProvider};
use crate::error::AppResult;
use crate::models::ParsedQuestion;

/// 系统提示词
pub const SYSTEM_MESSAGE: &str = "あなたは厳密で説明力の高い試験対策アシスタントです。根拠を筋道立てて示し、最終的に一つの回答ラベルをJSONで返してください。";

/// 没有识别出选项时放在提示词里的占位
pub const NO_CHOICES_PLACEHOLDER: &str = "(選択肢なし)";

/// 文本补全能力
///
/// 返回的是 LLM 的原始文本，应当是 JSON，但调用方需要容忍格式偏差。
pub trait Completion {
    fn complete(
        &self,
        user_message: &str,
        system_message: &str,
    ) -> impl Future<Output = AppResult<String>> + Send;
}

enum ProviderClient {
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
}

/// LLM 服务
///
/// 职责：
/// - 根据配置持有唯一的提供商客户端
/// - 构建解题提示词
/// - 不解析回复（由 `parser::normalize_result` 负责）
pub struct LlmService {
    client: ProviderClient,
}

impl LlmService {
    /// 根据配置创建 LLM 服务，所选提供商缺少密钥时返回错误
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = match config.llm_provider {
            LlmProvider::OpenAi => ProviderClient::OpenAi(OpenAiClient::new(config)?),
            LlmProvider::Gemini => ProviderClient::Gemini(GeminiClient::new(config)?),
        };
        info!("🤖 LLM 提供商: {} (模型: {})", config.llm_provider, config.model_name());
        Ok(Self { client })
    }

    pub fn provider(&self) -> LlmProvider {
        match self.client {
            ProviderClient::OpenAi(_) => LlmProvider::OpenAi,
            ProviderClient::Gemini(_) => LlmProvider::Gemini,
        }
    }

    pub fn model_name(&self) -> &str {
        match &self.client {
            ProviderClient::OpenAi(c) => c.model_name(),
            ProviderClient::Gemini(c) => c.model_name(),
        }
    }

    /// 通用的 LLM 调用函数
    pub async fn send_to_llm(&self, user_message: &str, system_message: &str) -> AppResult<String> {
        debug!(
            "调用 LLM API，提供商: {}，用户消息长度: {} 字符",
            self.provider(),
            user_message.chars().count()
        );
        match &self.client {
            ProviderClient::OpenAi(c) => c.chat(user_message, system_message).await,
            ProviderClient::Gemini(c) => c.generate(user_message, system_message).await,
        }
    }
}

impl Completion for LlmService {
    async fn complete(&self, user_message: &str, system_message: &str) -> AppResult<String> {
        self.send_to_llm(user_message, system_message).await
    }
}

/// 构建解题提示词：题干、选项，以及固定的 JSON 输出格式
pub fn build_user_prompt(parsed: &ParsedQuestion) -> String {
    let choice_text = parsed
        .choice_text()
        .unwrap_or_else(|| NO_CHOICES_PLACEHOLDER.to_string());

    format!(
        r#"問題:
{}

選択肢:
{}

出力フォーマット（JSONで厳守）:
{{
  "answer_label": "<ラベル(例: A/ア/1など)>",
  "reason": "<100〜300字で根拠>"
}}"#,
        parsed.question, choice_text
    )
}

/// 让 LLM 回答一道已解析的题目，返回原始回复
pub async fn ask_llm<C: Completion>(llm: &C, parsed: &ParsedQuestion) -> AppResult<String> {
    let prompt = build_user_prompt(parsed);
    llm.complete(&prompt, SYSTEM_MESSAGE).await
}
