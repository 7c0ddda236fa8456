use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, AppResult, ConfigError};

/// LLM 提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Gemini,
}

impl LlmProvider {
    /// 宽松解析：未知的提供商名称回退到 OpenAI
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("未知的 LLM_PROVIDER '{}'，使用 openai", value);
            LlmProvider::OpenAi
        })
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => write!(f, "openai"),
            LlmProvider::Gemini => write!(f, "gemini"),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 使用的 LLM 提供商
    pub llm_provider: LlmProvider,
    /// OCR 语言提示（tesseract 的 -l 参数，例如 eng / jpn / jpn+eng）
    pub ocr_lang: String,
    /// tesseract 可执行文件路径
    pub tesseract_cmd: String,
    /// 回答记录文件（为空则不记录）
    pub answer_log_file: Option<String>,
    /// 采样温度
    pub temperature: f32,
    // --- OpenAI 配置 ---
    pub openai_api_key: Option<String>,
    pub openai_api_base_url: String,
    pub openai_model: String,
    // --- Gemini 配置 ---
    pub gemini_api_key: Option<String>,
    pub gemini_api_base_url: String,
    pub gemini_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::OpenAi,
            ocr_lang: "eng".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            answer_log_file: None,
            temperature: 0.2,
            openai_api_key: None,
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4.1-mini".to_string(),
            gemini_api_key: None,
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
        }
    }
}

/// 配置文件结构，所有字段可选，缺省时使用默认值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    /// 与 LLM_PROVIDER 环境变量同样宽松解析
    llm_provider: Option<String>,
    ocr_lang: Option<String>,
    tesseract_cmd: Option<String>,
    answer_log_file: Option<String>,
    temperature: Option<f32>,
    openai_api_key: Option<String>,
    openai_api_base_url: Option<String>,
    openai_model: Option<String>,
    gemini_api_key: Option<String>,
    gemini_api_base_url: Option<String>,
    gemini_model: Option<String>,
}

impl Config {
    /// 从环境变量加载（会先读取当前目录下的 .env）
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::default().with_env_overrides()
    }

    /// 加载配置：配置文件（可选）→ .env → 环境变量，后者覆盖前者
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let base = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            llm_provider: file
                .llm_provider
                .map(|v| LlmProvider::parse_lenient(&v))
                .unwrap_or(default.llm_provider),
            ocr_lang: file.ocr_lang.unwrap_or(default.ocr_lang),
            tesseract_cmd: file.tesseract_cmd.unwrap_or(default.tesseract_cmd),
            answer_log_file: file.answer_log_file.or(default.answer_log_file),
            temperature: file.temperature.unwrap_or(default.temperature),
            openai_api_key: file.openai_api_key.or(default.openai_api_key),
            openai_api_base_url: file.openai_api_base_url.unwrap_or(default.openai_api_base_url),
            openai_model: file.openai_model.unwrap_or(default.openai_model),
            gemini_api_key: file.gemini_api_key.or(default.gemini_api_key),
            gemini_api_base_url: file.gemini_api_base_url.unwrap_or(default.gemini_api_base_url),
            gemini_model: file.gemini_model.unwrap_or(default.gemini_model),
        })
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            llm_provider: var("LLM_PROVIDER")
                .map(|v| LlmProvider::parse_lenient(&v))
                .unwrap_or(self.llm_provider),
            ocr_lang: var("OCR_LANG").unwrap_or(self.ocr_lang),
            tesseract_cmd: var("TESSERACT_CMD").unwrap_or(self.tesseract_cmd),
            answer_log_file: var("ANSWER_LOG_FILE").or(self.answer_log_file),
            temperature: var("LLM_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.temperature),
            openai_api_key: var("OPENAI_API_KEY").or(self.openai_api_key),
            openai_api_base_url: var("OPENAI_API_BASE_URL").unwrap_or(self.openai_api_base_url),
            openai_model: var("OPENAI_MODEL").unwrap_or(self.openai_model),
            gemini_api_key: var("GEMINI_API_KEY").or(self.gemini_api_key),
            gemini_api_base_url: var("GEMINI_API_BASE_URL").unwrap_or(self.gemini_api_base_url),
            gemini_model: var("GEMINI_MODEL").unwrap_or(self.gemini_model),
        }
    }

    /// 当前提供商使用的模型名称
    pub fn model_name(&self) -> &str {
        match self.llm_provider {
            LlmProvider::OpenAi => &self.openai_model,
            LlmProvider::Gemini => &self.gemini_model,
        }
    }
}
