use thiserror::Error;

/// 应用程序错误类型
///
/// 解析核心（`parser`）永远不会返回错误，这里的错误全部来自外部协作者：
/// 配置、OCR、LLM、工具协议以及文件操作。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// OCR 识别错误
    #[error("OCR错误: {0}")]
    Ocr(#[from] OcrError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 工具协议错误
    #[error("协议错误: {0}")]
    Protocol(#[from] ProtocolError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 所选提供商缺少 API 密钥
    #[error("{var_name} 未设置")]
    MissingApiKey { var_name: &'static str },
    /// TOML 解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// OCR 识别错误
#[derive(Debug, Error)]
pub enum OcrError {
    /// 无法启动 OCR 进程
    #[error("无法启动 OCR 程序 {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// OCR 进程以非零状态退出
    #[error("OCR 程序执行失败 (退出码: {code:?}): {stderr}")]
    ExitFailure { code: Option<i32>, stderr: String },
    /// 与 OCR 进程的管道通信失败
    #[error("OCR 管道读写失败: {0}")]
    Pipe(#[source] std::io::Error),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {0}")]
    RequestBuildFailed(String),
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// HTTP 传输失败
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),
}

/// 工具协议错误
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// 请求行不是合法 JSON
    #[error("请求解析失败: {0}")]
    BadRequest(#[from] serde_json::Error),
    /// 缺少必需参数
    #[error("缺少参数: {0}")]
    MissingArgument(&'static str),
    /// Base64 解码失败
    #[error("Base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Protocol(ProtocolError::BadRequest(err))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::Protocol(ProtocolError::Base64(err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Llm(LlmError::Http(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺少 API 密钥错误
    pub fn missing_api_key(var_name: &'static str) -> Self {
        AppError::Config(ConfigError::MissingApiKey { var_name })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
