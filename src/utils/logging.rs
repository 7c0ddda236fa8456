/// 日志工具模块
///
/// 初始化 tracing，并提供日志格式化的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 日志统一写到 stderr，stdout 留给工具协议和最终结果。
/// 设置了 `RUST_LOG` 时以它为准，否则按 `-v` 次数决定级别。
///
/// # 参数
/// - `verbosity`: `-v` 出现的次数
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(mode: &str, provider: &str, ocr_lang: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", mode);
    info!("🤖 LLM 提供商: {} | 🔤 OCR 语言: {}", provider, ocr_lang);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// 按字符截断，换行替换为空格，保证日志一行一条
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    if single_line.chars().count() > max_len {
        single_line.chars().take(max_len).collect::<String>() + "..."
    } else {
        single_line
    }
}
