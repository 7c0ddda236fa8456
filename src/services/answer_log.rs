//! 回答记录服务 - 业务能力层
//!
//! 只负责把每次解题的题干、选项与回答追加写入记录文件

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{ParsedQuestion, SolveResult};

/// 回答记录
pub struct AnswerLog {
    log_file_path: String,
}

impl AnswerLog {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.log_file_path
    }

    /// 追加一条记录
    pub async fn write(&self, parsed: &ParsedQuestion, result: &SolveResult) -> AppResult<()> {
        debug!("写入回答记录: {}", self.log_file_path);

        let entry = format_entry(
            &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            parsed,
            result,
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;
        // tokio 的 File 在后台线程写入，不 flush 的话返回时内容可能还没落盘
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        Ok(())
    }
}

fn format_entry(timestamp: &str, parsed: &ParsedQuestion, result: &SolveResult) -> String {
    let choices = parsed.choice_text().unwrap_or_else(|| "-".to_string());
    format!(
        "{sep}\n{timestamp}\n{sep}\n問題:\n{}\n\n選択肢:\n{}\n\n{}\n\n",
        parsed.question,
        choices,
        result.render(),
        sep = "=".repeat(60),
    )
}
