//! OCR 服务 - 业务能力层
//!
//! 只负责"从图片取出文字"能力。默认实现把图片字节通过管道交给 tesseract 命令行。

use std::future::Future;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppResult, OcrError};

/// OCR 能力
pub trait OcrEngine {
    /// 识别图片中的文字，`lang` 为语言提示（如 `eng`、`jpn+eng`）
    fn extract_text(
        &self,
        image: &[u8],
        lang: &str,
    ) -> impl Future<Output = AppResult<String>> + Send;
}

/// 基于 tesseract 命令行的 OCR
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image: &[u8], lang: &str) -> AppResult<String> {
        debug!("调用 {}，语言: {}，图片大小: {} 字节", self.command, lang, image.len());

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OcrError::SpawnFailed {
                command: self.command.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Pipe(std::io::Error::other("stdin 未被管道化")))?;

        // 写入和读取同时进行，避免大图片把管道塞满
        let write_image = async move {
            let result = stdin.write_all(image).await;
            drop(stdin);
            result
        };
        let (write_result, output) = tokio::join!(write_image, child.wait_with_output());
        let output = output.map_err(OcrError::Pipe)?;

        if !output.status.success() {
            return Err(OcrError::ExitFailure {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        write_result.map_err(OcrError::Pipe)?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR 完成，识别出 {} 个字符", text.chars().count());
        Ok(text)
    }
}
