//! 解题流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. OCR 取出文字
//! 2. 拆分题干与选项
//! 3. LLM 回答
//! 4. 规范化回复（永远得到结果）
//! 5. 写入回答记录（可选，失败只告警）

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::models::{ParsedQuestion, SolveResult};
use crate::parser::{normalize_result, parse_question_choices};
use crate::services::{ask_llm, AnswerLog, Completion, OcrEngine};
use crate::utils::logging::truncate_text;
use crate::workflow::solve_ctx::SolveCtx;

/// 解题流程
///
/// - 编排 OCR → 解析 → LLM → 规范化
/// - 不持有任何全局状态，每次调用互不影响
pub struct SolveFlow<O, C> {
    ocr: O,
    llm: C,
    ocr_lang: String,
    answer_log: Option<AnswerLog>,
}

impl<O: OcrEngine, C: Completion> SolveFlow<O, C> {
    pub fn new(ocr: O, llm: C, ocr_lang: impl Into<String>) -> Self {
        Self {
            ocr,
            llm,
            ocr_lang: ocr_lang.into(),
            answer_log: None,
        }
    }

    pub fn with_answer_log(mut self, answer_log: AnswerLog) -> Self {
        info!("📝 回答记录文件: {}", answer_log.path());
        self.answer_log = Some(answer_log);
        self
    }

    /// 从图片解题
    pub async fn solve_image(&self, ctx: &SolveCtx, image: &[u8]) -> Result<SolveResult> {
        info!("{} 🔍 正在识别图片文字 ({} 字节)...", ctx, image.len());
        let text = self
            .ocr
            .extract_text(image, &self.ocr_lang)
            .await
            .context("OCR 识别失败")?;

        if text.trim().is_empty() {
            warn!("{} ⚠️ OCR 没有识别出任何文字", ctx);
        }

        self.solve_text(ctx, &text).await
    }

    /// 从已有的文字解题（跳过 OCR）
    pub async fn solve_text(&self, ctx: &SolveCtx, raw_text: &str) -> Result<SolveResult> {
        let parsed = parse_question_choices(raw_text);
        log_parsed(ctx, &parsed);

        info!("{} 🤖 正在询问 LLM...", ctx);
        let raw = ask_llm(&self.llm, &parsed).await.context("LLM 调用失败")?;
        info!("{} ✓ LLM 已回复: {}", ctx, truncate_text(&raw, 80));

        let result = normalize_result(&raw);
        info!("{} ✅ 回答: {}", ctx, result.answer_label);

        if let Some(answer_log) = &self.answer_log {
            if let Err(e) = answer_log.write(&parsed, &result).await {
                warn!("{} ⚠️ 写入回答记录失败: {}", ctx, e);
            }
        }

        Ok(result)
    }
}

fn log_parsed(ctx: &SolveCtx, parsed: &ParsedQuestion) {
    info!("{} 题干: {}", ctx, truncate_text(&parsed.question, 80));
    if parsed.has_choices() {
        let labels: Vec<&str> = parsed.choices.iter().map(|c| c.label.as_str()).collect();
        info!("{} 选项: {} 个 [{}]", ctx, parsed.choices.len(), labels.join(", "));
    } else {
        warn!("{} ⚠️ 未识别出选项", ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppResult, LlmError, OcrError};
    use std::sync::Mutex;

    struct FakeOcr {
        text: Option<&'static str>,
    }

    impl OcrEngine for FakeOcr {
        async fn extract_text(&self, _image: &[u8], _lang: &str) -> AppResult<String> {
            match self.text {
                Some(text) => Ok(text.to_string()),
                None => Err(OcrError::ExitFailure {
                    code: Some(1),
                    stderr: "boom".to_string(),
                }
                .into()),
            }
        }
    }

    struct FakeLlm {
        reply: Option<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl Completion for FakeLlm {
        async fn complete(&self, user_message: &str, _system_message: &str) -> AppResult<String> {
            self.prompts.lock().unwrap().push(user_message.to_string());
            match self.reply {
                Some(reply) => Ok(reply.to_string()),
                None => Err(LlmError::EmptyContent {
                    model: "fake".to_string(),
                }
                .into()),
            }
        }
    }

    fn ctx() -> SolveCtx {
        SolveCtx::new(1, "test")
    }

    #[tokio::test]
    async fn test_solve_image_end_to_end() {
        let flow = SolveFlow::new(
            FakeOcr {
                text: Some("What is 2+2?\nA) 3\nB) 4\n"),
            },
            FakeLlm::replying(r#"{"answer_label": "B", "reason": "2+2=4"}"#),
            "eng",
        );

        let result = flow.solve_image(&ctx(), b"png").await.unwrap();
        assert_eq!(result, SolveResult::new("B", "2+2=4"));

        let prompts = flow.llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("What is 2+2?"));
        assert!(prompts[0].contains("A. 3\nB. 4"));
    }

    #[tokio::test]
    async fn test_malformed_reply_still_produces_result() {
        let flow = SolveFlow::new(
            FakeOcr { text: Some("") },
            FakeLlm::replying("I cannot answer that"),
            "eng",
        );

        let result = flow.solve_image(&ctx(), b"png").await.unwrap();
        assert_eq!(result, SolveResult::new("", "I cannot answer that"));
        assert!(flow.llm.prompts.lock().unwrap()[0].contains("(選択肢なし)"));
    }

    #[tokio::test]
    async fn test_ocr_failure_is_reported() {
        let flow = SolveFlow::new(FakeOcr { text: None }, FakeLlm::replying("{}"), "eng");

        let err = flow.solve_image(&ctx(), b"png").await.unwrap_err();
        assert!(format!("{:#}", err).contains("OCR 识别失败"));
        assert!(flow.llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_is_reported() {
        let flow = SolveFlow::new(
            FakeOcr { text: Some("Q") },
            FakeLlm {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            },
            "eng",
        );

        let err = flow.solve_text(&ctx(), "Q").await.unwrap_err();
        assert!(format!("{:#}", err).contains("LLM 调用失败"));
    }

    #[tokio::test]
    async fn test_answer_log_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.txt");
        let flow = SolveFlow::new(
            FakeOcr { text: None },
            FakeLlm::replying(r#"{"answer_label": "ア", "reason": "東京"}"#),
            "jpn",
        )
        .with_answer_log(AnswerLog::with_path(path.to_string_lossy()));

        flow.solve_text(&ctx(), "首都は？\nア．東京\nイ．大阪").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("回答: ア"));
        assert!(content.contains("ア. 東京"));
    }

    #[tokio::test]
    async fn test_answer_log_failure_does_not_fail_solve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("answers.txt");
        let flow = SolveFlow::new(
            FakeOcr { text: None },
            FakeLlm::replying(r#"{"answer_label": "イ", "reason": "大阪"}"#),
            "jpn",
        )
        .with_answer_log(AnswerLog::with_path(path.to_string_lossy()));

        let result = flow.solve_text(&ctx(), "首都は？\nア．東京\nイ．大阪").await.unwrap();

        assert_eq!(result, SolveResult::new("イ", "大阪"));
        assert!(!path.exists());
    }
}
