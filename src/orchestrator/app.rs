//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：记录启动信息、根据配置构建 OCR 与 LLM 客户端
//! 2. **命令分派**：solve / parse / serve
//! 3. **结果展示**：把 SolveResult 以纯文本或 JSON 输出到 stdout
//!
//! 错误在这里向上返回，由 `main` 统一显示。

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::Command;
use crate::config::Config;
use crate::orchestrator::tool_server::ToolServer;
use crate::parser::parse_question_choices;
use crate::services::{AnswerLog, LlmService, TesseractOcr};
use crate::utils::logging::log_startup;
use crate::workflow::{SolveCtx, SolveFlow};

/// 用户取消（没有图片）时的提示
pub const CANCELLED_MESSAGE: &str = "キャンセルしました";

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        Self { config }
    }

    /// 运行命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Solve { image, json } => self.solve(&image, json).await,
            Command::Parse { input } => self.parse(&input).await,
            Command::Serve => self.serve().await,
        }
    }

    /// 根据配置构建解题流程
    fn build_flow(&self) -> Result<SolveFlow<TesseractOcr, LlmService>> {
        let llm = LlmService::new(&self.config).context("初始化 LLM 客户端失败")?;
        let ocr = TesseractOcr::new(&self.config.tesseract_cmd);

        let mut flow = SolveFlow::new(ocr, llm, &self.config.ocr_lang);
        if let Some(path) = &self.config.answer_log_file {
            flow = flow.with_answer_log(AnswerLog::with_path(path));
        }
        Ok(flow)
    }

    async fn solve(&self, image_path: &str, json: bool) -> Result<()> {
        log_startup(
            "单次解题",
            &self.config.llm_provider.to_string(),
            &self.config.ocr_lang,
        );

        let image = read_input(image_path).await?;
        if image.is_empty() {
            warn!("⚠️ 没有图片输入");
            println!("{}", CANCELLED_MESSAGE);
            return Ok(());
        }

        let flow = self.build_flow()?;
        let result = flow
            .solve_image(&SolveCtx::new(1, image_path), &image)
            .await?;

        if json {
            println!("{}", result.to_json());
        } else {
            println!("{}", result.render());
        }
        Ok(())
    }

    async fn parse(&self, input_path: &str) -> Result<()> {
        let bytes = read_input(input_path).await?;
        let text = String::from_utf8_lossy(&bytes);

        let parsed = parse_question_choices(&text);
        info!("✓ 题干 {} 字符，选项 {} 个", parsed.question.chars().count(), parsed.choices.len());

        println!("{}", serde_json::to_string_pretty(&parsed)?);
        Ok(())
    }

    async fn serve(&self) -> Result<()> {
        log_startup(
            "工具服务模式",
            &self.config.llm_provider.to_string(),
            &self.config.ocr_lang,
        );

        let server = ToolServer::new(self.build_flow()?);
        server
            .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}

/// 读取文件内容，`-` 表示 stdin
async fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("读取 stdin 失败")?;
        return Ok(buf);
    }

    tokio::fs::read(path)
        .await
        .with_context(|| format!("无法读取文件: {}", path))
}
