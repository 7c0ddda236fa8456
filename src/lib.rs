//! # Auto Exam Solver
//!
//! 从截图中的选择题得到回答：OCR 取出文字 → 拆分题干与选项 → LLM 回答 → 规范化结果
//!
//! ## 架构设计
//!
//! ### ① 解析核心（Parser）
//! - `parser/` - 纯函数，不做 I/O，任何输入都不会失败
//! - `label` - 选项标签识别与规范化
//! - `segment` - 逐行分类，按单向区域切分题干与选项
//! - `assemble` - 组装选项，合并续行
//! - `normalize` - LLM 回复的兜底解析
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `OcrEngine` / `TesseractOcr` - OCR 能力
//! - `Completion` / `LlmService` - LLM 回答能力（OpenAI 或 Gemini）
//! - `AnswerLog` - 写回答记录能力
//!
//! ### ③ 流程层（Workflow）
//! - `SolveFlow` - OCR → 解析 → LLM → 规范化
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 命令分派
//! - `ToolServer` - stdin/stdout 工具调用服务

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, LlmProvider};
pub use error::{AppError, AppResult};
pub use models::{Choice, ParsedQuestion, SolveResult};
pub use orchestrator::{App, ToolServer};
pub use parser::{normalize_result, parse_question_choices};
pub use workflow::{SolveCtx, SolveFlow};
