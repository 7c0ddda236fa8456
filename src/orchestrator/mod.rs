//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 根据配置构建 OCR 与 LLM 客户端
//! - 分派 solve / parse / serve 命令
//! - 输出结果
//!
//! ### `tool_server` - 工具调用服务
//! - stdin/stdout 上的行分隔 JSON 协议
//! - 每个请求交给同一个 SolveFlow 处理
//!
//! ## 层次关系
//!
//! ```text
//! app / tool_server (处理命令与请求)
//!     ↓
//! workflow::SolveFlow (处理单张图片)
//!     ↓
//! services (能力层：ocr / llm / answer_log)   parser (纯函数：拆分 / 规范化)
//!     ↓
//! clients (OpenAI / Gemini)
//! ```

pub mod app;
pub mod tool_server;

pub use app::App;
pub use tool_server::{ToolResponse, ToolServer};
