//! 工具调用服务 - 编排层
//!
//! 在 stdin/stdout 上以"每行一个 JSON"的方式提供 `solve_from_png_base64` 工具：
//!
//! 1. 启动时输出一行工具清单
//! 2. 每读到一行 `tool_call` 请求，解码 PNG、解题，输出一行 `tool_result`
//! 3. 无关请求直接忽略；坏请求或解题失败输出 `tool_error`，服务继续
//!
//! 请求严格按到达顺序逐个处理。

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::error::{AppError, ProtocolError};
use crate::models::SolveResult;
use crate::services::{Completion, OcrEngine};
use crate::workflow::{SolveCtx, SolveFlow};

pub const PROTOCOL_VERSION: &str = "MCP/2025-06-18";
pub const TOOL_NAME: &str = "solve_from_png_base64";

/// 启动时输出的工具清单
pub fn manifest() -> Value {
    json!({
        "protocol": PROTOCOL_VERSION,
        "capabilities": { "tools": true },
        "tools": [{
            "name": TOOL_NAME,
            "description": "PNG(Base64)画像からOCR→LLMで回答と根拠を返す",
            "inputSchema": {
                "type": "object",
                "properties": { "png_base64": { "type": "string" } },
                "required": ["png_base64"]
            }
        }]
    })
}

#[derive(Debug, Deserialize)]
struct ToolRequest {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ToolResponse {
    /// 内容为 SolveResult 的 JSON 字符串
    ToolResult(String),
    ToolError(String),
}

/// 工具调用服务
pub struct ToolServer<O, C> {
    flow: SolveFlow<O, C>,
}

impl<O: OcrEngine, C: Completion> ToolServer<O, C> {
    pub fn new(flow: SolveFlow<O, C>) -> Self {
        Self { flow }
    }

    /// 运行服务直到输入结束
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(&mut writer, &manifest()).await?;
        info!("📡 工具服务已启动，等待请求...");

        let mut lines = reader.lines();
        let mut request_index = 0;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            request_index += 1;

            if let Some(response) = self.handle_line(request_index, &line).await {
                write_line(&mut writer, &response).await?;
            }
        }

        info!("输入已关闭，工具服务退出 (共 {} 个请求)", request_index);
        Ok(())
    }

    /// 处理一行请求；返回 None 表示该请求被忽略
    pub async fn handle_line(&self, request_index: usize, line: &str) -> Option<ToolResponse> {
        let request: ToolRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let err = AppError::from(e);
                error!("[请求 #{}] ❌ {}", request_index, err);
                return Some(ToolResponse::ToolError(err.to_string()));
            }
        };

        if request.kind != "tool_call" || request.name != TOOL_NAME {
            debug!(
                "[请求 #{}] 忽略请求: type={}, name={}",
                request_index, request.kind, request.name
            );
            return None;
        }

        match self.call_tool(request_index, &request.arguments).await {
            Ok(result) => Some(ToolResponse::ToolResult(result.to_json())),
            Err(e) => {
                error!("[请求 #{}] ❌ 解题失败: {:#}", request_index, e);
                Some(ToolResponse::ToolError(format!("{:#}", e)))
            }
        }
    }

    async fn call_tool(&self, request_index: usize, arguments: &Value) -> Result<SolveResult> {
        let png_base64 = arguments
            .get("png_base64")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingArgument("png_base64"))?;

        let image = general_purpose::STANDARD
            .decode(png_base64.trim())
            .map_err(ProtocolError::from)?;

        let ctx = SolveCtx::new(request_index, TOOL_NAME);
        self.flow.solve_image(&ctx, &image).await
    }
}

async fn write_line<W, T>(writer: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;

    struct FixedOcr;

    impl OcrEngine for FixedOcr {
        async fn extract_text(&self, image: &[u8], _lang: &str) -> AppResult<String> {
            assert_eq!(image, b"png");
            Ok("What is 2+2?\nA) 3\nB) 4".to_string())
        }
    }

    struct FixedLlm;

    impl Completion for FixedLlm {
        async fn complete(&self, _user: &str, _system: &str) -> AppResult<String> {
            Ok("```json\n{\"answer_label\": \"B\", \"reason\": \"2+2=4\"}\n```".to_string())
        }
    }

    fn server() -> ToolServer<FixedOcr, FixedLlm> {
        ToolServer::new(SolveFlow::new(FixedOcr, FixedLlm, "eng"))
    }

    fn output_lines(output: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_manifest() {
        let manifest = manifest();
        assert_eq!(manifest["protocol"], PROTOCOL_VERSION);
        assert_eq!(manifest["tools"][0]["name"], TOOL_NAME);
        assert_eq!(manifest["tools"][0]["inputSchema"]["required"][0], "png_base64");
    }

    #[test]
    fn test_response_serialization() {
        let value = serde_json::to_value(ToolResponse::ToolResult("{}".to_string())).unwrap();
        assert_eq!(value, json!({"type": "tool_result", "content": "{}"}));

        let value = serde_json::to_value(ToolResponse::ToolError("bad".to_string())).unwrap();
        assert_eq!(value, json!({"type": "tool_error", "content": "bad"}));
    }

    #[tokio::test]
    async fn test_serve_session() {
        // "cG5n" = base64("png")
        let input = concat!(
            r#"{"type":"tool_call","name":"solve_from_png_base64","arguments":{"png_base64":"cG5n"}}"#,
            "\n\n",
            r#"{"type":"ping"}"#,
            "\n",
            "not json\n",
            r#"{"type":"tool_call","name":"solve_from_png_base64","arguments":{}}"#,
            "\n",
        );
        let mut output = Vec::new();

        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let lines = output_lines(&output);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["protocol"], PROTOCOL_VERSION);

        assert_eq!(lines[1]["type"], "tool_result");
        let result: SolveResult =
            serde_json::from_str(lines[1]["content"].as_str().unwrap()).unwrap();
        assert_eq!(result, SolveResult::new("B", "2+2=4"));

        assert_eq!(lines[2]["type"], "tool_error");
        assert_eq!(lines[3]["type"], "tool_error");
        assert!(lines[3]["content"].as_str().unwrap().contains("png_base64"));
    }

    #[tokio::test]
    async fn test_bad_base64_is_tool_error() {
        let line = r#"{"type":"tool_call","name":"solve_from_png_base64","arguments":{"png_base64":"!!!"}}"#;
        let response = server().handle_line(1, line).await.unwrap();
        assert!(matches!(response, ToolResponse::ToolError(msg) if msg.contains("Base64")));
    }

    #[tokio::test]
    async fn test_other_tool_is_ignored() {
        let line = r#"{"type":"tool_call","name":"other_tool","arguments":{}}"#;
        assert!(server().handle_line(1, line).await.is_none());
    }
}
