//! 解题上下文
//!
//! 封装"我正在处理第几次请求、图片从哪里来"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SolveCtx {
    /// 请求序号（从1开始）
    pub request_index: usize,
    /// 图片来源（文件路径、stdin、工具调用）
    pub source: String,
}

impl SolveCtx {
    pub fn new(request_index: usize, source: impl Into<String>) -> Self {
        Self {
            request_index,
            source: source.into(),
        }
    }
}

impl Display for SolveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[请求 #{} 来源 {}]", self.request_index, self.source)
    }
}
