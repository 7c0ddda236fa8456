//! 选项标签识别
//!
//! 判断一行是否以选项标签开头（ア/イ/ウ/エ、A-D、a-d、1-9、①-④），
//! 标签后必须紧跟一个分隔符：右括号、半角/全角句点或空白。

use std::sync::LazyLock;

use regex::Regex;

static CHOICE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ア|イ|ウ|エ|[A-Da-d]|[1-9]|①|②|③|④)(?:[)）.．]|\s)")
        .expect("choice label pattern is valid")
});

/// 一次成功的标签匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatch {
    /// 规范化后的标签
    pub label: String,
    /// 分隔符之后的字节偏移，正文从这里开始
    pub rest_offset: usize,
}

impl LabelMatch {
    /// 取出该行在分隔符之后的正文（已去除首尾空白）
    pub fn body<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.rest_offset..).unwrap_or("").trim()
    }
}

/// 识别一行是否为选项起始行
pub fn recognize(line: &str) -> Option<LabelMatch> {
    let caps = CHOICE_START.captures(line)?;
    let raw_label = caps.get(1)?.as_str();
    let whole = caps.get(0)?;
    Some(LabelMatch {
        label: normalize_label(raw_label),
        rest_offset: whole.end(),
    })
}

/// 标签规范化：去掉尾部的分隔符与空白，再转为大写
///
/// 大写只影响拉丁字母；对假名、数字、圈号数字无影响。重复调用结果不变。
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| matches!(c, ')' | '）' | '.' | '．') || c.is_whitespace())
        .to_uppercase()
}
