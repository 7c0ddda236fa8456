//! LLM 回复的兜底解析
//!
//! 先严格按 JSON 解析；失败则剥掉 ``` 代码块再试一次；
//! 还不行就用正则分别提取 `answer_label` 与 `reason`。任何输入都能得到结果。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::SolveResult;

/// 找不到 reason 时保留的原文字符数
pub const REASON_FALLBACK_CHARS: usize = 500;

static ANSWER_LABEL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""?answer_label"?\s*:\s*"([^"]+)""#).expect("answer_label pattern is valid")
});

static REASON_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"?reason"?\s*:\s*"([^"]+)""#).expect("reason pattern is valid")
});

/// 把 LLM 的原始回复规范化为 [`SolveResult`]
pub fn normalize_result(raw: &str) -> SolveResult {
    if let Some(map) = parse_object(raw) {
        return from_object(&map, raw.trim());
    }

    let cleaned = strip_code_fence(raw);
    if let Some(map) = parse_object(cleaned) {
        debug!("去除代码块标记后 JSON 解析成功");
        return from_object(&map, cleaned);
    }

    warn!("LLM 返回内容不是合法 JSON，使用正则兜底提取");
    let answer_label = ANSWER_LABEL_FIELD
        .captures(cleaned)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let reason = REASON_FIELD
        .captures(cleaned)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| truncate_chars(cleaned, REASON_FALLBACK_CHARS));

    SolveResult {
        answer_label,
        reason,
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn from_object(map: &Map<String, Value>, source: &str) -> SolveResult {
    SolveResult {
        answer_label: field_as_string(map, "answer_label").unwrap_or_default(),
        reason: field_as_string(map, "reason")
            .unwrap_or_else(|| truncate_chars(source, REASON_FALLBACK_CHARS)),
    }
}

// 数字等非字符串值按 JSON 文本输出，null 视为缺失
fn field_as_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 去掉包裹在外层的 ``` 代码块标记（首行可带语言名）
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let inner = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed.trim_start_matches('`'),
    };
    let inner = inner.trim_end();
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_passes_through() {
        let result = normalize_result(r#"{"answer_label": "B", "reason": "2+2=4"}"#);
        assert_eq!(result, SolveResult::new("B", "2+2=4"));
    }

    #[test]
    fn test_fenced_json() {
        let raw = "```json\n{\"answer_label\": \"C\", \"reason\": \"because...\"}\n```";
        assert_eq!(normalize_result(raw), SolveResult::new("C", "because..."));
    }

    #[test]
    fn test_fenced_multiline_json_without_language_tag() {
        let raw = "```\n{\n  \"answer_label\": \"ア\",\n  \"reason\": \"首都は東京\"\n}\n```";
        assert_eq!(normalize_result(raw), SolveResult::new("ア", "首都は東京"));
    }

    #[test]
    fn test_totally_unparseable_text() {
        let result = normalize_result("totally unparseable text");
        assert_eq!(result, SolveResult::new("", "totally unparseable text"));
    }

    #[test]
    fn test_regex_recovery_from_broken_json() {
        // 末尾多余逗号 + 未加引号的键
        let raw = "{answer_label: \"D\",\n reason: \"first line\nsecond line\",}";
        let result = normalize_result(raw);
        assert_eq!(result.answer_label, "D");
        assert_eq!(result.reason, "first line\nsecond line");
    }

    #[test]
    fn test_label_found_but_reason_missing() {
        let raw = "The answer is \"answer_label\": \"2\" and nothing else";
        let result = normalize_result(raw);
        assert_eq!(result.answer_label, "2");
        assert_eq!(result.reason, raw);
    }

    #[test]
    fn test_reason_fallback_is_truncated_by_chars() {
        let raw = "あ".repeat(REASON_FALLBACK_CHARS + 20);
        let result = normalize_result(&raw);
        assert_eq!(result.answer_label, "");
        assert_eq!(result.reason.chars().count(), REASON_FALLBACK_CHARS);
    }

    #[test]
    fn test_object_with_missing_or_non_string_fields() {
        let result = normalize_result(r#"{"answer_label": 3, "reason": null}"#);
        assert_eq!(result.answer_label, "3");
        assert_eq!(result.reason, r#"{"answer_label": 3, "reason": null}"#);

        let result = normalize_result(r#"{"reason": "no label"}"#);
        assert_eq!(result, SolveResult::new("", "no label"));
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let result = normalize_result("42");
        assert_eq!(result, SolveResult::new("", "42"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_result(""), SolveResult::default());
        assert_eq!(normalize_result("   \n"), SolveResult::default());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  plain  "), "plain");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
    }
}
