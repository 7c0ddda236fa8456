use serde::{Deserialize, Serialize};

/// 一个选项：规范化后的标签 + 选项正文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub body: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
        }
    }

    /// 把续行追加到正文末尾，用单个空格连接
    pub fn append_continuation(&mut self, line: &str) {
        let joined = format!("{} {}", self.body, line);
        self.body = joined.trim().to_string();
    }
}

/// 题干与选项的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub question: String,
    pub choices: Vec<Choice>,
}

impl ParsedQuestion {
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// 选项列表的文本形式，每行 `标签. 正文`
    pub fn choice_text(&self) -> Option<String> {
        if self.choices.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .choices
            .iter()
            .map(|c| format!("{}. {}", c.label, c.body))
            .collect();
        Some(lines.join("\n"))
    }
}

/// LLM 给出的回答
///
/// 两个字段始终存在：`answer_label` 可能为空串，`reason` 在最坏情况下是截断的原始文本。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResult {
    #[serde(default)]
    pub answer_label: String,
    #[serde(default)]
    pub reason: String,
}

impl SolveResult {
    pub fn new(answer_label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            answer_label: answer_label.into(),
            reason: reason.into(),
        }
    }

    /// 序列化为 JSON 字符串（不转义非 ASCII 字符）
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "answer_label": self.answer_label,
            "reason": self.reason,
        })
        .to_string()
    }

    /// 展示给用户的文本
    pub fn render(&self) -> String {
        format!("回答: {}\n\n根拠:\n{}", self.answer_label, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_continuation() {
        let mut choice = Choice::new("B", "4");
        choice.append_continuation("continued explanation");
        assert_eq!(choice.body, "4 continued explanation");

        let mut empty = Choice::new("C", "");
        empty.append_continuation("body on next line");
        assert_eq!(empty.body, "body on next line");
    }

    #[test]
    fn test_choice_text() {
        let parsed = ParsedQuestion {
            question: "1+1は？".to_string(),
            choices: vec![Choice::new("ア", "1"), Choice::new("イ", "2")],
        };
        assert_eq!(parsed.choice_text().as_deref(), Some("ア. 1\nイ. 2"));
        assert!(ParsedQuestion::default().choice_text().is_none());
    }

    #[test]
    fn test_solve_result_json_keeps_unicode() {
        let result = SolveResult::new("ウ", "光合成の説明");
        let json = result.to_json();
        assert!(json.contains("光合成"));

        let back: SolveResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_render() {
        let result = SolveResult::new("B", "2+2=4");
        assert_eq!(result.render(), "回答: B\n\n根拠:\n2+2=4");
    }
}
