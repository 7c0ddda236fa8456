use crate::models::Choice;

use super::segment::{LineKind, TaggedLine};

/// 把选项行组装成有序的选项列表
///
/// 续行拼接到上一个选项的正文；在任何选项之前出现的续行直接丢弃。
pub fn assemble_choices(choice_lines: &[TaggedLine<'_>]) -> Vec<Choice> {
    let mut choices: Vec<Choice> = Vec::new();

    for line in choice_lines {
        match &line.kind {
            LineKind::ChoiceStart(m) => {
                choices.push(Choice::new(m.label.clone(), m.body(line.text)));
            }
            LineKind::Plain => {
                if let Some(last) = choices.last_mut() {
                    last.append_continuation(line.text);
                }
            }
        }
    }

    choices
}

/// 题干行以换行连接后去除首尾空白
pub fn join_question(question_lines: &[&str]) -> String {
    question_lines.join("\n").trim().to_string()
}
