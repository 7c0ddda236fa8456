//! 题目文本结构化
//!
//! 把 OCR 得到的嘈杂文本拆成题干和有序选项列表，并把 LLM 的回复规范化。
//! 这里的函数都是纯函数：不做 I/O，不会失败。

pub mod assemble;
pub mod label;
pub mod normalize;
pub mod segment;

pub use assemble::{assemble_choices, join_question};
pub use label::{normalize_label, recognize, LabelMatch};
pub use normalize::{normalize_result, strip_code_fence};
pub use segment::{classify_lines, segment, LineKind, RawText, Segments, TaggedLine};

use crate::models::ParsedQuestion;

/// 解析 OCR 文本，得到题干与选项
pub fn parse_question_choices(raw_text: &str) -> ParsedQuestion {
    let raw = RawText::from_ocr(raw_text);
    let segments = segment(classify_lines(&raw));

    ParsedQuestion {
        question: join_question(&segments.question_lines),
        choices: assemble_choices(&segments.choice_lines),
    }
}
