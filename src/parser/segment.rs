//! 行分类与分段
//!
//! 每一行只识别一次，打上标记后再按区域切分为题干行和选项行。
//! 区域切换是单向的：一旦遇到选项起始行，后续所有行都属于选项区。

use super::label::{recognize, LabelMatch};

/// OCR 文本按行拆分后的结果：去除首尾空白，丢弃空行，保持原有顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawText<'a> {
    lines: Vec<&'a str>,
}

impl<'a> RawText<'a> {
    pub fn from_ocr(text: &'a str) -> Self {
        let lines = text
            .split(is_line_break)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }
}

// tesseract 在页尾会输出换页符，这里和其它 Unicode 行分隔符一起当作换行处理
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n'
            | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// 单行的分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// 以选项标签开头
    ChoiceStart(LabelMatch),
    /// 普通行：在题干区是题干，在选项区是续行
    Plain,
}

/// 打上分类标记的行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine<'a> {
    pub text: &'a str,
    pub kind: LineKind,
}

impl<'a> TaggedLine<'a> {
    pub fn is_choice_start(&self) -> bool {
        matches!(self.kind, LineKind::ChoiceStart(_))
    }
}

/// 对每一行运行一次标签识别
pub fn classify_lines<'a>(raw: &RawText<'a>) -> Vec<TaggedLine<'a>> {
    raw.lines()
        .iter()
        .map(|&text| TaggedLine {
            text,
            kind: match recognize(text) {
                Some(m) => LineKind::ChoiceStart(m),
                None => LineKind::Plain,
            },
        })
        .collect()
}

/// 分段结果：题干行与选项行（选项行保留分类标记，组装时不再重新识别）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments<'a> {
    pub question_lines: Vec<&'a str>,
    pub choice_lines: Vec<TaggedLine<'a>>,
}

/// 按区域切分已分类的行
pub fn segment<'a>(tagged: Vec<TaggedLine<'a>>) -> Segments<'a> {
    let mut segments = Segments::default();
    let mut in_choice_region = false;

    for line in tagged {
        if line.is_choice_start() {
            in_choice_region = true;
        }
        if in_choice_region {
            segments.choice_lines.push(line);
        } else {
            segments.question_lines.push(line.text);
        }
    }

    segments
}
