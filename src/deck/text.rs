use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 零寬空白，文字框清空時保留框的高度
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub foreground: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, TextStyle::default())
    }
}

/// 形狀內的文字，由多段不同樣式的 run 組成。
///
/// 所有修改都以區間替換完成，周圍文字的樣式不會改變。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    pub runs: Vec<TextRun>,
}

impl TextBody {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(vec![TextRun::plain(content)])
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.plain_text().contains(needle)
    }

    /// 只有空白或零寬空白
    pub fn is_blank(&self) -> bool {
        self.runs
            .iter()
            .flat_map(|r| r.content.chars())
            .all(|c| c.is_whitespace() || c == ZERO_WIDTH_SPACE)
    }

    /// 以 `replacement` 取代 `range`（位元組位置，以 `plain_text()` 為準）。
    /// 新文字沿用區間起點所在 run 的樣式。
    pub fn replace_range(&mut self, range: Range<usize>, replacement: &str) {
        let mut offset = 0;
        let mut inserted = false;

        for run in &mut self.runs {
            let run_start = offset;
            let run_end = offset + run.content.len();
            offset = run_end;

            let lo = range.start.max(run_start);
            let hi = range.end.min(run_end);
            let owns_start = !inserted && range.start >= run_start && range.start < run_end;

            if owns_start {
                run.content
                    .replace_range(lo - run_start..hi - run_start, replacement);
                inserted = true;
            } else if lo < hi {
                run.content.replace_range(lo - run_start..hi - run_start, "");
            }
        }

        if !inserted && !replacement.is_empty() {
            self.append(replacement);
        }

        if self.runs.iter().any(|r| !r.content.is_empty()) {
            self.runs.retain(|r| !r.content.is_empty());
        } else {
            // 保留第一段的樣式給之後附加的文字
            self.runs.truncate(1);
        }
    }

    /// 取代所有出現的 `token`，回傳取代次數
    pub fn replace_all(&mut self, token: &str, value: &str) -> usize {
        if token.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut from = 0;
        loop {
            let text = self.plain_text();
            let Some(pos) = text[from..].find(token) else {
                break;
            };
            let start = from + pos;
            self.replace_range(start..start + token.len(), value);
            from = start + value.len();
            count += 1;
        }
        count
    }

    /// 附加到最後一段 run，沿用其樣式
    pub fn append(&mut self, text: &str) {
        match self.runs.last_mut() {
            Some(last) => last.content.push_str(text),
            None => self.runs.push(TextRun::plain(text)),
        }
    }
}
