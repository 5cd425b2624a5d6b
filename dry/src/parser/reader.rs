use crate::document::value::{Segment, split_segments};
use crate::document::Value;
use crate::parser::grammar::magic_open_after;

/// Accumulates a value that may continue over several lines.
///
/// Outside a magic block each new line is trimmed and joined with a single
/// space. While a magic block is open, lines are appended verbatim after a
/// newline, so the code inside keeps its layout.
#[derive(Debug)]
pub(crate) struct ValueReader {
    raw: String,
    line: usize,
    /// Whether `raw` ends inside a magic block. Only appended text is scanned.
    in_magic: bool,
}

impl ValueReader {
    pub fn new(first: &str, line: usize) -> Self {
        let mut reader = ValueReader {
            raw: String::new(),
            line,
            in_magic: false,
        };
        reader.append(first.trim_start());
        reader
    }

    /// Line the value started on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether the next line belongs to an open magic block.
    pub fn in_magic(&self) -> bool {
        self.in_magic
    }

    pub fn push_line(&mut self, line: &str) {
        if self.in_magic {
            self.raw.push('\n');
            self.append(line);
            return;
        }

        let text = line.trim_start();
        if text.is_empty() {
            return;
        }
        if !self.raw.is_empty() {
            self.raw.push(' ');
        }
        self.append(text);
    }

    /// Trailing whitespace is dropped unless it belongs to an open magic block.
    fn append(&mut self, text: &str) {
        self.in_magic = magic_open_after(text, self.in_magic);
        let text = if self.in_magic { text } else { text.trim_end() };
        self.raw.push_str(text);
    }

    /// Text as accumulated, before magic/plain normalization.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn finish(self) -> Value {
        let line = self.line;
        Value::new(normalize(&self.raw), line)
    }
}

/// Trim plain text around magic blocks and join every piece with one space.
pub(crate) fn normalize(text: &str) -> String {
    let segments = split_segments(text);
    let mut out = String::with_capacity(text.len());
    for segment in segments {
        if !out.is_empty() {
            out.push(' ');
        }
        match segment {
            Segment::Text(text) | Segment::Magic(text) => out.push_str(text),
        }
    }
    out
}
