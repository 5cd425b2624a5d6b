use std::fmt;

use serde::Serialize;

use crate::parser::grammar::{MAGIC_CLOSE, MAGIC_OPEN};

/// A raw property, title or condition string together with the 1-based line
/// it was read from.
///
/// The text is kept exactly as the reader assembled it, including any magic
/// blocks, so that a downstream evaluator can attribute errors in embedded code
/// back to the source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    text: String,
    line: usize,
}

/// One piece of a value: plain text or a verbatim magic block (markers included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Magic(&'a str),
}

impl Value {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Value {
            text: text.into(),
            line,
        }
    }

    /// The plain value.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// True when the whole value is a single magic block.
    pub fn is_magic(&self) -> bool {
        matches!(self.segments().as_slice(), [Segment::Magic(_)])
    }

    /// Split the value into plain-text and magic segments, in source order.
    ///
    /// Plain segments are returned trimmed; empty ones are dropped. An
    /// unterminated magic block runs to the end of the text.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        split_segments(&self.text)
    }
}

pub(crate) fn split_segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(MAGIC_OPEN) {
            Some(start) => {
                push_text(&mut segments, &rest[..start]);
                let body = &rest[start + MAGIC_OPEN.len()..];
                let end = body
                    .find(MAGIC_CLOSE)
                    .map(|p| start + MAGIC_OPEN.len() + p + MAGIC_CLOSE.len())
                    .unwrap_or(rest.len());
                segments.push(Segment::Magic(&rest[start..end]));
                rest = &rest[end..];
            }
            None => {
                push_text(&mut segments, rest);
                break;
            }
        }
    }

    segments
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Value {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
