use crate::document::Value;
use crate::options::OptionEntry;
use crate::parser::error::ErrorKind;
use crate::parser::grammar::{
    MAGIC_CLOSE, MAGIC_OPEN, OPTION_ID_REGEX, PROPERTY_REGEX, SECTION_SIGIL, TAG_SIGIL,
};
use crate::parser::reader::normalize;

/// What a hyphenated line in an options block turned out to be.
#[derive(Debug)]
pub(crate) enum OptionLine {
    Entry(OptionEntry),
    Property { name: String, value: Value },
}

/// Classify the full text of one hyphenated item (hyphen removed, continuation
/// lines already joined). `Err` carries the kind of the failure; the message is
/// always the invalid-definition one.
pub(crate) fn parse(text: &str, line: usize) -> Result<OptionLine, ErrorKind> {
    if text.starts_with([SECTION_SIGIL, TAG_SIGIL]) {
        return parse_entry(text, line).map(OptionLine::Entry);
    }

    let caps = PROPERTY_REGEX.captures(text).ok_or(ErrorKind::Grammar)?;
    Ok(OptionLine::Property {
        name: caps["name"].to_string(),
        value: Value::new(normalize(&caps["value"]), line),
    })
}

fn parse_entry(text: &str, line: usize) -> Result<OptionEntry, ErrorKind> {
    let Some(caps) = OPTION_ID_REGEX.captures(text) else {
        return Err(if is_qualified_tag(text) {
            ErrorKind::Structure
        } else {
            ErrorKind::Grammar
        });
    };

    let id = caps["id"].to_string();
    let rest = caps["rest"].trim();

    let (condition, title) = if let Some(title) = rest.strip_prefix(':') {
        (None, Some(title))
    } else if let Some(clause) = strip_keyword(rest, "if") {
        match split_at_colon(clause) {
            Some((condition, title)) => (Some(condition), Some(title)),
            None => (Some(clause), None),
        }
    } else if rest.is_empty() {
        (None, None)
    } else {
        return Err(ErrorKind::Grammar);
    };

    Ok(OptionEntry {
        id,
        title: non_empty(title, line)?,
        view_if: non_empty(condition, line)?,
        line,
    })
}

/// `#foo.bar`: looks like a tag but has more than one segment.
fn is_qualified_tag(text: &str) -> bool {
    text.strip_prefix(TAG_SIGIL)
        .and_then(|tag| tag.split_whitespace().next())
        .is_some_and(|tag| tag.split(':').next().is_some_and(|t| t.contains('.')))
}

/// `if <rest>` -> `<rest>`. The keyword must be followed by whitespace.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then_some(rest)
}

/// Split on the first colon that is not inside a magic block.
fn split_at_colon(text: &str) -> Option<(&str, &str)> {
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with(MAGIC_OPEN) {
            let body = i + MAGIC_OPEN.len();
            i = match text[body..].find(MAGIC_CLOSE) {
                Some(close) => body + close + MAGIC_CLOSE.len(),
                None => return None,
            };
            continue;
        }
        if rest.starts_with(':') {
            return Some((&text[..i], &text[i + 1..]));
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn non_empty(text: Option<&str>, line: usize) -> Result<Option<Value>, ErrorKind> {
    match text {
        None => Ok(None),
        Some(text) => {
            let text = normalize(text);
            if text.is_empty() {
                Err(ErrorKind::Grammar)
            } else {
                Ok(Some(Value::new(text, line)))
            }
        }
    }
}
