//! Lexical rules of the DRY format.
//!
//! Everything here is fixed at compile time; the regexes are compiled once on
//! first use and shared by every parse.

use once_cell::sync::Lazy;
use regex::Regex;

/// Property names that collide with node fields.
pub const RESERVED_NAMES: &[&str] = &["id", "sections", "options", "content"];

pub const MAGIC_OPEN: &str = "{!";
pub const MAGIC_CLOSE: &str = "!}";

pub const SECTION_SIGIL: char = '@';
pub const TAG_SIGIL: char = '#';
pub const OPTION_MARKER: char = '-';

/// A single id segment.
const SEGMENT: &str = r"[A-Za-z0-9_-]+";

/// Absolute, possibly dot-qualified id.
pub(crate) static ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{SEGMENT}(?:\.{SEGMENT})*$")).unwrap());

/// `name: value`. The name may be hyphenated; the value is everything after the
/// first colon.
pub(crate) static PROPERTY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<name>[A-Za-z_][A-Za-z0-9_-]*)\s*:(?P<value>.*)$").unwrap()
});

/// The id or tag at the start of an option entry, and whatever follows it.
/// A tag is a single segment; a reference id may be qualified and may start
/// with relative dots.
pub(crate) static OPTION_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s)^(?P<id>@\.*{SEGMENT}(?:\.{SEGMENT})*|#{SEGMENT})(?P<rest>(?:[\s:].*)?)$"
    ))
    .unwrap()
});

pub fn is_valid_id(id: &str) -> bool {
    ID_REGEX.is_match(id)
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Continuation lines start with whitespace.
pub fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// `prop-one` -> `propOne`. Names without hyphens are returned unchanged.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Whether a magic block is still open after reading `text`, given whether
/// one was already open before it.
pub fn magic_open_after(text: &str, mut open: bool) -> bool {
    let mut rest = text;
    loop {
        let marker = if open { MAGIC_CLOSE } else { MAGIC_OPEN };
        let Some(at) = rest.find(marker) else {
            return open;
        };
        rest = &rest[at + marker.len()..];
        open = !open;
    }
}
