use std::ops::Range;

use log::{debug, trace};

use crate::document::DocumentNode;
use crate::options::OptionsBlock;
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::filename::FileIdentity;
use crate::parser::grammar::{
    OPTION_MARKER, PROPERTY_REGEX, SECTION_SIGIL, TAG_SIGIL, camel_case, is_blank,
    is_indented, is_reserved, is_valid_id,
};
use crate::parser::option_line::{self, OptionLine};
use crate::parser::reader::ValueReader;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse the body of a DRY file into its document tree.
pub fn parse_document(
    path: &str,
    source: &str,
    file_id: usize,
    identity: FileIdentity,
) -> Result<DocumentNode, ParseError> {
    let lines = split_lines(source);
    let ctx = Context {
        path,
        file_id,
        root_id: &identity.id,
    };

    let mut root = DocumentNode::new(identity.id.clone());
    root.doc_type = identity.doc_type;

    let consumed = parse_node(&ctx, &mut root, Scope::File, &lines)?;
    debug_assert_eq!(consumed, lines.len());
    Ok(root)
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Line<'a> {
    /// 1-based.
    number: usize,
    text: &'a str,
    span: Range<usize>,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        is_blank(self.text)
    }

    fn starts_section(&self) -> bool {
        self.text.starts_with(SECTION_SIGIL)
    }
}

fn split_lines(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for (index, raw) in source.split('\n').enumerate() {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        lines.push(Line {
            number: index + 1,
            text,
            span: offset..offset + text.len(),
        });
        offset += raw.len() + 1;
    }
    lines
}

// ---------------------------------------------------------------------------
// Node parsing
// ---------------------------------------------------------------------------

struct Context<'a> {
    path: &'a str,
    file_id: usize,
    root_id: &'a str,
}

impl Context<'_> {
    fn error(&self, kind: ErrorKind, message: impl Into<String>, line: &Line<'_>) -> ParseError {
        self.error_at(kind, message, line.number, line.span.clone())
    }

    fn error_at(
        &self,
        kind: ErrorKind,
        message: impl Into<String>,
        line: usize,
        span: Range<usize>,
    ) -> ParseError {
        ParseError::at_line(kind, message, self.path, line, span, self.file_id)
    }
}

/// Which node is being built. Only the file collects sections; a section
/// ends where the next one begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    File,
    Section,
}

/// Fill `node` from `lines` and return how many lines were consumed.
///
/// For a section this stops at the next `@` line. For the file, every `@` line
/// opens a child section parsed by the same procedure.
fn parse_node(
    ctx: &Context<'_>,
    node: &mut DocumentNode,
    scope: Scope,
    lines: &[Line<'_>],
) -> Result<usize, ParseError> {
    let mut machine = NodeMachine::new(ctx, scope);
    let mut index = 0;
    let mut prev_blank = false;

    while index < lines.len() {
        let line = &lines[index];
        if machine.feed(node, line, prev_blank)? == Flow::EndOfNode {
            break;
        }
        prev_blank = line.is_blank();
        index += 1;
    }
    machine.finish(node)?;

    if scope == Scope::Section {
        return Ok(index);
    }

    while index < lines.len() {
        let header = &lines[index];
        let local_id = section_id(ctx, node, header)?;
        debug!("{}: section '{}' at line {}", ctx.path, local_id, header.number);

        let mut section = DocumentNode::new(format!("{}.{}", node.id, local_id));
        let consumed = parse_node(ctx, &mut section, Scope::Section, &lines[index + 1..])?;
        node.sections.push(section);
        index += consumed + 1;
    }

    Ok(index)
}

/// Validate the id on a `@` line against the file id and earlier siblings.
fn section_id<'a>(
    ctx: &Context<'_>,
    parent: &DocumentNode,
    header: &Line<'a>,
) -> Result<&'a str, ParseError> {
    let local_id = header.text[SECTION_SIGIL.len_utf8()..].trim_end();

    if !is_valid_id(local_id) {
        return Err(ctx.error(
            ErrorKind::Naming,
            format!("Malformed id '{local_id}' (use letters, numbers, _ and - only)."),
            header,
        ));
    }
    if local_id == ctx.root_id {
        return Err(ctx.error(
            ErrorKind::Naming,
            format!("Section can't use the file id '{local_id}'."),
            header,
        ));
    }
    if parent.section(local_id).is_some() {
        return Err(ctx.error(
            ErrorKind::Naming,
            format!("Section with id '{local_id}' already defined."),
            header,
        ));
    }

    Ok(local_id)
}

// ---------------------------------------------------------------------------
// Per-node state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Properties,
    Content,
    Options,
    /// After the options block; only blank lines or a new section may follow.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    EndOfNode,
}

/// A value still collecting continuation lines.
#[derive(Debug)]
enum Pending {
    Property { name: String, reader: ValueReader, span: Range<usize> },
    OptionItem { reader: ValueReader, span: Range<usize> },
}

impl Pending {
    fn reader_mut(&mut self) -> &mut ValueReader {
        match self {
            Pending::Property { reader, .. } | Pending::OptionItem { reader, .. } => reader,
        }
    }

    fn reader(&self) -> &ValueReader {
        match self {
            Pending::Property { reader, .. } | Pending::OptionItem { reader, .. } => reader,
        }
    }
}

struct NodeMachine<'c, 's> {
    ctx: &'c Context<'c>,
    scope: Scope,
    phase: Phase,
    pending: Option<Pending>,
    content: Vec<&'s str>,
}

impl<'c, 's> NodeMachine<'c, 's> {
    fn new(ctx: &'c Context<'c>, scope: Scope) -> Self {
        NodeMachine {
            ctx,
            scope,
            phase: Phase::Properties,
            pending: None,
            content: Vec::new(),
        }
    }

    /// Consume one line. `prev_blank` is whether the line before it was blank,
    /// which decides if a leading hyphen opens the options block.
    fn feed(
        &mut self,
        node: &mut DocumentNode,
        line: &Line<'s>,
        prev_blank: bool,
    ) -> Result<Flow, ParseError> {
        // An open magic block takes every line until it closes.
        if let Some(pending) = &mut self.pending {
            if pending.reader().in_magic() {
                pending.reader_mut().push_line(line.text);
                return Ok(Flow::Continue);
            }
        }

        if line.starts_section() {
            self.flush(node)?;
            return Ok(Flow::EndOfNode);
        }

        match self.phase {
            Phase::Properties => self.feed_property(node, line)?,
            Phase::Content => {
                if prev_blank && line.text.starts_with(OPTION_MARKER) {
                    trace!("{}: options block at line {}", self.ctx.path, line.number);
                    self.phase = Phase::Options;
                    node.options = Some(OptionsBlock::new());
                    self.start_option_item(line);
                } else {
                    self.content.push(line.text);
                }
            }
            Phase::Options => self.feed_option(node, line)?,
            Phase::Closed => {
                if !line.is_blank() {
                    return Err(self.ctx.error(
                        ErrorKind::Structure,
                        "Found content after an options block.",
                        line,
                    ));
                }
            }
        }

        Ok(Flow::Continue)
    }

    fn feed_property(&mut self, node: &mut DocumentNode, line: &Line<'_>) -> Result<(), ParseError> {
        if line.is_blank() {
            self.flush(node)?;
            self.phase = Phase::Content;
            return Ok(());
        }

        if is_indented(line.text) {
            if let Some(pending) = &mut self.pending {
                pending.reader_mut().push_line(line.text);
                return Ok(());
            }
        }

        let Some(caps) = PROPERTY_REGEX.captures(line.text) else {
            return Err(self.ctx.error(
                ErrorKind::Grammar,
                "Invalid property definition.",
                line,
            ));
        };

        self.flush(node)?;
        let name = camel_case(&caps["name"]);
        self.check_name(&name, line.number, line.span.clone(), |name| {
            node.properties.contains(name)
                || (self.scope == Scope::File && name == "type" && node.doc_type.is_some())
        })?;

        self.pending = Some(Pending::Property {
            name,
            reader: ValueReader::new(&caps["value"], line.number),
            span: line.span.clone(),
        });
        Ok(())
    }

    fn feed_option(&mut self, node: &mut DocumentNode, line: &Line<'_>) -> Result<(), ParseError> {
        if line.is_blank() {
            self.flush(node)?;
            trace!("{}: options block closed at line {}", self.ctx.path, line.number);
            self.phase = Phase::Closed;
            return Ok(());
        }

        if is_indented(line.text) {
            if let Some(pending) = &mut self.pending {
                pending.reader_mut().push_line(line.text);
                return Ok(());
            }
        }

        if line.text.starts_with(OPTION_MARKER) {
            self.flush(node)?;
            self.start_option_item(line);
            Ok(())
        } else if line.text.starts_with(TAG_SIGIL) {
            // Comment.
            self.flush(node)
        } else {
            Err(self.ctx.error(
                ErrorKind::Grammar,
                "Hyphens are required in an option block.",
                line,
            ))
        }
    }

    fn start_option_item(&mut self, line: &Line<'_>) {
        let text = &line.text[OPTION_MARKER.len_utf8()..];
        self.pending = Some(Pending::OptionItem {
            reader: ValueReader::new(text, line.number),
            span: line.span.clone(),
        });
    }

    /// Reserved and duplicate name checks shared by node and options properties.
    fn check_name(
        &self,
        name: &str,
        line: usize,
        span: Range<usize>,
        is_defined: impl FnOnce(&str) -> bool,
    ) -> Result<(), ParseError> {
        if is_reserved(name) {
            return Err(self.ctx.error_at(
                ErrorKind::Naming,
                format!("Property '{name}' is a reserved name."),
                line,
                span,
            ));
        }
        if is_defined(name) {
            return Err(self.ctx.error_at(
                ErrorKind::Naming,
                format!("Property '{name}' is already defined."),
                line,
                span,
            ));
        }
        Ok(())
    }

    /// Store the pending value, if any.
    fn flush(&mut self, node: &mut DocumentNode) -> Result<(), ParseError> {
        match self.pending.take() {
            None => Ok(()),
            Some(Pending::Property { name, reader, .. }) => {
                let value = reader.finish();
                if self.scope == Scope::File && name == "type" {
                    node.doc_type = Some(value.into_string());
                    return Ok(());
                }
                node.properties.push(name, value);
                Ok(())
            }
            Some(Pending::OptionItem { reader, span }) => {
                let line = reader.line();
                let options = node.options.get_or_insert_with(OptionsBlock::new);
                match option_line::parse(reader.raw(), line) {
                    Ok(OptionLine::Entry(entry)) => {
                        if options.get(&entry.id).is_some() {
                            return Err(self.ctx.error_at(
                                ErrorKind::Structure,
                                format!("Option with id/tag '{}' already specified.", entry.id),
                                line,
                                span,
                            ));
                        }
                        options.options.push(entry);
                        Ok(())
                    }
                    Ok(OptionLine::Property { name, value }) => {
                        let name = camel_case(&name);
                        self.check_name(&name, line, span, |name| {
                            options.properties.contains(name)
                        })?;
                        options.properties.push(name, value);
                        Ok(())
                    }
                    Err(kind) => Err(self.ctx.error_at(
                        kind,
                        "Invalid property or option definition.",
                        line,
                        span,
                    )),
                }
            }
        }
    }

    /// Close the node: store the last pending value and assemble the content.
    fn finish(mut self, node: &mut DocumentNode) -> Result<(), ParseError> {
        if let Some(pending) = &self.pending {
            if pending.reader().in_magic() {
                let span = match pending {
                    Pending::Property { span, .. } | Pending::OptionItem { span, .. } => {
                        span.clone()
                    }
                };
                return Err(self.ctx.error_at(
                    ErrorKind::Grammar,
                    "Unterminated magic block.",
                    pending.reader().line(),
                    span,
                ));
            }
        }
        self.flush(node)?;
        node.content = join_paragraphs(&self.content);
        Ok(())
    }
}

/// Join content lines, dropping leading and trailing blank lines and
/// collapsing each run of blank lines to a single empty line.
fn join_paragraphs(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut gap = false;
    for line in lines {
        if is_blank(line) {
            gap = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if gap { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        gap = false;
    }
    out
}
