use dry::parse_from_content;

fn content(text: &str) -> String {
    parse_from_content("test.dry", text).expect("parse failed").content
}

#[test]
fn multiple_paragraphs() {
    assert_eq!(content("\nfoo\n\nbar"), "foo\n\nbar");
}

#[test]
fn apparent_continuation_lines_are_text() {
    assert_eq!(content("\nfoo\n\tbar"), "foo\n\tbar");
}

#[test]
fn apparent_option_lines_are_text() {
    assert_eq!(content("\nfoo\n- bar"), "foo\n- bar");
}

#[test]
fn apparent_property_lines_are_text() {
    assert_eq!(content("\nfoo\nbar: foo"), "foo\nbar: foo");
}

#[test]
fn ends_when_a_new_section_id_is_given() {
    let doc = parse_from_content("test.dry", "\nfoo\n@bar").unwrap();
    assert_eq!(doc.content, "foo");
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].id, "test.bar");
}

#[test]
fn ends_when_an_options_block_is_given() {
    let doc = parse_from_content("test.dry", "\nfoo\n\n- @bar").unwrap();
    assert_eq!(doc.content, "foo");
    let options = doc.options.expect("options block");
    assert_eq!(options.len(), 1);
    assert_eq!(options.options[0].id, "@bar");
}

#[test]
fn extra_blank_lines_collapse() {
    assert_eq!(content("\nfoo\n\n\nbar"), "foo\n\nbar");
    assert_eq!(content("\nfoo\n \n\t\n\nbar"), "foo\n\nbar");
}

#[test]
fn leading_and_trailing_blank_lines_are_dropped() {
    assert_eq!(content("\nfoo\n\nbar\n\n\n"), "foo\n\nbar");
    assert_eq!(content("\n\n\nfoo"), "foo");
}

#[test]
fn empty_when_options_come_first() {
    let doc = parse_from_content("test.dry", "\n- @bar").unwrap();
    assert_eq!(doc.content, "");
    let options = doc.options.expect("options block");
    assert_eq!(options.len(), 1);
    assert_eq!(options.options[0].id, "@bar");
}

#[test]
fn empty_document() {
    let doc = parse_from_content("test.dry", "").unwrap();
    assert_eq!(doc.content, "");
    assert!(doc.properties.is_empty());
    assert!(doc.options.is_none());
    assert!(doc.sections.is_empty());
}

#[test]
fn crlf_line_endings() {
    let doc = parse_from_content("test.dry", "prop: foo\r\n\r\nfoo\r\n\r\nbar\r\n").unwrap();
    assert_eq!(doc.property("prop").unwrap(), "foo");
    assert_eq!(doc.content, "foo\n\nbar");
}
