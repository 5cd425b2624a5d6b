use dry::{ErrorKind, parse_from_content};

#[test]
fn can_begin_at_the_start_of_the_file() {
    let doc = parse_from_content("test.dry", "@foo").unwrap();
    assert_eq!(doc.content, "");
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].id, "test.foo");
    assert_eq!(doc.sections[0].local_id(), "foo");
}

#[test]
fn require_a_valid_id() {
    let err = parse_from_content("test.dry", "\nContent\n@foo$bar").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(
        err.to_string(),
        "test.dry line 3: Malformed id 'foo$bar' (use letters, numbers, _ and - only)."
    );
}

#[test]
fn begin_by_reading_properties() {
    let doc = parse_from_content("test.dry", "@foo\nsun:dock").unwrap();
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(doc.sections[0].id, "test.foo");
    assert_eq!(doc.sections[0].property("sun").unwrap(), "dock");
    assert_eq!(doc.sections[0].property("sun").unwrap().line(), 2);
}

#[test]
fn an_id_cannot_be_reused() {
    let err = parse_from_content("test.dry", "@foo\n@foo").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(
        err.to_string(),
        "test.dry line 2: Section with id 'foo' already defined."
    );
}

#[test]
fn an_id_cannot_match_the_file_id() {
    let err = parse_from_content("test.dry", "@test").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(
        err.to_string(),
        "test.dry line 1: Section can't use the file id 'test'."
    );
}

#[test]
fn sections_are_siblings_under_the_file() {
    let doc = parse_from_content(
        "story.scene.dry",
        "title: Root\n\nIntro.\n@one\ntitle: One\n\nFirst.\n\n- @two\n@two\n\nSecond.\n@three.sub",
    )
    .unwrap();

    assert_eq!(doc.content, "Intro.");
    let ids: Vec<&str> = doc.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["story.one", "story.two", "story.three.sub"]);
    assert!(doc.sections.iter().all(|s| s.sections.is_empty()));
    assert!(doc.sections.iter().all(|s| s.doc_type.is_none()));

    let one = doc.section("one").unwrap();
    assert_eq!(one.property("title").unwrap(), "One");
    assert_eq!(one.content, "First.");
    assert_eq!(one.options.as_ref().unwrap().options[0].id, "@two");

    assert_eq!(doc.section("two").unwrap().content, "Second.");
    assert_eq!(doc.section("three.sub").unwrap().local_id(), "sub");
    assert!(doc.section("missing").is_none());
}

#[test]
fn sections_share_the_properties_rules() {
    let err = parse_from_content("test.dry", "\nText\n@foo\nid: x").unwrap_err();
    assert_eq!(
        err.to_string(),
        "test.dry line 4: Property 'id' is a reserved name."
    );
}

#[test]
fn the_first_error_wins() {
    let err = parse_from_content("test.dry", "@foo\nbad line\n@foo").unwrap_err();
    assert_eq!(err.line, Some(2));
    assert_eq!(err.message, "Invalid property definition.");
}

#[test]
fn no_space_between_sigil_and_id() {
    let err = parse_from_content("test.dry", "@ foo\nsun: dock").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Naming);
    assert_eq!(
        err.to_string(),
        "test.dry line 1: Malformed id ' foo' (use letters, numbers, _ and - only)."
    );
}

#[test]
fn trailing_space_after_a_section_id_is_ignored() {
    let doc = parse_from_content("test.dry", "@foo  \nsun: dock").unwrap();
    assert_eq!(doc.sections[0].id, "test.foo");
}
