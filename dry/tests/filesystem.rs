use std::io::Write;
use std::path::PathBuf;

use dry::{LoadError, parse_from_file};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("files")
        .join(name)
}

#[test]
fn loads_and_parses_a_file() {
    let doc = parse_from_file(fixture("test_dry_parser.test.dry")).expect("parse failed");
    assert_eq!(doc.id, "test_dry_parser");
    assert_eq!(doc.doc_type.as_deref(), Some("test"));
    assert_eq!(doc.sections.len(), 4);
    assert_eq!(doc.sections[0].id, "test_dry_parser.new-id");
    assert_eq!(doc.sections[0].options.as_ref().unwrap().options.len(), 6);
}

#[test]
fn fixture_details() {
    let doc = parse_from_file(fixture("test_dry_parser.test.dry")).unwrap();

    assert_eq!(doc.property("title").unwrap(), "The Test Scene");
    assert_eq!(doc.property("newPage").unwrap(), "true");
    assert_eq!(
        doc.property("onArrival").unwrap(),
        "{!\n  Q.visits = (Q.visits || 0) + 1;\n!}"
    );
    assert_eq!(
        doc.content,
        "This is the opening text of the scene.\nIt runs over two lines.\n\nAnd this is a second paragraph."
    );

    let new_id = doc.section("new-id").unwrap();
    let block = new_id.options.as_ref().unwrap();
    assert_eq!(block.property("countVisits").unwrap(), "true");
    let third = block.get("@third").unwrap();
    assert_eq!(third.view_if.as_ref().unwrap(), "visits > 2");
    assert_eq!(third.title.as_ref().unwrap(), "The third option");
    let door = block.get("@..other.place").unwrap();
    assert_eq!(door.view_if.as_ref().unwrap(), "{! return Q.door_open; !}");
    assert_eq!(door.title.as_ref().unwrap(), "Through the door");

    let second = doc.section("second").unwrap();
    assert_eq!(second.property("title").unwrap(), "Second and its continuation");
    assert_eq!(second.content, "Another short section.");
}

#[test]
fn fails_if_the_file_is_not_there() {
    let err = parse_from_file(fixture("not-a-file.type.dry")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.as_parse_error().is_none());
}

#[test]
fn parse_errors_come_through_with_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.scene.dry");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "title: Broken\nnot a property").unwrap();

    let err = parse_from_file(&path).unwrap_err();
    let parse = err.as_parse_error().expect("parse error");
    assert_eq!(parse.line, Some(2));
    assert_eq!(parse.path, path.to_string_lossy());
    assert!(err.to_string().ends_with("line 2: Invalid property definition."));
}

#[test]
fn read_source_shares_the_load_error() {
    let text = dry::read_source(fixture("test_dry_parser.test.dry")).unwrap();
    assert!(text.starts_with("title: The Test Scene"));

    let err = dry::read_source(fixture("not-a-file.type.dry")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().starts_with("cannot read '"));
}
