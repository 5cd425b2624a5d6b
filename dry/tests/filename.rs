use dry::{ErrorKind, parse_from_content};

#[test]
fn requires_a_valid_id_component() {
    let err = parse_from_content("foo$bar.dry", "\ncontent").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Filename);
    assert_eq!(err.line, None);
    assert_eq!(err.to_string(), "Cannot extract id or type from filename.");
}

#[test]
fn sets_the_id() {
    let doc = parse_from_content("test.dry", "prop: foo").unwrap();
    assert_eq!(doc.id, "test");
}

#[test]
fn sets_a_nested_id() {
    let doc = parse_from_content("foo.bar.type.dry", "prop: foo").unwrap();
    assert_eq!(doc.id, "foo.bar");
    assert_eq!(doc.doc_type.as_deref(), Some("type"));
}

#[test]
fn sets_the_type_if_given() {
    let doc = parse_from_content("test.type.dry", "prop: foo").unwrap();
    assert_eq!(doc.id, "test");
    assert_eq!(doc.doc_type.as_deref(), Some("type"));
}

#[test]
fn no_type_if_not_given() {
    let doc = parse_from_content("test.dry", "prop: foo").unwrap();
    assert_eq!(doc.id, "test");
    assert_eq!(doc.doc_type, None);
}

#[test]
fn copes_with_full_paths() {
    let doc = parse_from_content("/tmp/foo/test.type.dry", "prop: foo").unwrap();
    assert_eq!(doc.id, "test");
    assert_eq!(doc.doc_type.as_deref(), Some("type"));
}

#[test]
fn copes_with_any_extension() {
    let doc = parse_from_content("test.type.bar", "prop: foo").unwrap();
    assert_eq!(doc.id, "test");
    assert_eq!(doc.doc_type.as_deref(), Some("type"));
}

#[test]
fn rejects_names_without_an_extension() {
    let err = parse_from_content("test", "prop: foo").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Filename);

    let err = parse_from_content("test.", "prop: foo").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Filename);
}

#[test]
fn rejects_a_bad_type_segment() {
    let err = parse_from_content("test.ty pe.dry", "prop: foo").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Filename);
}

#[test]
fn resolver_is_usable_directly() {
    let identity = dry::parser::filename::resolve("scenes/a-b_c.d.e.scene.dry").unwrap();
    assert_eq!(identity.id, "a-b_c.d.e");
    assert_eq!(identity.doc_type.as_deref(), Some("scene"));
}
