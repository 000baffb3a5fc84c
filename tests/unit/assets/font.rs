use super::*;

#[test]
fn empty_database_has_no_display_face() {
    let db = fontdb::Database::new();
    assert!(query_display_face(&db).is_none());
}

#[test]
fn missing_font_file_is_a_font_error() {
    let err = FontSource::File(PathBuf::from("does/not/exist.ttf"))
        .resolve()
        .unwrap_err();
    assert!(matches!(err, MemeError::Font(_)), "{err}");
}

#[test]
fn empty_font_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Empty.ttf");
    std::fs::write(&path, b"").unwrap();

    let err = FontSource::File(path).resolve().unwrap_err();
    assert!(err.to_string().contains("is empty"));
}

#[test]
fn file_source_uses_file_stem_as_family() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Meme-Bold.ttf");
    std::fs::write(&path, b"\0\x01\0\0").unwrap();

    let font = FontSource::File(path).resolve().unwrap();
    assert_eq!(font.family, "Meme-Bold");
    assert_eq!(font.index, 0);
    assert_eq!(font.bytes.len(), 4);
}

#[test]
fn system_lookup_prefers_bold_faces_when_fonts_exist() {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let Some(font) = query_display_face(&db) else {
        eprintln!("skipping font-dependent test: no system fonts");
        return;
    };
    assert!(!font.bytes.is_empty());
    assert!(!font.family.trim().is_empty());
}
