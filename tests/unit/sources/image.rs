use super::*;
use crate::test_support::png_bytes;

#[test]
fn search_response_takes_the_first_element() {
    let body = r#"[
        {"id":"a1","url":"https://cdn2.thecatapi.com/images/a1.jpg","width":1200,"height":800},
        {"id":"b2","url":"https://cdn2.thecatapi.com/images/b2.jpg","width":10,"height":10}
    ]"#;
    let image = parse_search_response(body).unwrap();
    assert_eq!(image.id, "a1");
    assert_eq!(image.url, "https://cdn2.thecatapi.com/images/a1.jpg");
    assert_eq!((image.width, image.height), (1200, 800));
}

#[test]
fn search_response_tolerates_missing_dimensions_and_extra_fields() {
    let body = r#"[{"id":"x","url":"https://e/x.gif","breeds":[]}]"#;
    let image = parse_search_response(body).unwrap();
    assert_eq!((image.width, image.height), (0, 0));
}

#[test]
fn empty_search_response_is_a_fetch_error() {
    let err = parse_search_response("[]").unwrap_err();
    assert!(matches!(err, MemeError::ImageFetch(_)));
}

#[test]
fn malformed_search_response_is_a_fetch_error() {
    for body in ["", "{}", "null", r#"[{"id":1}]"#] {
        let err = parse_search_response(body).unwrap_err();
        assert!(matches!(err, MemeError::ImageFetch(_)), "{body}: {err}");
    }
}

#[tokio::test]
async fn local_source_loads_and_decodes_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabby.png");
    std::fs::write(&path, png_bytes(6, 4, [10, 20, 30, 255])).unwrap();

    let source = LocalImageSource::new(&path);
    let loaded = load_random_image(&source).await.unwrap();
    assert_eq!(loaded.source.id, "tabby");
    assert!(loaded.source.url.starts_with("file://"));
    assert_eq!((loaded.source.width, loaded.source.height), (6, 4));
    assert_eq!((loaded.pixels.width, loaded.pixels.height), (6, 4));
    assert_eq!(&loaded.pixels.rgba8_premul[..4], &[10, 20, 30, 255]);
}

#[tokio::test]
async fn missing_local_file_is_a_fetch_error() {
    let source = LocalImageSource::new("no/such/cat.png");
    let err = load_random_image(&source).await.unwrap_err();
    assert!(matches!(err, MemeError::ImageFetch(_)));
}

#[tokio::test]
async fn undecodable_local_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, png_bytes(2, 2, [0, 0, 0, 255])).unwrap();
    let source = LocalImageSource::new(&path);
    let meta = source.request_random_image().await.unwrap();

    std::fs::write(&path, b"\x89PNG not really").unwrap();
    let bytes = source.load_bytes(&meta).await.unwrap();
    let err = crate::assets::decode::decode_image(&bytes).unwrap_err();
    assert!(matches!(err, MemeError::ImageLoad(_)));
}
