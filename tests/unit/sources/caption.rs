use super::*;

#[test]
fn parses_both_fields() {
    let c = parse_caption(r#"{"top":"I FITS","bottom":"I SITS"}"#).unwrap();
    assert_eq!(c, CaptionPair::new("I FITS", "I SITS"));
}

#[test]
fn missing_and_null_fields_become_empty() {
    assert_eq!(
        parse_caption(r#"{"top":"ONLY TOP"}"#).unwrap(),
        CaptionPair::new("ONLY TOP", "")
    );
    assert_eq!(
        parse_caption(r#"{"top":null,"bottom":"B"}"#).unwrap(),
        CaptionPair::new("", "B")
    );
    assert!(parse_caption("{}").unwrap().is_blank());
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let c = parse_caption("\n  {\"top\":\"A\",\"bottom\":\"B\"}  \n").unwrap();
    assert_eq!(c, CaptionPair::new("A", "B"));
}

#[test]
fn non_objects_are_format_errors() {
    for content in ["not json", "[1,2]", "\"top\"", "42", "null", ""] {
        let err = parse_caption(content).unwrap_err();
        assert!(matches!(err, MemeError::CaptionFormat(_)), "{content}: {err}");
    }
}

#[test]
fn non_string_fields_are_format_errors() {
    let err = parse_caption(r#"{"top":5,"bottom":"x"}"#).unwrap_err();
    assert!(matches!(err, MemeError::CaptionFormat(_)));
    let err = parse_caption(r#"{"top":"x","bottom":["y"]}"#).unwrap_err();
    assert!(err.to_string().contains("bottom"));
}

#[test]
fn completion_content_reads_first_choice() {
    let payload = json!({
        "choices": [
            { "message": { "role": "assistant", "content": "{\"top\":\"A\"}" } },
            { "message": { "content": "ignored" } }
        ]
    });
    assert_eq!(completion_content(&payload).unwrap(), "{\"top\":\"A\"}");
    assert!(completion_content(&json!({ "choices": [] })).is_err());
}

#[test]
fn request_body_asks_for_json_with_the_prompt() {
    let source = LlmCaptionSource::new(
        reqwest::Client::new(),
        "http://localhost:9/v1/chat/completions",
        "gpt-4o-mini",
        Some("sk-secret".into()),
    );
    let body = source.request_body();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["content"], CAPTION_PROMPT);
    assert!(CAPTION_PROMPT.contains("under 40 characters"));
    assert!(!format!("{source:?}").contains("sk-secret"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let source = LlmCaptionSource::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9/v1/chat/completions",
        "gpt-4o-mini",
        None,
    );
    let err = source.request_caption().await.unwrap_err();
    assert!(matches!(err, MemeError::CaptionRequest(_)), "{err}");
}
