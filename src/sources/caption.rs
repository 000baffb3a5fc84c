//! Generated captions from an OpenAI-compatible chat-completions endpoint.

use serde_json::{Value, json};

use crate::{
    foundation::error::{MemeError, MemeResult},
    meme::model::CaptionPair,
};

/// Fixed prompt for caption generation.
pub const CAPTION_PROMPT: &str = "Generate a funny cat meme caption. Return ONLY valid JSON with \
this exact structure: {\"top\": \"top text here\", \"bottom\": \"bottom text here\"}. The top \
text should be a setup and bottom text should be the punchline. Keep each text under 40 \
characters. Make it funny and relatable to internet cat meme culture. Examples of style: \
\"HOOMAN LEAVES FOR 5 MINUTES\" / \"I THOUGHT YOU WERE GONE FOREVER\", \"I FITS\" / \"I SITS\", \
\"NOT SURE IF HUNGRY\" / \"OR JUST BORED\".";

/// Supplies generated caption pairs.
#[allow(async_fn_in_trait)]
pub trait CaptionSource {
    /// One generation attempt. No retry, no caching.
    async fn request_caption(&self) -> MemeResult<CaptionPair>;
}

/// Chat-completions caption generator.
#[derive(Clone)]
pub struct LlmCaptionSource {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl LlmCaptionSource {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// JSON body posted to the endpoint.
    pub fn request_body(&self) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": CAPTION_PROMPT }],
            "response_format": { "type": "json_object" },
        })
    }
}

impl std::fmt::Debug for LlmCaptionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCaptionSource")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CaptionSource for LlmCaptionSource {
    #[tracing::instrument(skip(self), fields(model = %self.model))]
    async fn request_caption(&self) -> MemeResult<CaptionPair> {
        let mut request = self.client.post(&self.endpoint).json(&self.request_body());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| MemeError::caption_request(format!("send: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MemeError::caption_request(format!(
                "endpoint returned {status}: {}",
                text.trim()
            )));
        }
        let payload: Value = response
            .json()
            .await
            .map_err(|e| MemeError::caption_format(format!("response body: {e}")))?;
        let content = completion_content(&payload)?;
        parse_caption(content)
    }
}

/// `choices[0].message.content` of a chat-completions response.
pub fn completion_content(payload: &Value) -> MemeResult<&str> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| MemeError::caption_format("response has no message content"))
}

/// Parse the model's `{"top": ..., "bottom": ...}` reply.
///
/// Missing or `null` fields become empty strings. Anything that is not a JSON object, or a field
/// that is not a string, is a format error.
pub fn parse_caption(content: &str) -> MemeResult<CaptionPair> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|e| MemeError::caption_format(format!("caption is not json: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| MemeError::caption_format("caption is not a json object"))?;

    let field = |name: &str| -> MemeResult<String> {
        match obj.get(name) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(MemeError::caption_format(format!(
                "caption field '{name}' is not a string: {other}"
            ))),
        }
    };

    Ok(CaptionPair::new(field("top")?, field("bottom")?))
}

#[cfg(test)]
#[path = "../../tests/unit/sources/caption.rs"]
mod tests;
