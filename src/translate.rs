use serde_json::Value;

use crate::config::Settings;
use crate::error::TranslationChunkError;

/// Translates one chunk of text. Implementations report the chunk index as 0;
/// the chunker re-tags errors with the real position.
pub trait Translate {
    async fn translate(&self, text: &str) -> Result<String, TranslationChunkError>;
}

/// Client for the public Google translate endpoint (`client=gtx`).
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
    source_lang: String,
    target_lang: String,
}

impl GoogleTranslator {
    pub fn new(settings: &Settings) -> Result<Self, TranslationChunkError> {
        let client = reqwest::Client::builder()
            .timeout(settings.translate_timeout())
            .build()
            .map_err(request_error)?;
        Ok(GoogleTranslator {
            client,
            endpoint: settings.translate_endpoint.clone(),
            source_lang: settings.source_lang.clone(),
            target_lang: settings.target_lang.clone(),
        })
    }
}

impl Translate for GoogleTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationChunkError> {
        let body: Value = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_lang.as_str()),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        match parse_segments(&body) {
            Some(t) if !t.trim().is_empty() => Ok(t),
            _ => Err(TranslationChunkError::Empty { index: 0 }),
        }
    }
}

fn request_error(e: reqwest::Error) -> TranslationChunkError {
    TranslationChunkError::Request {
        index: 0,
        reason: e.to_string(),
    }
}

/// Response shape: `[[["translated", "original", ...], ...], null, "zh-CN", ...]`.
fn parse_segments(body: &Value) -> Option<String> {
    let segments = body.as_array()?.first()?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.as_array()?.first()?.as_str())
        .collect();
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_translated_segments() {
        let body = json!([
            [["Two sum. ", "两数之和。", null, null, 10], ["Easy", "简单", null, null, 10]],
            null,
            "zh-CN"
        ]);
        assert_eq!(parse_segments(&body).as_deref(), Some("Two sum. Easy"));
    }

    #[test]
    fn unexpected_shape_yields_none() {
        assert_eq!(parse_segments(&json!({"error": "quota"})), None);
        assert_eq!(parse_segments(&json!([null])), None);
    }
}
