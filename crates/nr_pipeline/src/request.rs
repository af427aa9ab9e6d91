use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Unpadded input with stray low bits in the final symbol tolerated; the
/// text is normalized by [`decode_image`] before it gets here.
const IMAGE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A body delivered either as raw JSON text or as an already-decoded document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EventBody {
    Text(String),
    Json(Value),
}

/// Inbound invocation as delivered by the hosting runtime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IngestEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<EventBody>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl IngestEvent {
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(EventBody::Json(body));
        self
    }

    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(EventBody::Text(body.into()));
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// An empty secret authorizes nothing.
    pub fn is_authorized(&self, secret: &str) -> bool {
        !secret.is_empty() && self.header(API_KEY_HEADER) == Some(secret)
    }

    /// The body as a JSON document. Absent or empty bodies are an empty
    /// object; unparseable text is a serialization error.
    pub fn payload(&self) -> nr_core::Result<Value> {
        match &self.body {
            None => Ok(Value::Object(Map::new())),
            Some(EventBody::Text(text)) if text.trim().is_empty() => Ok(Value::Object(Map::new())),
            Some(EventBody::Text(text)) => Ok(serde_json::from_str(text)?),
            Some(EventBody::Json(value)) => Ok(value.clone()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing title or body")]
    MissingFields,
}

/// Validated ingest input.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub title: String,
    pub body: String,
    pub source: Option<String>,
    pub url: Option<String>,
    /// Still encoded; only decoded once the article is known to be new.
    pub image_base64: Option<String>,
}

fn non_empty_str(payload: &Map<String, Value>, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl IngestRequest {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let fields = payload.as_object().ok_or(ValidationError::MissingFields)?;

        let (title, body) = match (non_empty_str(fields, "title"), non_empty_str(fields, "body")) {
            (Some(title), Some(body)) => (title, body),
            _ => return Err(ValidationError::MissingFields),
        };

        Ok(Self {
            title,
            body,
            source: non_empty_str(fields, "source"),
            url: non_empty_str(fields, "url"),
            image_base64: non_empty_str(fields, "imageBase64"),
        })
    }
}

/// Lenient base64: standard and URL-safe symbols are both accepted, anything
/// outside the alphabet is skipped, decoding stops at the first `=` and a
/// dangling final symbol is dropped. Never fails; garbage decodes to whatever
/// bytes its valid symbols spell.
pub fn decode_image(encoded: &str) -> Vec<u8> {
    let mut symbols: Vec<u8> = encoded
        .bytes()
        .take_while(|&b| b != b'=')
        .filter_map(|b| match b {
            b'-' => Some(b'+'),
            b'_' => Some(b'/'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => Some(b),
            _ => None,
        })
        .collect();
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }

    IMAGE_ENGINE.decode(&symbols).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let event = IngestEvent::default().with_header("X-API-KEY", "secret");
        assert_eq!(event.header("x-api-key"), Some("secret"));
        assert!(event.is_authorized("secret"));
        assert!(!event.is_authorized("other"));

        let event = IngestEvent::default().with_header("X-Api-Key", "secret");
        assert!(event.is_authorized("secret"));
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        assert!(!IngestEvent::default().is_authorized(""));
        assert!(!IngestEvent::default().with_header("x-api-key", "").is_authorized(""));
    }

    #[test]
    fn test_lambda_event_shapes() {
        let event: IngestEvent = serde_json::from_value(json!({
            "headers": {"X-Api-Key": "k"},
            "body": "{\"title\":\"A\",\"body\":\"B\"}",
            "isBase64Encoded": false
        }))
        .unwrap();
        assert_eq!(event.payload().unwrap(), json!({"title": "A", "body": "B"}));

        let event: IngestEvent = serde_json::from_value(json!({
            "headers": null,
            "body": {"title": "A", "body": "B"}
        }))
        .unwrap();
        assert!(event.headers.is_empty());
        assert_eq!(event.payload().unwrap(), json!({"title": "A", "body": "B"}));

        let event: IngestEvent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(event.payload().unwrap(), json!({}));
    }

    #[test]
    fn test_malformed_text_body_is_an_error() {
        let event = IngestEvent::default().with_text_body("{not json");
        assert!(matches!(event.payload(), Err(nr_core::Error::Serialization(_))));
    }

    #[test]
    fn test_required_fields() {
        for payload in [
            json!({}),
            json!({"title": "A"}),
            json!({"body": "B"}),
            json!({"title": "", "body": "B"}),
            json!({"title": 5, "body": "B"}),
            json!(["A", "B"]),
            Value::Null,
        ] {
            assert_eq!(
                IngestRequest::from_payload(&payload),
                Err(ValidationError::MissingFields),
                "{}",
                payload
            );
        }
    }

    #[test]
    fn test_optional_fields() {
        let request = IngestRequest::from_payload(&json!({
            "title": "A",
            "body": "B",
            "source": "",
            "url": "https://example.com/a",
            "imageBase64": "/9j/4A"
        }))
        .unwrap();
        assert_eq!(request.source, None);
        assert_eq!(request.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(request.image_base64.as_deref(), Some("/9j/4A"));
    }

    #[test]
    fn test_odd_image_text_is_not_a_validation_error() {
        let request = IngestRequest::from_payload(&json!({
            "title": "A",
            "body": "B",
            "imageBase64": "!!not-base64!!"
        }))
        .unwrap();
        assert_eq!(request.image_base64.as_deref(), Some("!!not-base64!!"));
    }

    #[test]
    fn test_decode_image_is_lenient() {
        let jpeg = vec![0xff, 0xd8, 0xff, 0xe0];
        assert_eq!(decode_image("/9j/4A=="), jpeg);
        assert_eq!(decode_image("/9j/4A"), jpeg);
        assert_eq!(decode_image("_9j_4A"), jpeg);
        assert_eq!(decode_image("/9j/\n4A==\n"), jpeg);
        assert_eq!(decode_image("_-_v"), vec![0xff, 0xef, 0xef]);
        assert_eq!(decode_image("/9j/4A==AAAA"), jpeg);
        assert_eq!(decode_image("/9j/4"), vec![0xff, 0xd8, 0xff]);
        assert_eq!(decode_image("***"), Vec::<u8>::new());
    }
}
