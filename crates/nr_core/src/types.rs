use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stored bodies are cut to this many characters.
pub const BODY_MAX_CHARS: usize = 4000;

/// Listing summary fallback length when no AI summary is available.
pub const SUMMARY_FALLBACK_CHARS: usize = 300;

pub const DEFAULT_SOURCE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub fingerprint: String,
    pub title: String,
    pub body: String,
    pub source: String,
    pub url: String,
    pub image: Option<String>,
    /// Serialized [`AiEnrichment`].
    pub ai: String,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(
        fingerprint: String,
        title: &str,
        body: &str,
        source: Option<&str>,
        url: Option<&str>,
        image: Option<String>,
        ai: &AiEnrichment,
    ) -> crate::Result<Self> {
        Ok(Self {
            fingerprint,
            title: title.to_string(),
            body: truncate_chars(body, BODY_MAX_CHARS),
            source: source
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SOURCE)
                .to_string(),
            url: url.unwrap_or_default().to_string(),
            image,
            ai: ai.to_json_string()?,
            created_at: Utc::now(),
        })
    }

    /// `createdAt` as stored: RFC 3339, UTC, millisecond precision.
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse_created_at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default()
    }
}

/// Typed view of the fields an editor model is asked to produce. Read
/// leniently: a wrongly typed field is just absent from the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiSummary {
    pub category: Option<String>,
    pub rewritten_headline: Option<String>,
    pub summary: Option<String>,
    pub hashtags: Vec<String>,
}

impl From<&Value> for AiSummary {
    fn from(value: &Value) -> Self {
        let text = |field: &str| value.get(field).and_then(Value::as_str).map(str::to_string);
        let hashtags = match value.get("hashtags") {
            Some(Value::Array(tags)) => tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(tags)) => tags.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        };

        Self {
            category: text("category"),
            rewritten_headline: text("rewritten_headline"),
            summary: text("summary"),
            hashtags,
        }
    }
}

/// Best-effort result of an inference call: the model's JSON exactly as it
/// came back, or its text when it was not JSON at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum AiEnrichment {
    Raw { raw: String },
    Structured(Value),
}

impl Default for AiEnrichment {
    fn default() -> Self {
        Self::Structured(Value::Object(Map::new()))
    }
}

impl AiEnrichment {
    /// Parses model output. Never fails and never checks the shape: any JSON
    /// document is kept as-is, anything else is kept verbatim as `Raw`.
    /// Markdown code fences around the document are ignored.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(strip_code_blocks(text)) {
            Ok(value) => Self::Structured(value),
            Err(_) => Self::Raw { raw: text.to_string() },
        }
    }

    /// Parses a stored `ai` column. Missing or unreadable values yield an
    /// empty structured value.
    pub fn from_stored(stored: Option<&str>) -> Self {
        stored
            .and_then(|s| serde_json::from_str::<Self>(s).ok())
            .unwrap_or_default()
    }

    pub fn to_json_string(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn fields(&self) -> AiSummary {
        match self {
            Self::Structured(value) => AiSummary::from(value),
            Self::Raw { .. } => AiSummary::default(),
        }
    }

    pub fn headline(&self) -> Option<&str> {
        self.text_field("rewritten_headline")
    }

    pub fn summary(&self) -> Option<&str> {
        self.text_field("summary")
    }

    fn text_field(&self, field: &str) -> Option<&str> {
        match self {
            Self::Structured(value) => value
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            Self::Raw { .. } => None,
        }
    }
}

/// Listing projection of an [`Article`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayArticle {
    pub id: String,
    pub title: String,
    pub headline: String,
    pub summary: String,
    pub source: String,
    pub image: Option<String>,
}

impl From<&Article> for DisplayArticle {
    fn from(article: &Article) -> Self {
        let ai = AiEnrichment::from_stored(Some(article.ai.as_str()));
        Self {
            id: article.fingerprint.clone(),
            title: article.title.clone(),
            headline: ai
                .headline()
                .map(str::to_string)
                .unwrap_or_else(|| article.title.clone()),
            summary: ai
                .summary()
                .map(str::to_string)
                .unwrap_or_else(|| truncate_chars(&article.body, SUMMARY_FALLBACK_CHARS)),
            source: if article.source.is_empty() {
                DEFAULT_SOURCE.to_string()
            } else {
                article.source.clone()
            },
            image: article.image.clone().filter(|i| !i.is_empty()),
        }
    }
}

fn strip_code_blocks(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
