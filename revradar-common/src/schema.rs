//! Analysis result schema
//!
//! Typed shape of an `/analyze` response and the rules used to normalize a
//! raw backend payload into an [`AnalysisResult`].
//!
//! The backend is lenient about what it sends: when no Reddit reviews were
//! found it omits `pros`, `cons` and `similar_products` entirely, and Python
//! `None` arrives as JSON `null`. Absent and `null` fields are both treated
//! as missing and coerced to their empty value. Anything that is present but
//! has the wrong shape is rejected.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Number of subscores carried by every result (quality, cost, availability, utility)
pub const SUBSCORE_COUNT: usize = 4;

/// Upper bound of the rating scale (ratings and subscores are 0.0 - 5.0)
pub const MAX_SCORE: f64 = 5.0;

/// Payload validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Response body is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Response body is valid JSON but not an object
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// Top-level field has the wrong JSON type
    #[error("Field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// Element of an array field has the wrong shape
    #[error("Entry {index} of `{field}` is invalid: {reason}")]
    InvalidEntry {
        field: &'static str,
        index: usize,
        reason: &'static str,
    },

    /// More subscores than the fixed four
    #[error("Expected at most 4 subscores, got {0}")]
    TooManySubscores(usize),
}

/// Fixed-length subscore vector, always exactly four entries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Subscores([f64; SUBSCORE_COUNT]);

impl Subscores {
    /// Display labels, in wire order
    pub const LABELS: [&'static str; SUBSCORE_COUNT] = ["Quality", "Cost", "Availability", "Utility"];

    pub fn new(values: [f64; SUBSCORE_COUNT]) -> Self {
        Self(values)
    }

    pub fn zeroed() -> Self {
        Self([0.0; SUBSCORE_COUNT])
    }

    pub fn quality(&self) -> f64 {
        self.0[0]
    }

    pub fn cost(&self) -> f64 {
        self.0[1]
    }

    pub fn availability(&self) -> f64 {
        self.0[2]
    }

    pub fn utility(&self) -> f64 {
        self.0[3]
    }

    pub fn as_array(&self) -> [f64; SUBSCORE_COUNT] {
        self.0
    }

    /// Iterate `(label, value)` pairs in wire order
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::LABELS.into_iter().zip(self.0.iter().copied())
    }
}

/// Review comment with the URL it was sourced from
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedComment {
    pub text: String,
    pub source_url: String,
}

impl SourcedComment {
    pub fn new(text: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: source_url.into(),
        }
    }
}

/// Wire form is a `[text, url]` pair
impl Serialize for SourcedComment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.text, &self.source_url).serialize(serializer)
    }
}

/// Pro or con, optionally linked to the comment it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub text: String,
    pub source_url: Option<String>,
}

impl Insight {
    pub fn new(text: impl Into<String>, source_url: Option<String>) -> Self {
        Self {
            text: text.into(),
            source_url,
        }
    }
}

/// Wire form is a `[text, url | null]` pair
impl Serialize for Insight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.text, &self.source_url).serialize(serializer)
    }
}

/// Review analysis for one product, as produced by the backend
///
/// Serializes back to the backend's field names.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    /// Overall rating, 0.0 - 5.0
    #[serde(rename = "final_rating")]
    pub rating: f64,
    /// Quality, cost, availability, utility
    pub subscores: Subscores,
    /// AI generated summary (may be empty)
    #[serde(rename = "ai_summary")]
    pub summary: String,
    /// Comments in backend relevance order
    pub comments: Vec<SourcedComment>,
    pub pros: Vec<Insight>,
    pub cons: Vec<Insight>,
    /// Product names suggested as alternatives
    pub similar_products: Vec<String>,
}

impl AnalysisResult {
    /// Parse and normalize a raw JSON response body
    pub fn from_json_str(body: &str) -> Result<Self, SchemaError> {
        let payload: Value =
            serde_json::from_str(body).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
        Self::from_payload(&payload)
    }

    /// Normalize an already-decoded payload
    pub fn from_payload(payload: &Value) -> Result<Self, SchemaError> {
        let object = payload.as_object().ok_or(SchemaError::NotAnObject)?;

        let rating = match present(object, "final_rating") {
            Some(value) => score(value, "final_rating")?,
            None => 0.0,
        };

        let summary = match present(object, "ai_summary") {
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(SchemaError::WrongType {
                    field: "ai_summary",
                    expected: "a string",
                })
            }
            None => String::new(),
        };

        let comments = array(object, "comments")?
            .iter()
            .enumerate()
            .map(|(index, item)| parse_comment(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let pros = parse_insights(object, "pros")?;
        let cons = parse_insights(object, "cons")?;

        let similar_products = array(object, "similar_products")?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(name) => Ok(name.clone()),
                _ => Err(SchemaError::InvalidEntry {
                    field: "similar_products",
                    index,
                    reason: "expected a product name string",
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rating,
            subscores: parse_subscores(object)?,
            summary,
            comments,
            pros,
            cons,
            similar_products,
        })
    }

    /// True when the backend found no reviews to analyze
    ///
    /// Derived on every call, never stored.
    pub fn has_no_review_data(&self) -> bool {
        self.rating == 0.0 && self.comments.is_empty()
    }

    /// Copy with rating, subscores and comments zeroed
    ///
    /// Used as the interim result while a fallback reveal is staging.
    pub fn zeroed_interim(&self) -> Self {
        Self {
            rating: 0.0,
            subscores: Subscores::zeroed(),
            comments: Vec::new(),
            ..self.clone()
        }
    }
}

/// Field value, with JSON `null` treated the same as absent
fn present<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn array<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a [Value], SchemaError> {
    match present(object, name) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(SchemaError::WrongType {
            field: name,
            expected: "an array",
        }),
        None => Ok(&[]),
    }
}

fn score(value: &Value, field: &'static str) -> Result<f64, SchemaError> {
    let raw = value.as_f64().ok_or(SchemaError::WrongType {
        field,
        expected: "a number",
    })?;

    if (0.0..=MAX_SCORE).contains(&raw) {
        Ok(raw)
    } else {
        warn!(field, value = raw, "Score outside 0-5 range, clamping");
        Ok(raw.clamp(0.0, MAX_SCORE))
    }
}

fn parse_subscores(object: &Map<String, Value>) -> Result<Subscores, SchemaError> {
    let items = array(object, "subscores")?;
    if items.len() > SUBSCORE_COUNT {
        return Err(SchemaError::TooManySubscores(items.len()));
    }

    // Short or missing vectors are zero-filled
    let mut values = [0.0; SUBSCORE_COUNT];
    for (slot, item) in values.iter_mut().zip(items) {
        if !item.is_null() {
            *slot = score(item, "subscores")?;
        }
    }
    Ok(Subscores(values))
}

fn parse_comment(index: usize, item: &Value) -> Result<SourcedComment, SchemaError> {
    match item.as_array().map(Vec::as_slice) {
        Some([Value::String(text), Value::String(url)]) => Ok(SourcedComment::new(text.clone(), url.clone())),
        _ => Err(SchemaError::InvalidEntry {
            field: "comments",
            index,
            reason: "expected a [text, url] pair of strings",
        }),
    }
}

fn parse_insights(object: &Map<String, Value>, field: &'static str) -> Result<Vec<Insight>, SchemaError> {
    array(object, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| parse_insight(field, index, item))
        .collect()
}

/// Accepts `[text, url]`, `[text, null]`, `[text]` and bare strings
fn parse_insight(field: &'static str, index: usize, item: &Value) -> Result<Insight, SchemaError> {
    let invalid = SchemaError::InvalidEntry {
        field,
        index,
        reason: "expected text or a [text, url | null] pair",
    };

    match item {
        Value::String(text) => Ok(Insight::new(text.clone(), None)),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(text)] | [Value::String(text), Value::Null] => Ok(Insight::new(text.clone(), None)),
            [Value::String(text), Value::String(url)] => Ok(Insight::new(text.clone(), Some(url.clone()))),
            _ => Err(invalid),
        },
        _ => Err(invalid),
    }
}
