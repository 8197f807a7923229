//! Scalar leaves and the value model wrapped around them.

use std::fmt;

use crate::errors::EncodingError;
use crate::timestamp::Timestamp;

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Leaf datum of an object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Absent value (`None`, unit).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer that may exceed `i64::MAX`.
    UInt(u64),
    /// Binary floating point number.
    Float(f64),
    /// UTF-8 text.
    Str(String),
    /// Opaque instant, never decomposed.
    Timestamp(Timestamp),
}

impl Scalar {
    /// Default string conversion, the form fed to the hash collector.
    ///
    /// Text is taken verbatim (no quotes), numbers and booleans use their
    /// display form and timestamps use the canonical millisecond form.
    pub fn raw_text(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s.clone(),
            Scalar::Timestamp(ts) => ts.canonical(),
        }
    }

    /// JSON literal for this scalar.
    pub fn json_text(&self) -> Result<String, EncodingError> {
        let text = match self {
            Scalar::Null => "null".to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::UInt(u) => u.to_string(),
            Scalar::Float(f) => float_json(*f)?,
            Scalar::Str(s) => serde_json::Value::String(s.clone()).to_string(),
            Scalar::Timestamp(ts) => serde_json::Value::String(ts.canonical()).to_string(),
        };
        Ok(text)
    }
}

/// Integral floats print without a fraction so `1.0` and `1` agree.
fn float_json(f: f64) -> Result<String, EncodingError> {
    if !f.is_finite() {
        return Err(EncodingError::NonFiniteNumber(f));
    }
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Ok((f as i64).to_string());
    }
    serde_json::Number::from_f64(f)
        .map(|n| n.to_string())
        .ok_or(EncodingError::NonFiniteNumber(f))
}

/// A scalar together with its two derived textual forms.
///
/// `text` is what the JSON collector writes, `raw` is what the hash
/// collector digests. Both are fixed when the value is built, so a custom
/// factory controls JSON rendering and hashing through the same object.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    datum: Scalar,
    text: String,
    raw: String,
}

impl Value {
    /// Generic marshalable wrap: JSON literal for rendering, default string
    /// conversion for hashing.
    pub fn json(datum: Scalar) -> Result<Self, EncodingError> {
        let text = datum.json_text()?;
        let raw = datum.raw_text();
        Ok(Self { datum, text, raw })
    }

    /// Pre-rendered text emitted verbatim in both forms.
    ///
    /// The caller is responsible for `text` being a valid JSON fragment.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            datum: Scalar::Str(text.clone()),
            raw: text.clone(),
            text,
        }
    }

    /// Explicit forms for custom factories.
    pub fn with_forms(datum: Scalar, text: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            datum,
            text: text.into(),
            raw: raw.into(),
        }
    }

    /// The wrapped datum.
    pub fn datum(&self) -> &Scalar {
        &self.datum
    }

    /// JSON form.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hash form.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
