//! Raw analysis payloads and the text normalizer.
//!
//! The analysis service answers with either free text (optionally wrapped as
//! `{ "output": "..." }`) or a typed report keyed by page. Dispatch between the
//! two happens once, here, so the rest of the pipeline never inspects shapes.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::report::types::StructuredReport;

/// Envelope field carrying the report text.
const OUTPUT_FIELD: &str = "output";
/// Envelope field carrying the cache indicator.
const CACHED_FIELD: &str = "is_cached";

/// Errors while loading a payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Failed to read payload: {0}")]
    Io(#[from] io::Error),
}

/// A payload as received from the analysis service.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Text(String),
    Structured(StructuredReport),
}

impl RawPayload {
    /// Interpret a JSON value. Envelopes are unwrapped, typed reports are
    /// recognised, and anything else is coerced to text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(text) => Self::from_text(text),
            Value::Object(map) => {
                if let Some(inner) = map.get(OUTPUT_FIELD) {
                    return Self::from_value(inner);
                }
                if StructuredReport::looks_structured(value) {
                    return Self::Structured(StructuredReport::from_value(value));
                }
                Self::Text(coerce_text(value))
            }
            other => Self::Text(coerce_text(other)),
        }
    }

    /// Interpret raw text. Text that is itself a JSON object (the service
    /// serialises typed reports into the `output` string) goes through
    /// [`RawPayload::from_value`].
    pub fn from_text(text: &str) -> Self {
        if let Some(value) = parse_json_object(text) {
            debug!("Payload text is a JSON object");
            return Self::from_value(&value);
        }
        Self::Text(text.to_string())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

/// Analysis response: the payload plus the externally reported cache flag.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub payload: RawPayload,
    pub cached: bool,
}

impl AnalysisResponse {
    pub fn from_value(value: &Value) -> Self {
        let cached = value
            .get(CACHED_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Self {
            payload: RawPayload::from_value(value),
            cached,
        }
    }

    pub fn from_text(text: &str) -> Self {
        match parse_json_object(text) {
            Some(value) => Self::from_value(&value),
            None => Self {
                payload: RawPayload::Text(text.to_string()),
                cached: false,
            },
        }
    }
}

/// Read a response from a file, or from stdin when `path` is `None` or `-`.
pub fn read_response(path: Option<&Path>) -> Result<AnalysisResponse, PayloadError> {
    let raw = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(AnalysisResponse::from_text(&raw))
}

/// Coerce any JSON value to its textual form. `null` becomes empty.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Canonicalize line endings to `\n` and trim every line.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_json_object(text: &str) -> Option<Value> {
    if !text.trim_start().starts_with('{') {
        return None;
    }
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}
