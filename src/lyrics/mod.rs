//! Lyrics module for recovering and synchronizing lyrics payloads
//!
//! This module provides:
//! - Payload recovery for responses contaminated with server notices
//! - Conversion of raw start-time markers into gap-free display intervals
//! - Data structures for lyrics display

pub mod coerce;
pub mod lrc;
pub mod recover;
pub mod sync;

use serde::Serialize;
use serde_json::Value;

pub use recover::recover;
pub use sync::synchronize;

#[derive(Debug, thiserror::Error)]
pub enum LyricsError {
    /// No parseable JSON anywhere in the response body.
    #[error("no lyrics payload found in response")]
    PayloadNotFound,
    /// The recovered payload is valid JSON but not an object.
    #[error("lyrics payload is not a JSON object")]
    NotAnObject,
}

/// One start-time marker as delivered upstream. Nothing here is trusted.
#[derive(Debug, Clone, Default)]
pub struct RawLyricLine {
    pub start_time_ms: Option<Value>,
    pub words: String,
    pub syllables: Vec<Value>,
}

impl RawLyricLine {
    /// Lenient field-by-field read; never fails.
    pub fn from_value(v: &Value) -> Self {
        let words = match v.get("words") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let syllables = match v.get("syllables") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        Self {
            start_time_ms: v.get("startTimeMs").cloned(),
            words,
            syllables,
        }
    }

    /// Coerced start time in milliseconds.
    pub fn start_ms(&self) -> f64 {
        coerce::to_ms(self.start_time_ms.as_ref())
    }

    /// Blank trailing rows mark the end of the song.
    pub fn is_sentinel(&self) -> bool {
        self.words
            .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
            .is_empty()
    }
}

/// Lyrics payload before synchronization.
#[derive(Debug, Clone, Default)]
pub struct RawLyricsDocument {
    pub error: bool,
    pub sync_type: String,
    pub lines: Vec<RawLyricLine>,
}

impl RawLyricsDocument {
    /// Read a recovered payload; only a non-object is rejected.
    pub fn from_value(v: &Value) -> Result<Self, LyricsError> {
        let obj = v.as_object().ok_or(LyricsError::NotAnObject)?;

        let error = match obj.get("error") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        };
        let sync_type = match obj.get("syncType") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        let lines = obj
            .get("lines")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(RawLyricLine::from_value).collect())
            .unwrap_or_default();

        Ok(Self {
            error,
            sync_type,
            lines,
        })
    }
}

/// A lyric line with its display interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    pub words: String,
    pub syllables: Vec<Value>,
    pub start_time_ms: String,
    pub end_time_ms: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl LyricLine {
    /// Create a line; the string time fields are derived from the numbers.
    pub fn new(words: String, syllables: Vec<Value>, start_time: f64, end_time: f64) -> Self {
        Self {
            words,
            syllables,
            start_time_ms: coerce::format_ms(start_time),
            end_time_ms: coerce::format_ms(end_time),
            start_time,
            end_time,
        }
    }
}

/// Synchronized lyrics, ordered by start time with no gaps between lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsDocument {
    pub error: bool,
    pub sync_type: String,
    pub lines: Vec<LyricLine>,
}

impl LyricsDocument {
    /// Number of visible lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there are no visible lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line playing at `position_ms`.
    ///
    /// Picks the last line starting at or before the position. Past the end
    /// of the final interval the final line stays selected.
    pub fn line_at(&self, position_ms: f64) -> Option<usize> {
        let idx = self.lines.partition_point(|l| l.start_time <= position_ms);
        idx.checked_sub(1)
    }

    /// Render as LRC text
    pub fn to_lrc(&self) -> String {
        lrc::render(self)
    }
}

/// Parse a raw response body all the way to display-ready lyrics.
pub fn from_body(body: &str) -> Result<LyricsDocument, LyricsError> {
    let v = recover(body)?;
    let raw = RawLyricsDocument::from_value(&v)?;
    Ok(synchronize(&raw))
}
