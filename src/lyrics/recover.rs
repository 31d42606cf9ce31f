//! Payload recovery for contaminated lyrics responses.
//!
//! The lyrics server is a PHP app and sometimes prints notices/warnings as
//! HTML ahead of the JSON body, e.g.
//!
//! ```text
//! <br />
//! <b>Notice</b>: Undefined index ...<br />
//! {"error":false,"syncType":"LINE_SYNCED","lines":[...]}
//! ```
//!
//! Recovery tries, in order:
//! 1. the body as-is,
//! 2. the third `<br>`-separated segment (observed notice layout),
//! 3. the outermost `{...}` of the tag-stripped body.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::LyricsError;

/// `<br>`, `<br/>`, `<BR />`, `< br >` ...
static BR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*br\s*/?\s*>").expect("valid regex: BR_RE"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex: TAG_RE"));

/// Segment index where the payload lands after splitting a notice-prefixed
/// body on line breaks.
const NOTICE_PAYLOAD_SEGMENT: usize = 2;

/// Recover a JSON value from a raw response body.
pub fn recover(body: &str) -> Result<Value, LyricsError> {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        return Ok(v);
    }

    if let Some(v) = from_notice_segments(body) {
        tracing::debug!("lyrics payload recovered from line-break segment");
        return Ok(v);
    }

    if let Some(v) = from_brace_scan(body) {
        tracing::debug!("lyrics payload recovered by brace scan");
        return Ok(v);
    }

    tracing::warn!(len = body.len(), "no JSON payload found in lyrics response");
    Err(LyricsError::PayloadNotFound)
}

/// Heuristic for the one contamination shape seen in practice: notice
/// markup broken up by `<br>` with the payload in the third segment.
fn from_notice_segments(body: &str) -> Option<Value> {
    if !BR_RE.is_match(body) {
        return None;
    }

    let candidate = BR_RE
        .split(body)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .nth(NOTICE_PAYLOAD_SEGMENT)?;

    let cleaned = strip_tags(candidate);
    serde_json::from_str(cleaned.trim()).ok()
}

/// Safety net: first `{` to last `}` of the tag-stripped body.
fn from_brace_scan(body: &str) -> Option<Value> {
    let stripped = strip_tags(body);
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if start >= end {
        return None;
    }

    serde_json::from_str(stripped[start..=end].trim()).ok()
}

fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}
