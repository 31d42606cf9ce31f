//! LRC rendering
//!
//! Writes synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34]Hello world
//! [00:15.00]Another line
//! [00:18.50]
//!
//! The trailing blank timestamp carries the end of the last line, the same
//! way the lyrics API marks the end of a song.

use super::LyricsDocument;

/// Render a document as LRC text.
pub fn render(doc: &LyricsDocument) -> String {
    let mut out = String::new();

    for line in &doc.lines {
        out.push_str(&format!("[{}]{}\n", format_timestamp(line.start_time), line.words));
    }

    if let Some(last) = doc.lines.last()
        && last.end_time > last.start_time
    {
        out.push_str(&format!("[{}]\n", format_timestamp(last.end_time)));
    }

    out
}

/// Format milliseconds as `mm:ss.xx` (centiseconds, truncated).
pub fn format_timestamp(ms: f64) -> String {
    let total_cs = (ms.max(0.0) / 10.0) as u64;
    let min = total_cs / 6000;
    let sec = (total_cs / 100) % 60;
    let cs = total_cs % 100;
    format!("{min:02}:{sec:02}.{cs:02}")
}
