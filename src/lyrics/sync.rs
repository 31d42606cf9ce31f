//! Line timing.
//!
//! Upstream lines only carry a start time. Each line's end is the next
//! line's start; the last line ends at the trailing blank "end of song" row
//! when there is one, otherwise it collapses to a zero-length interval.

use std::cmp::Ordering;

use super::{LyricLine, LyricsDocument, RawLyricLine, RawLyricsDocument};

/// Turn raw start markers into ordered, gap-free display intervals.
pub fn synchronize(doc: &RawLyricsDocument) -> LyricsDocument {
    // Coerce once, then sort; `sort_by` is stable so equal starts keep input order.
    let mut sorted: Vec<(f64, &RawLyricLine)> = doc.lines.iter().map(|l| (l.start_ms(), l)).collect();
    // numeric comparison: -0 and 0 are equal here
    sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut terminal_end = 0.0;
    if let Some((start, last)) = sorted.last()
        && last.is_sentinel()
    {
        terminal_end = *start;
        sorted.pop();
    }

    let lines = sorted
        .iter()
        .enumerate()
        .map(|(i, (start, raw))| {
            let end = match sorted.get(i + 1) {
                Some((next_start, _)) => *next_start,
                None if terminal_end != 0.0 => terminal_end,
                None => *start,
            };
            LyricLine::new(raw.words.clone(), raw.syllables.clone(), *start, end)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        sync_type = %doc.sync_type,
        input = doc.lines.len(),
        output = lines.len(),
        "synchronized lyrics"
    );

    LyricsDocument {
        error: doc.error,
        sync_type: doc.sync_type.clone(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw(v: Value) -> RawLyricsDocument {
        RawLyricsDocument::from_value(&v).unwrap()
    }

    fn spans(d: &LyricsDocument) -> Vec<(&str, f64, f64)> {
        d.lines
            .iter()
            .map(|l| (l.words.as_str(), l.start_time, l.end_time))
            .collect()
    }

    fn assert_gap_free(d: &LyricsDocument) {
        for w in d.lines.windows(2) {
            assert!(w[0].start_time <= w[1].start_time);
            assert_eq!(w[0].end_time, w[1].start_time);
        }
        for l in &d.lines {
            assert!(l.end_time >= l.start_time);
        }
    }

    #[test]
    fn test_sentinel_end_to_end() {
        let d = synchronize(&raw(json!({
            "error": false,
            "syncType": "LINE_SYNCED",
            "lines": [
                {"startTimeMs": "1000", "words": "hello"},
                {"startTimeMs": "3000", "words": "world"},
                {"startTimeMs": "5000", "words": ""}
            ]
        })));
        assert_eq!(spans(&d), vec![("hello", 1000.0, 3000.0), ("world", 3000.0, 5000.0)]);
        assert_eq!(d.lines[0].start_time_ms, "1000");
        assert_eq!(d.lines[1].end_time_ms, "5000");
        assert_eq!(d.sync_type, "LINE_SYNCED");
        assert!(!d.error);
    }

    #[test]
    fn test_unsorted_input_without_sentinel() {
        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "4000", "words": "c"},
                {"startTimeMs": "500", "words": "a"},
                {"startTimeMs": 2000, "words": "b"}
            ]
        })));
        assert_eq!(d.len(), 3);
        assert_eq!(
            spans(&d),
            vec![("a", 500.0, 2000.0), ("b", 2000.0, 4000.0), ("c", 4000.0, 4000.0)]
        );
        assert_gap_free(&d);
    }

    #[test]
    fn test_empty() {
        let d = synchronize(&raw(json!({"error": false, "syncType": "UNSYNCED", "lines": []})));
        assert!(d.is_empty());
        assert!(!d.error);
        assert_eq!(d.sync_type, "UNSYNCED");
    }

    #[test]
    fn test_single_line() {
        let d = synchronize(&raw(json!({"lines": [{"startTimeMs": "7000", "words": "solo"}]})));
        assert_eq!(spans(&d), vec![("solo", 7000.0, 7000.0)]);
    }

    #[test]
    fn test_only_sentinel() {
        let d = synchronize(&raw(json!({"lines": [{"startTimeMs": "9000", "words": "   "}]})));
        assert!(d.is_empty());
    }

    #[test]
    fn test_zero_sentinel_falls_back_to_own_start() {
        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "0", "words": ""},
                {"startTimeMs": "0", "words": "intro"}
            ]
        })));
        // the blank row sorts first and is not trailing, so it stays a line
        assert_eq!(spans(&d), vec![("", 0.0, 0.0), ("intro", 0.0, 0.0)]);

        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "1200", "words": "x"},
                {"startTimeMs": "oops", "words": ""}
            ]
        })));
        // malformed sentinel coerces to 0, sorts first, and is no longer trailing
        assert_eq!(spans(&d), vec![("", 0.0, 1200.0), ("x", 1200.0, 1200.0)]);
    }

    #[test]
    fn test_malformed_start_is_zero() {
        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "2000", "words": "later"},
                {"startTimeMs": "n/a", "words": "first"}
            ]
        })));
        assert_eq!(d.lines[0].words, "first");
        assert_eq!(d.lines[0].start_time, 0.0);
        assert_eq!(d.lines[0].end_time, 2000.0);
    }

    #[test]
    fn test_equal_starts_keep_order() {
        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "1000", "words": "one"},
                {"startTimeMs": "1000", "words": "two"},
                {"startTimeMs": "1000", "words": "three"},
                {"startTimeMs": "2500", "words": ""}
            ]
        })));
        assert_eq!(
            spans(&d),
            vec![
                ("one", 1000.0, 1000.0),
                ("two", 1000.0, 1000.0),
                ("three", 1000.0, 2500.0)
            ]
        );
        assert_gap_free(&d);
    }

    #[test]
    fn test_negative_zero_sentinel_stays_trailing() {
        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "0", "words": "intro"},
                {"startTimeMs": "-0", "words": ""}
            ]
        })));
        assert_eq!(spans(&d), vec![("intro", 0.0, 0.0)]);

        let d = synchronize(&raw(json!({
            "lines": [
                {"startTimeMs": "-0", "words": "a"},
                {"startTimeMs": "0", "words": "b"},
                {"startTimeMs": "900", "words": ""}
            ]
        })));
        assert_eq!(d.lines[0].words, "a");
        assert_eq!(d.lines[1].words, "b");
        assert_eq!(d.lines[1].end_time, 900.0);
    }

    #[test]
    fn test_syllables_carried() {
        let d = synchronize(&raw(json!({
            "syncType": "SYLLABLE_SYNCED",
            "lines": [
                {"startTimeMs": "100", "words": "la la", "syllables": ["la", "la"]},
                {"startTimeMs": "200", "words": "no syl"}
            ]
        })));
        assert_eq!(d.lines[0].syllables, vec![json!("la"), json!("la")]);
        assert!(d.lines[1].syllables.is_empty());
    }

    #[test]
    fn test_input_untouched() {
        let input = raw(json!({
            "lines": [
                {"startTimeMs": "3000", "words": "b"},
                {"startTimeMs": "1000", "words": "a"},
                {"startTimeMs": "4000", "words": ""}
            ]
        }));
        let _ = synchronize(&input);
        assert_eq!(input.lines.len(), 3);
        assert_eq!(input.lines[0].words, "b");
    }

    #[test]
    fn test_gap_free_many() {
        let lines: Vec<Value> = (0..50)
            .rev()
            .map(|i| json!({"startTimeMs": (i * 137 % 41 * 100).to_string(), "words": format!("l{i}")}))
            .collect();
        let d = synchronize(&raw(json!({"lines": lines})));
        assert_eq!(d.len(), 50);
        assert_gap_free(&d);
        let last = d.lines.last().unwrap();
        assert_eq!(last.end_time, last.start_time);
    }
}
