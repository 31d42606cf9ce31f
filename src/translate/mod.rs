//! Traditional → simplified script conversion for lyric text.
//!
//! The table is loaded from an OpenCC-style dictionary (`TSCharacters.txt`):
//! one entry per line, `source target [alternatives...]`, whitespace
//! separated. Callers build a [`ScriptTable`] once and pass it where needed.

use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

use crate::lyrics::{LyricLine, LyricsDocument};

#[derive(Debug, Clone, Default)]
pub struct ScriptTable {
    map: HashMap<String, String>,
    /// Longest key, in chars.
    max_key_len: usize,
}

impl ScriptTable {
    pub fn parse(raw: &str) -> Self {
        let mut table = Self::default();
        for line in raw.lines() {
            let mut parts = line.split_whitespace();
            if let (Some(src), Some(dst)) = (parts.next(), parts.next()) {
                table.insert(src, dst);
            }
        }
        table
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let table = Self::parse(&raw);
        tracing::debug!(entries = table.len(), path = %path.display(), "loaded script table");
        Ok(table)
    }

    pub fn insert(&mut self, src: &str, dst: &str) {
        self.max_key_len = self.max_key_len.max(src.chars().count());
        self.map.insert(src.to_string(), dst.to_string());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Replace mapped sequences left to right, longest match first.
    pub fn convert(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }

        // byte offsets of every char boundary, including the end
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i + 1 < bounds.len() {
            let longest = self.max_key_len.min(bounds.len() - 1 - i).max(1);
            let hit = (1..=longest).rev().find_map(|n| {
                self.map
                    .get(&text[bounds[i]..bounds[i + n]])
                    .map(|dst| (n, dst))
            });
            match hit {
                Some((n, dst)) => {
                    out.push_str(dst);
                    i += n;
                }
                None => {
                    out.push_str(&text[bounds[i]..bounds[i + 1]]);
                    i += 1;
                }
            }
        }
        out
    }

    /// Copy of `doc` with every line's words converted. Timing is untouched.
    pub fn convert_document(&self, doc: &LyricsDocument) -> LyricsDocument {
        LyricsDocument {
            error: doc.error,
            sync_type: doc.sync_type.clone(),
            lines: doc
                .lines
                .iter()
                .map(|l| LyricLine {
                    words: self.convert(&l.words),
                    ..l.clone()
                })
                .collect(),
        }
    }
}
