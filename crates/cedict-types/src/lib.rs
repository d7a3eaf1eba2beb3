//! Shared types for a CC-CEDICT style dictionary.
//!
//! The goal is one canonical shape for everything downstream of the raw
//! payload decoder: a [`DictionaryEntry`] is one sense of one word, a
//! [`LookupResult`] is a hit from a point query, and a [`Segment`] is one span
//! of a segmented line.
//!
//! All offsets are character offsets (Unicode scalar values), end exclusive.
//!
//! ```rust
//! use cedict_types::{DictionaryEntry, LookupResult};
//!
//! let entry = DictionaryEntry::new("你好", "你好", "ni3 hao3", ["hello", "hi"]);
//! let hit = LookupResult::new("你好", vec![entry], 0);
//! assert_eq!(hit.end, 2);
//! assert_eq!(hit.canonical().unwrap().pinyin, "ni3 hao3");
//! ```

use serde::{Deserialize, Serialize};

/// One sense of one word.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Index key; entries with an empty form are never indexed.
    pub simplified: String,
    /// Carried through unchanged, may be empty.
    #[serde(default)]
    pub traditional: String,
    /// Numbered-tone pinyin, e.g. `ni3` or `ni3 hao3`.
    #[serde(default)]
    pub pinyin: String,
    /// Display order.
    #[serde(default)]
    pub definitions: Vec<String>,
}

impl DictionaryEntry {
    pub fn new<I, S>(simplified: &str, traditional: &str, pinyin: &str, definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            simplified: simplified.to_string(),
            traditional: traditional.to_string(),
            pinyin: pinyin.to_string(),
            definitions: definitions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Word matched by a point query together with its span in the queried text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub word: String,
    /// Index order; callers treat the first as canonical.
    pub entries: Vec<DictionaryEntry>,
    pub start: usize,
    pub end: usize,
}

impl LookupResult {
    /// Build a result whose span starts at `start` and covers `word`.
    pub fn new(word: &str, entries: Vec<DictionaryEntry>, start: usize) -> Self {
        Self {
            word: word.to_string(),
            entries,
            start,
            end: start + word.chars().count(),
        }
    }

    pub fn canonical(&self) -> Option<&DictionaryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the span covers character offset `offset`.
    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }
}

/// One span of a segmented line.
///
/// `entries` is `None` when no dictionary word starts at this position; the
/// span is then a single character.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub entries: Option<Vec<DictionaryEntry>>,
}

impl Segment {
    pub fn matched(&self) -> bool {
        self.entries.is_some()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_result_span_counts_chars_not_bytes() {
        let hit = LookupResult::new("中国人", Vec::new(), 4);
        assert_eq!(hit.end, 7);
        assert_eq!(hit.len(), 3);
        assert!(hit.contains(4));
        assert!(hit.contains(6));
        assert!(!hit.contains(7));
        assert!(hit.canonical().is_none());
    }

    #[test]
    fn entry_deserializes_with_missing_optional_fields() {
        let entry: DictionaryEntry = serde_json::from_str(r#"{"simplified":"好"}"#).unwrap();
        assert_eq!(entry.simplified, "好");
        assert!(entry.traditional.is_empty());
        assert!(entry.pinyin.is_empty());
        assert!(entry.definitions.is_empty());
    }

    #[test]
    fn unmatched_segment_serializes_null_entries() {
        let seg = Segment {
            start: 0,
            end: 1,
            text: "，".to_string(),
            entries: None,
        };
        let json = serde_json::to_value(&seg).unwrap();
        assert!(json["entries"].is_null());
        assert!(!seg.matched());
    }
}
