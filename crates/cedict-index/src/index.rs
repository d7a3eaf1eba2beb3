use std::collections::HashMap;

use cedict_types::DictionaryEntry;
use serde_json::Value;
use tracing::info;

use crate::normalize::{PayloadError, normalize_with_report};

/// Upper bound on the window a lookup will probe, in characters.
pub const MAX_WORD_LEN: usize = 8;

/// Immutable `simplified → entries` map shared by lookup and segmentation.
///
/// Entries for the same form accumulate in insertion order; callers treat the
/// first entry as canonical, so that order is part of the contract.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    pub(crate) words: HashMap<String, Vec<DictionaryEntry>>,
    pub(crate) max_word_len: usize,
    entry_count: usize,
}

impl WordIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group entries by simplified form. Entries with an empty form are dropped.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DictionaryEntry>,
    {
        let mut words: HashMap<String, Vec<DictionaryEntry>> = HashMap::new();
        let mut longest = 0usize;
        let mut entry_count = 0usize;

        for entry in entries {
            if entry.simplified.is_empty() {
                continue;
            }
            longest = longest.max(entry.simplified.chars().count());
            entry_count += 1;
            words
                .entry(entry.simplified.clone())
                .or_default()
                .push(entry);
        }

        let max_word_len = longest.min(MAX_WORD_LEN);
        info!(
            "indexed {} words ({} entries), max word length {}",
            words.len(),
            entry_count,
            max_word_len
        );
        Self {
            words,
            max_word_len,
            entry_count,
        }
    }

    /// Normalize a decoded payload and index it.
    pub fn from_payload(payload: &Value) -> Result<Self, PayloadError> {
        let (entries, report) = normalize_with_report(payload)?;
        info!(
            "normalized {} records into {} entries ({} skipped)",
            report.records, report.entries, report.skipped
        );
        Ok(Self::build(entries))
    }

    /// Parse raw JSON bytes, normalize and index them.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let payload: Value = serde_json::from_slice(bytes)?;
        Self::from_payload(&payload)
    }

    /// Exact lookup by simplified form.
    pub fn entries(&self, word: &str) -> Option<&[DictionaryEntry]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct simplified forms.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Longest key length in characters, capped at [`MAX_WORD_LEN`].
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(simplified: &str, pinyin: &str) -> DictionaryEntry {
        DictionaryEntry::new(simplified, simplified, pinyin, [pinyin])
    }

    #[test]
    fn accumulates_entries_in_insertion_order() {
        let index = WordIndex::build([entry("好", "hao3"), entry("你", "ni3"), entry("好", "hao4")]);
        let readings: Vec<&str> = index
            .entries("好")
            .unwrap()
            .iter()
            .map(|e| e.pinyin.as_str())
            .collect();
        assert_eq!(readings, vec!["hao3", "hao4"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entry_count(), 3);
    }

    #[test]
    fn caps_max_word_len() {
        let index = WordIndex::build([entry("中华人民共和国国务院总理", "x"), entry("中", "zhong1")]);
        assert_eq!(index.max_word_len(), MAX_WORD_LEN);

        let short = WordIndex::build([entry("中国", "zhong1 guo2"), entry("中", "zhong1")]);
        assert_eq!(short.max_word_len(), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let index = WordIndex::build([entry("你好", "ni3 hao3")]);
        assert_eq!(index.max_word_len(), 2);
    }

    #[test]
    fn drops_empty_keys() {
        let index = WordIndex::build([entry("", "x")]);
        assert!(index.is_empty());
        assert_eq!(index.max_word_len(), 0);
        assert!(!index.contains(""));
    }

    #[test]
    fn empty_index_has_no_words() {
        let index = WordIndex::empty();
        assert!(index.is_empty());
        assert!(index.entries("好").is_none());
    }
}
