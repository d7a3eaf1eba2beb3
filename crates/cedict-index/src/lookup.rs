use cedict_types::LookupResult;
use pinyin_tones::{Tone, tone_of};

use crate::index::WordIndex;

/// Whether `c` is in the CJK Unified Ideographs block (`U+4E00..=U+9FFF`).
pub fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Byte offset of every character boundary, including the end of `text`.
pub(crate) fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(at, _)| at)
        .chain(std::iter::once(text.len()))
        .collect()
}

impl WordIndex {
    /// Longest indexed word whose span covers character offset `index`.
    ///
    /// Windows are probed from the longest length down; for a given length the
    /// smallest start wins. Offsets outside `text` and non-CJK characters give
    /// `None`.
    pub fn lookup_at(&self, text: &str, index: usize) -> Option<LookupResult> {
        // Only characters within `max_word_len` of `index` can take part, so
        // boundaries are collected for that window alone.
        let reach = self.max_word_len.max(1);
        let lo = index.saturating_sub(reach - 1);
        let hi = index.saturating_add(reach);
        let mut bounds: Vec<usize> = text
            .char_indices()
            .skip(lo)
            .take(hi - lo + 1)
            .map(|(at, _)| at)
            .collect();
        if bounds.len() <= hi - lo {
            bounds.push(text.len());
        }
        let window_end = lo + bounds.len() - 1;
        if index >= window_end {
            return None;
        }
        let ch = text[bounds[index - lo]..].chars().next()?;
        if !is_cjk(ch) {
            return None;
        }

        for len in (1..=self.max_word_len).rev() {
            for start in index.saturating_sub(len - 1)..=index {
                if start + len > window_end {
                    continue;
                }
                let candidate = &text[bounds[start - lo]..bounds[start - lo + len]];
                if let Some(entries) = self.words.get(candidate) {
                    return Some(LookupResult {
                        word: candidate.to_string(),
                        entries: entries.clone(),
                        start,
                        end: start + len,
                    });
                }
            }
        }
        None
    }

    /// Lookup for a caret position: try the character after the caret, then
    /// the one before it.
    pub fn lookup_at_caret(&self, text: &str, caret: usize) -> Option<LookupResult> {
        self.lookup_at(text, caret).or_else(|| {
            caret
                .checked_sub(1)
                .and_then(|prev| self.lookup_at(text, prev))
        })
    }

    /// Tone of a lone character, from the first entry indexed for it.
    ///
    /// Equivalent to a point lookup on the one-character text `ch`. When that
    /// entry carries several syllables the last one decides.
    pub fn character_tone(&self, ch: char) -> Option<Tone> {
        if !is_cjk(ch) {
            return None;
        }
        let mut buf = [0u8; 4];
        let entry = self.entries(ch.encode_utf8(&mut buf))?.first()?;
        entry.pinyin.split_whitespace().next_back().and_then(tone_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cedict_types::DictionaryEntry;

    fn make_index(words: &[(&str, &str)]) -> WordIndex {
        WordIndex::build(
            words
                .iter()
                .map(|(w, py)| DictionaryEntry::new(w, w, py, [format!("def of {w}")])),
        )
    }

    #[test]
    fn prefers_longest_covering_word() {
        let index = make_index(&[("中", "zhong1"), ("中国", "zhong1 guo2"), ("中国人", "zhong1 guo2 ren2")]);
        let hit = index.lookup_at("我是中国人", 3).unwrap();
        assert_eq!(hit.word, "中国人");
        assert_eq!((hit.start, hit.end), (2, 5));
    }

    #[test]
    fn equal_length_tie_goes_to_smallest_start() {
        // 国人 and 人民 are both length 2 and both cover offset 2 of 中国人民.
        let index = make_index(&[("国人", "guo2 ren2"), ("人民", "ren2 min2"), ("人", "ren2")]);
        let hit = index.lookup_at("中国人民", 2).unwrap();
        assert_eq!(hit.word, "国人");
        assert_eq!(hit.start, 1);
    }

    #[test]
    fn shorter_words_are_shadowed_inside_longer_ones() {
        let index = make_index(&[("学", "xue2"), ("大学", "da4 xue2")]);
        let hit = index.lookup_at("大学", 1).unwrap();
        assert_eq!(hit.word, "大学");
    }

    #[test]
    fn rejects_out_of_range_and_non_cjk() {
        let index = make_index(&[("好", "hao3")]);
        assert!(index.lookup_at("好", 1).is_none());
        assert!(index.lookup_at("", 0).is_none());
        assert!(index.lookup_at("a好", 0).is_none());
        assert!(index.lookup_at("好，", 1).is_none());
        assert!(index.lookup_at("a好", 1).is_some());
    }

    #[test]
    fn window_does_not_run_past_text_end() {
        let index = make_index(&[("你好吗", "ni3 hao3 ma5"), ("好", "hao3")]);
        let hit = index.lookup_at("你好", 1).unwrap();
        assert_eq!(hit.word, "好");
    }

    #[test]
    fn offsets_deep_into_long_text_stay_in_characters() {
        let index = make_index(&[("中国人", "zhong1 guo2 ren2"), ("人", "ren2")]);
        let text = format!("{}我是中国人", "a，好".repeat(500));
        let hit = index.lookup_at(&text, 1503).unwrap();
        assert_eq!(hit.word, "中国人");
        assert_eq!((hit.start, hit.end), (1502, 1505));
        assert_eq!(index.lookup_at(&text, 1504).unwrap().start, 1502);
        assert!(index.lookup_at(&text, 1505).is_none());
    }

    #[test]
    fn empty_index_finds_nothing() {
        assert!(WordIndex::empty().lookup_at("你好", 0).is_none());
    }

    #[test]
    fn caret_falls_back_to_previous_character() {
        let index = make_index(&[("你好", "ni3 hao3")]);
        let hit = index.lookup_at_caret("你好。", 2).unwrap();
        assert_eq!(hit.word, "你好");
        assert!(index.lookup_at_caret("。", 0).is_none());
    }

    #[test]
    fn character_tone_uses_first_entry() {
        let index = WordIndex::build([
            DictionaryEntry::new("好", "好", "hao3", ["good"]),
            DictionaryEntry::new("好", "好", "hao4", ["to like"]),
            DictionaryEntry::new("吗", "嗎", "ma5", ["question particle"]),
        ]);
        assert_eq!(index.character_tone('好'), Some(Tone::Third));
        assert_eq!(index.character_tone('吗'), Some(Tone::Neutral));
        assert_eq!(index.character_tone('人'), None);
        assert_eq!(index.character_tone('a'), None);
    }
}
