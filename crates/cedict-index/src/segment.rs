use cedict_types::Segment;
use pinyin_tones::{Tone, syllable_tones};

use crate::index::WordIndex;
use crate::lookup::char_bounds;

impl WordIndex {
    /// Forward greedy maximum-match segmentation.
    ///
    /// Only words starting exactly at the cursor are considered. The spans
    /// returned are contiguous and cover `line` exactly; characters that start
    /// no indexed word come back as unmatched one-character spans.
    pub fn segment(&self, line: &str) -> Vec<Segment> {
        let bounds = char_bounds(line);
        let total = bounds.len() - 1;
        let mut segments = Vec::new();
        let mut cursor = 0usize;

        while cursor < total {
            let longest = self.max_word_len.min(total - cursor);
            let hit = (1..=longest).rev().find_map(|len| {
                let word = &line[bounds[cursor]..bounds[cursor + len]];
                self.words.get(word).map(|entries| (len, word, entries))
            });

            let segment = match hit {
                Some((len, word, entries)) => Segment {
                    start: cursor,
                    end: cursor + len,
                    text: word.to_string(),
                    entries: Some(entries.clone()),
                },
                None => Segment {
                    start: cursor,
                    end: cursor + 1,
                    text: line[bounds[cursor]..bounds[cursor + 1]].to_string(),
                    entries: None,
                },
            };
            cursor = segment.end;
            segments.push(segment);
        }

        segments
    }

    /// One tone slot per character of `line`.
    ///
    /// Inside a matched word, syllable `i` of the first entry's pinyin is
    /// assigned to character `i`. This assumes one syllable per character and
    /// is not checked; characters without a syllable get `None`. Unmatched
    /// characters are not index keys at any length, so they get `None` too.
    pub fn line_tones(&self, line: &str) -> Vec<Option<Tone>> {
        let mut tones = Vec::with_capacity(line.len());
        for segment in self.segment(line) {
            match segment.entries.as_deref().and_then(<[_]>::first) {
                Some(entry) => {
                    let syllables = syllable_tones(&entry.pinyin);
                    tones.extend((0..segment.len()).map(|i| syllables.get(i).copied().flatten()));
                }
                None => tones.extend(std::iter::repeat_n(None, segment.len())),
            }
        }
        tones
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
                .map(|(w, py)| DictionaryEntry::new(w, w, py, Vec::<String>::new())),
        )
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn greedy_from_the_left() {
        let index = make_index(&[
            ("我", "wo3"),
            ("是", "shi4"),
            ("中国", "zhong1 guo2"),
            ("中国人", "zhong1 guo2 ren2"),
            ("人", "ren2"),
        ]);
        let segments = index.segment("我是中国人");
        assert_eq!(texts(&segments), vec!["我", "是", "中国人"]);
        assert!(segments.iter().all(Segment::matched));
    }

    #[test]
    fn differs_from_point_lookup() {
        // Greedy takes 研究生 first and strands 命; point lookup at 命 finds 生命.
        let index = make_index(&[
            ("研究", "yan2 jiu1"),
            ("研究生", "yan2 jiu1 sheng1"),
            ("生命", "sheng1 ming4"),
        ]);
        let segments = index.segment("研究生命");
        assert_eq!(texts(&segments), vec!["研究生", "命"]);
        assert!(!segments[1].matched());
        assert_eq!(index.lookup_at("研究生命", 3).unwrap().word, "生命");
    }

    #[test]
    fn empty_line_has_no_segments() {
        let index = make_index(&[("好", "hao3")]);
        assert!(index.segment("").is_empty());
    }

    #[test]
    fn unknown_text_splits_into_characters() {
        let index = make_index(&[("好", "hao3")]);
        let segments = index.segment("abc，");
        assert_eq!(texts(&segments), vec!["a", "b", "c", "，"]);
        assert!(segments.iter().all(|s| !s.matched() && s.len() == 1));
    }

    #[test]
    fn line_tones_align_syllables_with_characters() {
        let index = make_index(&[("你好", "ni3 hao3"), ("吗", "ma5")]);
        assert_eq!(
            index.line_tones("你好吗?"),
            vec![
                Some(Tone::Third),
                Some(Tone::Third),
                Some(Tone::Neutral),
                None
            ]
        );
    }

    #[test]
    fn line_tones_leave_surplus_characters_unmarked() {
        let index = make_index(&[("一会儿", "yi1 hui4")]);
        assert_eq!(
            index.line_tones("一会儿"),
            vec![Some(Tone::First), Some(Tone::Fourth), None]
        );
    }

    #[test]
    fn unmatched_characters_get_no_tone() {
        let index = make_index(&[("研究生", "yan2 jiu1 sheng1"), ("生命", "sheng1 ming4")]);
        assert_eq!(
            index.line_tones("研究生命a"),
            vec![
                Some(Tone::Second),
                Some(Tone::First),
                Some(Tone::First),
                None,
                None
            ]
        );
    }
}
