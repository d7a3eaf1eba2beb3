//! Numbered-tone pinyin helpers: tone extraction and diacritic rendering.
//!
//! The crate has no dictionary dependency; it works on whatever pinyin string
//! a lookup produced (`ni3`, `hao3`, `ni3 hao3`, `lv4`).
//!
//! # How it works
//! 1. The trailing ASCII digit, if any, is the tone (`5` is neutral).
//! 2. The digit is stripped to get the base syllable.
//! 3. One vowel is picked: `a`, else `o`, else `e`, else the `u` of `iu`,
//!    else the `i` of `ui`, else the first of `i`, `u`, `v`, `ü`.
//! 4. That vowel is swapped for its marked form; `v` marks as `ü`.
//!
//! Anything that does not fit (no digit, no vowel, neutral tone) comes back
//! unmarked rather than failing.
//!
//! # Example
//! ```rust
//! use pinyin_tones::{Tone, render, tone_of};
//!
//! assert_eq!(render("ni3 hao3"), "nǐ hǎo");
//! assert_eq!(tone_of("ma"), Some(Tone::Neutral));
//! ```
//!
//! For a runnable demo, see `cargo run -p pinyin-tones --example render -- ni3 hao3`.

use std::fmt;

/// Mandarin tone class.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tone {
    First,
    Second,
    Third,
    Fourth,
    Neutral,
}

impl Tone {
    /// Parse a tone digit (`1`-`5`).
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Tone::First),
            '2' => Some(Tone::Second),
            '3' => Some(Tone::Third),
            '4' => Some(Tone::Fourth),
            '5' => Some(Tone::Neutral),
            _ => None,
        }
    }

    /// Tone number as written in numbered pinyin; neutral is `5`.
    pub fn number(self) -> u8 {
        match self {
            Tone::First => 1,
            Tone::Second => 2,
            Tone::Third => 3,
            Tone::Fourth => 4,
            Tone::Neutral => 5,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Tone::Neutral
    }

    fn column(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::First => "first",
            Tone::Second => "second",
            Tone::Third => "third",
            Tone::Fourth => "fourth",
            Tone::Neutral => "neutral",
        })
    }
}

// Column 5 is the bare vowel.
const MARKS: [(char, [char; 5]); 7] = [
    ('a', ['ā', 'á', 'ǎ', 'à', 'a']),
    ('e', ['ē', 'é', 'ě', 'è', 'e']),
    ('i', ['ī', 'í', 'ǐ', 'ì', 'i']),
    ('o', ['ō', 'ó', 'ǒ', 'ò', 'o']),
    ('u', ['ū', 'ú', 'ǔ', 'ù', 'u']),
    ('v', ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü']),
];

/// Tone of a single syllable.
///
/// A trailing `1`-`4` is that tone; a trailing `5` or no digit at all is
/// neutral. Empty input and digits outside `1`-`5` give `None`.
pub fn tone_of(syllable: &str) -> Option<Tone> {
    match syllable.trim().chars().next_back()? {
        c if c.is_ascii_digit() => Tone::from_digit(c),
        _ => Some(Tone::Neutral),
    }
}

/// Tone of each space-separated syllable, in order.
///
/// Index `i` of the result lines up with character `i` of the word the pinyin
/// belongs to, assuming one syllable per character.
pub fn syllable_tones(pinyin: &str) -> Vec<Option<Tone>> {
    pinyin.split_whitespace().map(tone_of).collect()
}

/// Render a multi-syllable pinyin string; syllables are handled independently.
pub fn render(pinyin: &str) -> String {
    pinyin
        .split(' ')
        .map(render_syllable)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one numbered-tone syllable with its diacritic.
pub fn render_syllable(syllable: &str) -> String {
    let Some((base, digit)) = split_tone_digit(syllable) else {
        return syllable.to_string();
    };
    let tone = match Tone::from_digit(digit) {
        Some(tone) if !tone.is_neutral() => tone,
        _ => return base.to_string(),
    };
    let Some((at, vowel)) = mark_target(base) else {
        return base.to_string();
    };
    let Some(marked) = marked_vowel(vowel, tone) else {
        return base.to_string();
    };

    let mut out = String::with_capacity(base.len() + marked.len_utf8());
    out.push_str(&base[..at]);
    out.push(marked);
    out.push_str(&base[at + vowel.len_utf8()..]);
    out
}

fn split_tone_digit(syllable: &str) -> Option<(&str, char)> {
    let digit = syllable.chars().next_back().filter(char::is_ascii_digit)?;
    Some((&syllable[..syllable.len() - 1], digit))
}

/// Byte offset and vowel that carries the tone mark.
fn mark_target(base: &str) -> Option<(usize, char)> {
    for vowel in ['a', 'o', 'e'] {
        if let Some(at) = base.find(vowel) {
            return Some((at, vowel));
        }
    }
    if let Some(at) = base.find("iu") {
        return Some((at + 1, 'u'));
    }
    if let Some(at) = base.find("ui") {
        return Some((at + 1, 'i'));
    }
    base.char_indices()
        .find(|(_, c)| matches!(c, 'i' | 'u' | 'v' | 'ü'))
}

fn marked_vowel(vowel: char, tone: Tone) -> Option<char> {
    MARKS
        .iter()
        .find(|(bare, _)| *bare == vowel)
        .map(|(_, row)| row[tone.column()])
}
