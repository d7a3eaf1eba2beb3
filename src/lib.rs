pub mod dictionary;
pub mod handlers;
pub mod source;

pub use cedict_index::{DictionaryEntry, LookupResult, Segment, Tone, WordIndex};
pub use dictionary::{CACHE_KEY, Dictionary, InitError, NotReady};
pub use handlers::{AppState, router};
pub use pinyin_tones::{render, render_syllable, tone_of};
pub use source::{FileCache, FileSource, LoadMode, NoCache, PayloadCache, PayloadSource};
