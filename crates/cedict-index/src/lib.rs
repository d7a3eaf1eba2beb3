//! Build and query a word index over CC-CEDICT style JSON.
//!
//! This crate turns a raw dictionary payload into an immutable [`WordIndex`]
//! and answers the two questions a Chinese reader keeps asking:
//!
//! - which dictionary word covers this character? ([`WordIndex::lookup_at`])
//! - how does this line break into words? ([`WordIndex::segment`])
//!
//! # Features
//! - Accepts both payload shapes seen in the wild: a flat array of
//!   `{simplified, traditional, pinyin, definitions: [..]}` records, and the
//!   grouped shape where `pinyin` lists readings and `definitions` maps each
//!   reading to a `;`-separated string. Records are decoded once at the
//!   boundary ([`normalize`]) into [`DictionaryEntry`].
//! - Longest-match point lookup with a deterministic tie-break (smallest
//!   start wins among equal lengths).
//! - Forward greedy maximum-match segmentation with per-character tones
//!   ([`WordIndex::line_tones`]).
//!
//! # Example
//! ```rust
//! use cedict_index::WordIndex;
//!
//! # fn main() -> Result<(), cedict_index::PayloadError> {
//! let payload = r#"[
//!     {"simplified": "你好", "traditional": "你好", "pinyin": "ni3 hao3", "definitions": ["hello"]},
//!     {"simplified": "好", "traditional": "好", "pinyin": "hao3", "definitions": ["good"]}
//! ]"#;
//! let index = WordIndex::from_slice(payload.as_bytes())?;
//! let hit = index.lookup_at("你好吗", 1).expect("covered by 你好");
//! assert_eq!((hit.word.as_str(), hit.start, hit.end), ("你好", 0, 2));
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p cedict-index --example stats -- <cedict.json> [line]`.

pub mod index;
pub mod lookup;
pub mod normalize;
pub mod segment;

pub use cedict_types::{DictionaryEntry, LookupResult, Segment};
pub use index::{MAX_WORD_LEN, WordIndex};
pub use lookup::is_cjk;
pub use normalize::{NormalizeReport, PayloadError, normalize, normalize_slice, normalize_with_report};
pub use pinyin_tones::Tone;
