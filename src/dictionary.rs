//! Process-wide dictionary handle with at-most-once initialization.

use std::sync::Arc;
use std::time::Instant;

use cedict_index::{DictionaryEntry, LookupResult, PayloadError, Segment, Tone, WordIndex};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::source::{Payload, PayloadCache, PayloadSource, SourceError};

/// Cache key the raw payload is stored under.
pub const CACHE_KEY: &str = "cedict_cache_v2";

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to fetch dictionary: {0}")]
    Fetch(#[from] SourceError),
    #[error("failed to build dictionary index: {0}")]
    Payload(#[from] PayloadError),
    #[error("index build task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Returned by queries made before [`Dictionary::initialize`] has succeeded.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("dictionary not ready")]
pub struct NotReady;

/// Shared handle around a [`WordIndex`] that is built at most once.
///
/// Concurrent [`initialize`](Self::initialize) calls share one build; a failed
/// build leaves the handle not ready so a later call can retry.
#[derive(Debug, Default)]
pub struct Dictionary {
    index: OnceCell<Arc<WordIndex>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is ready from the start.
    pub fn from_index(index: WordIndex) -> Self {
        Self {
            index: OnceCell::from(Arc::new(index)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    pub fn index(&self) -> Result<&Arc<WordIndex>, NotReady> {
        self.index.get().ok_or(NotReady)
    }

    /// Load the payload (cache first, then `source`) and build the index.
    ///
    /// `on_progress` receives short human-readable status lines as the work
    /// moves along. Callers arriving while a build is running wait for it;
    /// callers arriving afterwards get the built index without any work.
    pub async fn initialize<S, C, F>(
        &self,
        source: &S,
        cache: &C,
        mut on_progress: F,
    ) -> Result<Arc<WordIndex>, InitError>
    where
        S: PayloadSource + ?Sized,
        C: PayloadCache + ?Sized,
        F: FnMut(&str) + Send,
    {
        let progress = &mut on_progress;
        let index = self
            .index
            .get_or_try_init(|| async move {
                load_index(source, cache, progress).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(index))
    }

    pub fn lookup_at(&self, text: &str, offset: usize) -> Result<Option<LookupResult>, NotReady> {
        Ok(self.index()?.lookup_at(text, offset))
    }

    pub fn lookup_at_caret(
        &self,
        text: &str,
        caret: usize,
    ) -> Result<Option<LookupResult>, NotReady> {
        Ok(self.index()?.lookup_at_caret(text, caret))
    }

    pub fn entries(&self, word: &str) -> Result<Option<&[DictionaryEntry]>, NotReady> {
        Ok(self.index()?.entries(word))
    }

    pub fn segment(&self, line: &str) -> Result<Vec<Segment>, NotReady> {
        Ok(self.index()?.segment(line))
    }

    pub fn line_tones(&self, line: &str) -> Result<Vec<Option<Tone>>, NotReady> {
        Ok(self.index()?.line_tones(line))
    }
}

async fn load_index<S, C, F>(
    source: &S,
    cache: &C,
    on_progress: &mut F,
) -> Result<WordIndex, InitError>
where
    S: PayloadSource + ?Sized,
    C: PayloadCache + ?Sized,
    F: FnMut(&str) + Send,
{
    let start = Instant::now();

    match cache.get(CACHE_KEY).await {
        Ok(Some(bytes)) => {
            info!("loaded dictionary from cache");
            on_progress("Building index...");
            match build(Payload::Owned(bytes)).await {
                Ok(index) => {
                    info!("index built in {} ms", start.elapsed().as_millis());
                    return Ok(index);
                }
                Err(InitError::Payload(err)) => {
                    warn!("cached dictionary is unusable, fetching again: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None) => {}
        Err(err) => warn!("failed to load dictionary from cache: {err}"),
    }

    info!("fetching dictionary from {}", source.describe());
    on_progress("Downloading dictionary...");
    let payload = source.fetch().await?;

    on_progress("Building index...");
    let (index, payload) = build_keeping(payload).await?;

    on_progress("Saving dictionary...");
    if let Err(err) = cache.set(CACHE_KEY, payload.as_slice()).await {
        warn!("failed to save dictionary to cache: {err}");
    }

    info!("index built in {} ms", start.elapsed().as_millis());
    Ok(index)
}

async fn build(payload: Payload) -> Result<WordIndex, InitError> {
    build_keeping(payload).await.map(|(index, _)| index)
}

/// Build off the async runtime, handing the payload back for caching.
async fn build_keeping(payload: Payload) -> Result<(WordIndex, Payload), InitError> {
    let (index, payload) = tokio::task::spawn_blocking(move || {
        let index = WordIndex::from_slice(payload.as_slice());
        (index, payload)
    })
    .await?;
    Ok((index?, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_before_initialize_are_not_ready() {
        let dict = Dictionary::new();
        assert!(!dict.is_ready());
        assert_eq!(dict.lookup_at("你好", 0), Err(NotReady));
        assert_eq!(dict.segment("你好"), Err(NotReady));
        assert!(dict.entries("你").is_err());
    }

    #[test]
    fn prebuilt_index_is_ready_immediately() {
        let dict =
            Dictionary::from_index(WordIndex::build([DictionaryEntry::new("你", "你", "ni3", ["you"])]));
        assert!(dict.is_ready());
        assert!(dict.entries("你").unwrap().is_some());
        assert!(dict.entries("好").unwrap().is_none());
    }
}
