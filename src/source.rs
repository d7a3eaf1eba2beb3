//! Where the raw dictionary payload comes from, and where it is kept between
//! runs.
//!
//! Both sides are traits so the service can swap in a network fetcher or a
//! different store; the file-backed implementations here are what the binary
//! uses.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use memmap2::Mmap;
use thiserror::Error;
use tracing::debug;

/// Strategy for reading the dictionary file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file (fast, zero-copy).
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

impl LoadMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "mmap" => Some(LoadMode::Mmap),
            "owned" => Some(LoadMode::Owned),
            _ => None,
        }
    }
}

/// Raw payload bytes, either mapped or owned.
pub enum Payload {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Payload {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Payload::Mmap(m) => m.as_ref(),
            Payload::Owned(v) => v.as_slice(),
        }
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dictionary source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fetches the raw dictionary payload.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Short description for logs (a path or URL).
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Payload, SourceError>;
}

/// Key-value store that keeps the raw payload across runs.
#[async_trait]
pub trait PayloadCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError>;
}

/// Payload stored in a local JSON file.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    mode: LoadMode,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, mode: LoadMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PayloadSource for FileSource {
    fn describe(&self) -> String {
        format!("{} ({:?})", self.path.display(), self.mode)
    }

    async fn fetch(&self) -> Result<Payload, SourceError> {
        let path = self.path.clone();
        let mode = self.mode;
        tokio::task::spawn_blocking(move || load_file(&path, mode))
            .await
            .map_err(|e| SourceError::Unavailable(format!("load task failed: {e}")))?
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Payload, SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    match mode {
        LoadMode::Mmap => {
            // The map is read once to build the index and then dropped.
            unsafe { Mmap::map(&file) }.map(Payload::Mmap).map_err(io_err)
        }
        LoadMode::Owned => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf).map_err(io_err)?;
            Ok(Payload::Owned(buf))
        }
    }
}

/// One file per key under `dir`.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl PayloadCache for FileCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no cached payload at {}", path.display());
                Ok(None)
            }
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    async fn set(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(cache_io(&self.dir))?;
        tokio::fs::write(&tmp, bytes).await.map_err(cache_io(&tmp))?;
        tokio::fs::rename(&tmp, &path).await.map_err(cache_io(&path))?;
        Ok(())
    }
}

fn cache_io(path: &Path) -> impl FnOnce(io::Error) -> CacheError + use<> {
    let path = path.to_path_buf();
    move |source| CacheError::Io { path, source }
}

/// Cache that never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

#[async_trait]
impl PayloadCache for NoCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _bytes: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }
}
