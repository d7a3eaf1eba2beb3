use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use hanzi_reader::{
    AppState, Dictionary, FileCache, FileSource, LoadMode, NoCache, PayloadCache, router,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DICT_PATH: &str = "cedict.json";
const DEFAULT_CACHE_DIR: &str = ".cache/hanzi-reader";
const DEFAULT_MAX_TEXT_LEN: usize = 4096;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using dictionary at {} (mode: {:?})",
        config.dict_path.display(),
        config.load_mode
    );
    match &config.cache_dir {
        Some(dir) => info!("caching dictionary payload in {}", dir.display()),
        None => info!("dictionary payload cache disabled"),
    }
    if config.disable_http_cache {
        info!("cache headers disabled");
    }

    let dictionary = Arc::new(Dictionary::new());
    let source = FileSource::new(&config.dict_path, config.load_mode);
    let cache: Box<dyn PayloadCache> = match &config.cache_dir {
        Some(dir) => Box::new(FileCache::new(dir)),
        None => Box::new(NoCache),
    };

    // Serve right away; index-backed routes answer 503 until this finishes.
    let init = Arc::clone(&dictionary);
    tokio::spawn(async move {
        match init
            .initialize(&source, cache.as_ref(), |msg| info!("{msg}"))
            .await
        {
            Ok(index) => info!(
                "dictionary ready: {} words, {} entries",
                index.len(),
                index.entry_count()
            ),
            Err(err) => error!("dictionary initialization failed: {err}"),
        }
    });

    let state = AppState {
        dictionary,
        max_text_len: config.max_text_len,
        disable_cache: config.disable_http_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    dict_path: PathBuf,
    load_mode: LoadMode,
    cache_dir: Option<PathBuf>,
    max_text_len: usize,
    disable_http_cache: bool,
}

fn load_config() -> Config {
    let mut no_cache = false;
    let mut disable_http_cache = false;
    let mut cli_dict: Option<PathBuf> = None;
    let mut cli_cache_dir: Option<PathBuf> = None;
    let mut cli_load_mode: Option<LoadMode> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => no_cache = true,
            "--no-http-cache" => disable_http_cache = true,
            "--dict" => cli_dict = args.next().map(PathBuf::from),
            "--cache-dir" => cli_cache_dir = args.next().map(PathBuf::from),
            _ => {
                if let Some(path) = arg.strip_prefix("--dict=") {
                    cli_dict = Some(PathBuf::from(path));
                } else if let Some(dir) = arg.strip_prefix("--cache-dir=") {
                    cli_cache_dir = Some(PathBuf::from(dir));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_load_mode = LoadMode::parse(mode);
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let dict_path = cli_dict
        .or_else(|| env::var("CEDICT_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DICT_PATH));
    let load_mode = cli_load_mode
        .or_else(|| {
            env::var("CEDICT_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(LoadMode::parse)
        })
        .unwrap_or(LoadMode::Mmap);
    let cache_dir = if no_cache {
        None
    } else {
        Some(
            cli_cache_dir
                .or_else(|| env::var("CEDICT_CACHE_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
        )
    };
    let max_text_len = env::var("MAX_TEXT_LEN")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_TEXT_LEN);

    Config {
        host,
        port,
        dict_path,
        load_mode,
        cache_dir,
        max_text_len,
        disable_http_cache,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
