use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use cedict_index::{WordIndex, normalize_with_report};
use pinyin_tones::render;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p cedict-index --example stats -- <cedict.json> [line]")?;
    let line = args.next().unwrap_or_else(|| "我是北京大学的学生。".to_string());

    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let payload: serde_json::Value =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;

    let start = Instant::now();
    let (entries, report) = normalize_with_report(&payload)?;
    let index = WordIndex::build(entries);

    println!("Dictionary: {}", path.display());
    println!("Records      : {}", report.records);
    println!("Skipped      : {}", report.skipped);
    println!("Entries      : {}", index.entry_count());
    println!("Words        : {}", index.len());
    println!("Max word len : {}", index.max_word_len());
    println!("Built in     : {} ms", start.elapsed().as_millis());

    println!("\nLine: {line}");
    for segment in index.segment(&line) {
        match segment.entries.as_deref().and_then(<[_]>::first) {
            Some(entry) => println!(
                "  {:<6} {:<16} {}",
                segment.text,
                render(&entry.pinyin),
                entry.definitions.first().map(String::as_str).unwrap_or("")
            ),
            None => println!("  {:<6} -", segment.text),
        }
    }

    Ok(())
}
