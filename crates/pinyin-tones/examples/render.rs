use std::env;

use anyhow::{Result, bail};
use pinyin_tones::{render, syllable_tones};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: cargo run -p pinyin-tones --example render -- <syllable>...");
    }

    let pinyin = args.join(" ");
    println!("Numbered : {pinyin}");
    println!("Rendered : {}", render(&pinyin));
    for (syllable, tone) in pinyin.split_whitespace().zip(syllable_tones(&pinyin)) {
        match tone {
            Some(tone) => println!("  {:<8} {} ({})", syllable, tone.number(), tone),
            None => println!("  {:<8} -", syllable),
        }
    }

    Ok(())
}
