use std::path::PathBuf;

use cedict_index::{NormalizeReport, WordIndex, normalize_slice, normalize_with_report};

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn grouped_payload_expands_readings() {
    let index = WordIndex::from_slice(&fixture("grouped.json")).expect("build grouped");
    let ni = index.entries("泥").expect("泥 indexed");
    assert_eq!(ni.len(), 2);
    assert_eq!(ni[0].pinyin, "ni2");
    assert_eq!(ni[0].definitions, vec!["mud", "clay", "paste", "pulp"]);
    assert_eq!(ni[1].pinyin, "ni4");
    assert_eq!(ni[1].definitions, vec!["to paste", "to plaster"]);

    let le = index.entries("了").expect("了 indexed");
    assert_eq!(le[1].pinyin, "liao3");
    assert!(le[1].definitions.is_empty());

    assert_eq!(index.entries("中国").unwrap()[0].traditional, "中國");
    assert_eq!(index.max_word_len(), 4);
}

#[test]
fn record_without_simplified_contributes_nothing() {
    let index = WordIndex::from_slice(&fixture("grouped.json")).unwrap();
    assert!(index.entries("坏").is_none());
    assert!(index.lookup_at("坏", 0).is_none());
}

#[test]
fn flat_payload_accumulates_repeated_forms() {
    let payload: serde_json::Value = serde_json::from_slice(&fixture("flat.json")).unwrap();
    let (entries, report) = normalize_with_report(&payload).unwrap();
    assert_eq!(
        report,
        NormalizeReport {
            records: 7,
            skipped: 3,
            entries: 4
        }
    );

    let index = WordIndex::build(entries);
    let hao: Vec<&str> = index
        .entries("好")
        .unwrap()
        .iter()
        .map(|e| e.pinyin.as_str())
        .collect();
    assert_eq!(hao, vec!["hao3", "hao4"]);
    assert_eq!(index.len(), 3);
}

#[test]
fn building_twice_gives_identical_answers() {
    let bytes = fixture("grouped.json");
    let first = WordIndex::from_slice(&bytes).unwrap();
    let second = WordIndex::build(normalize_slice(&bytes).unwrap());

    let probes = ["你好吗", "我是中国人", "北京大学生", "泥了好", "abc"];
    for text in probes {
        for offset in 0..text.chars().count() {
            assert_eq!(first.lookup_at(text, offset), second.lookup_at(text, offset));
        }
        assert_eq!(first.segment(text), second.segment(text));
    }
    assert_eq!(first.len(), second.len());
    assert_eq!(first.entry_count(), second.entry_count());
}
