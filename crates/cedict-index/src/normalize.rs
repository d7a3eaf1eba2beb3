use std::collections::HashMap;

use cedict_types::DictionaryEntry;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid dictionary json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dictionary payload must be an array or object of records, got {0}")]
    Malformed(&'static str),
}

/// Counts gathered while normalizing a payload.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NormalizeReport {
    pub records: usize,
    pub skipped: usize,
    pub entries: usize,
}

/// Raw record fields. Everything but the key is decoded leniently so one bad
/// value only empties the part of the record it belongs to.
#[derive(Deserialize)]
struct RawFields {
    simplified: Option<Value>,
    #[serde(default)]
    traditional: Option<Value>,
    #[serde(default)]
    pinyin: Option<Value>,
    #[serde(default)]
    definitions: Option<Value>,
}

/// A raw record after its shape has been decided.
enum RawRecord {
    Flat {
        simplified: String,
        traditional: String,
        readings: Vec<String>,
        definitions: Vec<String>,
    },
    Grouped {
        simplified: String,
        traditional: String,
        readings: Vec<String>,
        definitions: HashMap<String, Vec<String>>,
    },
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// `pinyin` is one reading or a list; non-string items are ignored.
fn readings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(reading)) => vec![reading.clone()],
        Some(Value::Array(items)) => string_items(items),
        _ => Vec::new(),
    }
}

impl RawRecord {
    fn decode(value: &Value) -> Option<Self> {
        let fields = match RawFields::deserialize(value) {
            Ok(fields) => fields,
            Err(err) => {
                debug!("skipping undecodable record: {err}");
                return None;
            }
        };
        let simplified = match fields.simplified {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return None,
        };
        let traditional = match fields.traditional {
            Some(Value::String(t)) => t,
            _ => String::new(),
        };
        let readings = readings(fields.pinyin.as_ref());

        Some(match fields.definitions {
            Some(Value::Object(by_reading)) => {
                let definitions = by_reading
                    .into_iter()
                    .map(|(reading, block)| {
                        let defs = block.as_str().map(split_definitions).unwrap_or_default();
                        (reading, defs)
                    })
                    .collect();
                RawRecord::Grouped {
                    simplified,
                    traditional,
                    readings,
                    definitions,
                }
            }
            Some(Value::Array(items)) => RawRecord::Flat {
                simplified,
                traditional,
                readings,
                definitions: string_items(&items),
            },
            _ => RawRecord::Flat {
                simplified,
                traditional,
                readings,
                definitions: Vec::new(),
            },
        })
    }

    fn expand_into(self, out: &mut Vec<DictionaryEntry>) {
        match self {
            RawRecord::Flat {
                simplified,
                traditional,
                readings,
                definitions,
            } => {
                if readings.is_empty() {
                    out.push(DictionaryEntry {
                        simplified,
                        traditional,
                        pinyin: String::new(),
                        definitions,
                    });
                    return;
                }
                for pinyin in readings {
                    out.push(DictionaryEntry {
                        simplified: simplified.clone(),
                        traditional: traditional.clone(),
                        pinyin,
                        definitions: definitions.clone(),
                    });
                }
            }
            RawRecord::Grouped {
                simplified,
                traditional,
                readings,
                definitions,
            } => {
                for pinyin in readings {
                    let definitions = definitions.get(&pinyin).cloned().unwrap_or_default();
                    out.push(DictionaryEntry {
                        simplified: simplified.clone(),
                        traditional: traditional.clone(),
                        pinyin,
                        definitions,
                    });
                }
            }
        }
    }
}

fn split_definitions(block: &str) -> Vec<String> {
    block
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flatten a raw payload into entries, in document order.
pub fn normalize(payload: &Value) -> Result<Vec<DictionaryEntry>, PayloadError> {
    normalize_with_report(payload).map(|(entries, _)| entries)
}

/// Parse JSON bytes and normalize them.
pub fn normalize_slice(bytes: &[u8]) -> Result<Vec<DictionaryEntry>, PayloadError> {
    let payload: Value = serde_json::from_slice(bytes)?;
    normalize(&payload)
}

/// Like [`normalize`], also reporting how many records were skipped.
///
/// The top level is either an array of records or an object whose values are
/// records. Records without a usable `simplified` form are dropped.
pub fn normalize_with_report(
    payload: &Value,
) -> Result<(Vec<DictionaryEntry>, NormalizeReport), PayloadError> {
    let records: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        Value::Null => return Err(PayloadError::Malformed("null")),
        Value::Bool(_) => return Err(PayloadError::Malformed("a boolean")),
        Value::Number(_) => return Err(PayloadError::Malformed("a number")),
        Value::String(_) => return Err(PayloadError::Malformed("a string")),
    };

    let mut report = NormalizeReport {
        records: records.len(),
        ..NormalizeReport::default()
    };
    let mut entries = Vec::with_capacity(records.len());
    for value in records {
        match RawRecord::decode(value) {
            Some(record) => record.expand_into(&mut entries),
            None => report.skipped += 1,
        }
    }
    report.entries = entries.len();
    if report.skipped > 0 {
        debug!("skipped {} of {} records", report.skipped, report.records);
    }
    Ok((entries, report))
}
