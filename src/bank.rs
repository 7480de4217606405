//! Term-bank assembly — entries in, ordered term records out.
//!
//! Per-entry failures are collected, never propagated: one bad card costs
//! one card, not the run.

use crate::headword::{choose_reading, extract_readings, split_annotations};
use crate::markup::{self, MalformedEntry};
use crate::model::{Definition, Entry, TermRecord};
use crate::{content, split};

/// A dropped entry: the first headword (for the warning) and the reason.
pub type Dropped = (String, MalformedEntry);

/// Outcome of a full conversion run.
pub struct Bank {
    pub records: Vec<TermRecord>,
    pub dropped: Vec<Dropped>,
}

/// Convert a whole DSL source into a term bank.
pub fn build(source: &str) -> Bank {
    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for entry in split::entries(source) {
        match convert_entry(&entry, records.len()) {
            Ok(mut entry_records) => records.append(&mut entry_records),
            Err(reason) => {
                let headword = entry.headwords.first().cloned().unwrap_or_default();
                dropped.push((headword, reason));
            }
        }
    }

    Bank { records, dropped }
}

/// Convert one card. A card with several headwords yields one record per
/// headword, all sharing the rendered body. `next_sequence` keeps ids
/// unique across the whole bank.
fn convert_entry(entry: &Entry, next_sequence: usize) -> Result<Vec<TermRecord>, MalformedEntry> {
    let mut nodes = markup::parse(&entry.body)?;
    let mut readings = extract_readings(&mut nodes);
    let rendered = content::render(&nodes);

    let mut records = Vec::with_capacity(entry.headwords.len());
    for raw in &entry.headwords {
        let headword = split_annotations(raw);
        let reading = choose_reading(&headword.display, &mut readings);
        records.push(TermRecord {
            term: headword.display,
            reading,
            definition_tags: String::new(),
            rules: String::new(),
            score: 0,
            definitions: vec![Definition::structured(rendered.clone())],
            sequence: next_sequence + records.len(),
            term_tags: headword.homonym.unwrap_or_default(),
        });
    }
    Ok(records)
}

/// Serialize the record list as the final term-bank JSON array.
pub fn to_json(records: &[TermRecord], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    }
}
