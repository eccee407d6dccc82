/*!
 * Grouped JSONL export of the finished table.
 *
 * An adjacent, batchless transform: one pass over the flat
 * scientific-name table, grouping scientific names under each common name
 * of the chosen language, one JSON object per output line with keys in
 * sorted order.
 */

use anyhow::{Context, Result};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::enrichment::{EnrichmentRecord, Language};

/// Counts reported after a grouping run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingSummary {
    /// Number of distinct common names
    pub distinct_names: usize,
    /// Total scientific names across all groups
    pub total_names: usize,
}

/// Key under which the common name is emitted for each language
fn name_key(language: Language) -> &'static str {
    match language {
        Language::English => "english_common_name",
        Language::Japanese => "japanese_common_name",
    }
}

/// Group the flat CSV by common name and write a JSONL export
///
/// Groups appear in sorted common-name order; within a group, scientific
/// names keep their input order.
pub fn group_by_common_name<P1: AsRef<Path>, P2: AsRef<Path>>(
    input_csv: P1,
    output_jsonl: P2,
    language: Language,
) -> Result<GroupingSummary> {
    let mut reader = csv::Reader::from_path(&input_csv)
        .with_context(|| format!("Failed to open input CSV: {:?}", input_csv.as_ref()))?;

    // BTreeMap keeps the groups in sorted common-name order
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for result in reader.deserialize() {
        let record: EnrichmentRecord = result.context("Failed to parse CSV row")?;
        let common_name = match language {
            Language::English => record.english_common_name,
            Language::Japanese => record.japanese_common_name,
        };
        groups.entry(common_name).or_default().push(record.scientific_name);
    }

    let file = File::create(&output_jsonl)
        .with_context(|| format!("Failed to create output file: {:?}", output_jsonl.as_ref()))?;
    let mut writer = BufWriter::new(file);

    let mut total_names = 0;
    for (common_name, scientific_names) in &groups {
        total_names += scientific_names.len();
        // serde_json maps are sorted, matching the export contract
        let line = json!({
            (name_key(language)): common_name,
            "scientific_name_list": scientific_names,
        });
        writeln!(writer, "{}", line).context("Failed to write JSONL line")?;
    }
    writer.flush().context("Failed to flush JSONL output")?;

    Ok(GroupingSummary {
        distinct_names: groups.len(),
        total_names,
    })
}
