// CSV tables: token counts, OCR input lists, and ground-truth issue notes.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use tracing::warn;

use crate::tokens::TokenCounts;

/// Write `token,count` rows in byte-wise token order, with a header.
pub fn write_token_table<W: Write>(writer: W, counts: &TokenCounts) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["token", "count"])?;
    for (token, count) in counts.iter() {
        let count = count.to_string();
        wtr.write_record([token, count.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a token table to `path`.
pub fn write_token_table_file(path: &Path, counts: &TokenCounts) -> Result<()> {
    super::ensure_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_token_table(file, counts)
}

/// Write the `id,path` work list consumed by the OCR tool.
pub fn write_input_csv(path: &Path, rows: &[(String, String)]) -> Result<()> {
    super::ensure_parent_dir(path)?;
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["id", "path"])?;
    for (id, item_path) in rows {
        wtr.write_record([id, item_path])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read `id,issue` rows describing known-bad ground truth.
///
/// Rows without exactly two fields, or with a non-integer id, are logged and
/// skipped: this file is hand-maintained notes, not pipeline output.
pub fn read_ground_truth_issues<R: Read>(reader: R) -> Result<Vec<(u64, String)>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut issues = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.len() != 2 {
            warn!(row = ?row, "Invalid row in bad ground truth data");
            continue;
        }
        let Ok(id) = row[0].trim().parse::<u64>() else {
            warn!(row = ?row, "Invalid image ID in bad ground truth data");
            continue;
        };
        issues.push((id, row[1].to_string()));
    }
    Ok(issues)
}
