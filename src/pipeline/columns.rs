// Compare the text files named by two columns of a CSV file.
//
// Each row is copied to the output with a `jaccard_similarity` column
// appended. Rows where either column is missing or empty get an empty
// similarity cell instead of an error, so partially-processed datasets can
// still be compared.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::info;

use crate::tokens::{jaccard, TokenCounts};

/// Name of the appended column.
pub const SIMILARITY_COLUMN: &str = "jaccard_similarity";

/// Rows read and rows that got a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnsSummary {
    pub rows: usize,
    pub compared: usize,
}

/// Stream `input` to `output`, adding a similarity column.
pub fn compare_columns<R: BufRead, W: Write>(
    input: R,
    output: W,
    column1: &str,
    column2: &str,
) -> Result<ColumnsSummary> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(input);
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(output);

    let headers = rdr.headers()?.clone();
    let idx1 = headers.iter().position(|h| h == column1);
    let idx2 = headers.iter().position(|h| h == column2);

    let mut out_headers = headers.clone();
    out_headers.push_field(SIMILARITY_COLUMN);
    wtr.write_record(&out_headers)?;

    let mut summary = ColumnsSummary {
        rows: 0,
        compared: 0,
    };

    for row in rdr.records() {
        let mut row = row?;
        // Pad short rows so the appended column lines up with the header.
        while row.len() < headers.len() {
            row.push_field("");
        }

        let similarity = match (cell(&row, idx1), cell(&row, idx2)) {
            (Some(path1), Some(path2)) => Some(compare_files(Path::new(path1), Path::new(path2))?),
            _ => None,
        };

        let mut out_row: StringRecord = row;
        match similarity {
            Some(score) => {
                out_row.push_field(&score.to_string());
                summary.compared += 1;
            }
            None => out_row.push_field(""),
        }
        wtr.write_record(&out_row)?;

        summary.rows += 1;
        if summary.rows % 1000 == 0 {
            info!(rows = summary.rows, "Processed lines");
        }
    }

    wtr.flush()?;
    info!(rows = summary.rows, compared = summary.compared, "Processed lines");
    Ok(summary)
}

/// Jaccard similarity of the text in two files.
pub fn compare_files(path1: &Path, path2: &Path) -> Result<f64> {
    let counts1 = read_counts(path1)?;
    let counts2 = read_counts(path2)?;
    Ok(jaccard(&counts1, &counts2))
}

fn read_counts(path: &Path) -> Result<TokenCounts> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(TokenCounts::from_text(&text))
}

/// Non-empty cell value at `idx`, if the column exists.
fn cell(row: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells_leave_similarity_empty() {
        let input = "id,a,b\n1,,x.txt\n";
        let mut out = Vec::new();
        let summary = compare_columns(input.as_bytes(), &mut out, "a", "b").unwrap();
        assert_eq!(summary, ColumnsSummary { rows: 1, compared: 0 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,a,b,jaccard_similarity\n1,,x.txt,\n"
        );
    }

    #[test]
    fn test_unknown_column_is_not_fatal() {
        let input = "id,a\n1,x.txt\n";
        let mut out = Vec::new();
        let summary = compare_columns(input.as_bytes(), &mut out, "a", "nope").unwrap();
        assert_eq!(summary.compared, 0);
    }

    #[test]
    fn test_compares_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "one two two").unwrap();
        std::fs::write(&b, "one two").unwrap();

        let input = format!("a,b\n{},{}\n", a.display(), b.display());
        let mut out = Vec::new();
        let summary = compare_columns(input.as_bytes(), &mut out, "a", "b").unwrap();
        assert_eq!(summary.compared, 1);
        let text = String::from_utf8(out).unwrap();
        // min 2 / max 3
        assert!(text.trim_end().ends_with(",0.6666666666666666"), "got {text}");
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let input = "a,b\n/nonexistent/a.txt,/nonexistent/b.txt\n";
        let mut out = Vec::new();
        assert!(compare_columns(input.as_bytes(), &mut out, "a", "b").is_err());
    }
}
