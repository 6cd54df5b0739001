// JSON Lines reading and writing.
//
// A line that fails to parse stops the whole stream. The error names the
// source and the 1-based line number.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse every record from a JSONL reader. Blank lines are ignored.
///
/// `source` is only used in error messages.
pub fn parse_records<T, R>(reader: R, source: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read {source} line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse {source} line {line_no}: {}", line.trim()))?;
        records.push(record);
    }
    Ok(records)
}

/// Read every record from a JSONL file.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_records(BufReader::new(file), &path.display().to_string())
}

/// Write one record as a single JSON line.
pub fn write_record<T: Serialize, W: Write>(writer: &mut W, record: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn test_parses_lines_and_skips_blanks() {
        let input = "{\"id\": 1}\n\n{\"id\": 2}\n";
        let rows: Vec<Row> = parse_records(input.as_bytes(), "test").unwrap();
        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[test]
    fn test_bad_line_names_line_number() {
        let input = "{\"id\": 1}\n{\"id\": \n";
        let err = parse_records::<Row, _>(input.as_bytes(), "out.jsonl").unwrap_err();
        assert!(
            err.to_string().contains("out.jsonl line 2"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_write_record_appends_newline() {
        let mut buf = Vec::new();
        write_record(&mut buf, &Row { id: 9 }).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"id\":9}\n");
    }
}
