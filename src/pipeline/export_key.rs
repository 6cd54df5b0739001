// Move a large string field out of a JSONL file into one file per record.
//
// Useful for handing OCR text to tools that want plain files: the field is
// written to disk and replaced by a new field holding the file's path.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::io::{jsonl, write_file};

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportKeyOptions {
    /// Field to move out of each record.
    pub key: String,
    /// Field to add, holding the written file's path.
    pub new_key: String,
    /// Output path pattern; `{id}` is replaced by the record id.
    pub path_pattern: String,
}

impl ExportKeyOptions {
    /// Output path for a record id.
    pub fn path_for(&self, id: &str) -> PathBuf {
        PathBuf::from(self.path_pattern.replace("{id}", id))
    }
}

/// Process every line of `input`, writing the rewritten JSONL to `output`.
/// Returns (lines read, files written).
pub fn export_key<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    options: &ExportKeyOptions,
) -> Result<(usize, usize)> {
    let mut lines = 0;
    let mut exported = 0;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read input line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        lines += 1;
        if lines % 1000 == 0 {
            info!(lines, "Processed lines");
        }

        let mut record: Value = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse input line {line_no}: {}", line.trim()))?;
        let Some(object) = record.as_object_mut() else {
            anyhow::bail!("Input line {line_no} is not a JSON object");
        };

        // Records without the key pass through untouched.
        let value = match object.get(&options.key) {
            None | Some(Value::Null) => {
                writeln!(output, "{line}")?;
                continue;
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => anyhow::bail!(
                "Input line {line_no}: {:?} is not a string but {}",
                options.key,
                other
            ),
        };

        let id = match object.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => anyhow::bail!("Input line {line_no} has no \"id\""),
            Some(other) => other.to_string(),
        };

        let path = options.path_for(&id);
        write_file(&path, &value)?;

        object.remove(&options.key);
        object.insert(
            options.new_key.clone(),
            Value::String(path.display().to_string()),
        );
        jsonl::write_record(&mut output, &record)?;
        exported += 1;
    }

    output.flush()?;
    info!(lines, exported, "Processed lines");
    Ok((lines, exported))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_exports_and_replaces_key() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportKeyOptions {
            key: "text".to_string(),
            new_key: "text_path".to_string(),
            path_pattern: format!("{}/texts/{{id}}.txt", dir.path().display()),
        };
        let input = "{\"id\":\"a\",\"text\":\"hello\"}\n{\"id\":7,\"text\":null}\n";
        let mut out = Vec::new();
        let (lines, exported) = export_key(input.as_bytes(), &mut out, &options).unwrap();
        assert_eq!((lines, exported), (2, 1));

        let written = dir.path().join("texts/a.txt");
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "hello");

        let out = String::from_utf8(out).unwrap();
        let mut out_lines = out.lines();
        let first: Value = serde_json::from_str(out_lines.next().unwrap()).unwrap();
        assert!(first.get("text").is_none());
        assert_eq!(first["text_path"], Value::String(written.display().to_string()));
        // Null key copied through verbatim
        assert_eq!(out_lines.next().unwrap(), "{\"id\":7,\"text\":null}");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_counts_pass_through_lines() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let options = ExportKeyOptions {
            key: "text".to_string(),
            new_key: "p".to_string(),
            path_pattern: "{id}".to_string(),
        };
        let input = "{\"id\":1}\n".repeat(1500);
        let mut out = Vec::new();
        let (lines, exported) = tracing::subscriber::with_default(subscriber, || {
            export_key(input.as_bytes(), &mut out, &options).unwrap()
        });
        assert_eq!((lines, exported), (1500, 0));

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("lines=1000"), "got {logs}");
        assert!(logs.contains("lines=1500 exported=0"), "got {logs}");
    }

    #[test]
    fn test_bad_json_is_fatal() {
        let options = ExportKeyOptions {
            key: "text".to_string(),
            new_key: "p".to_string(),
            path_pattern: "{id}".to_string(),
        };
        let err = export_key("{oops\n".as_bytes(), Vec::new(), &options).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
