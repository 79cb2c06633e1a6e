//! JSON Lines entry parser

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::EntryParser;
use crate::types::{Entry, GridError, Result};

/// Parser for `.jsonl` files: one entry object per line
#[derive(Debug, Default)]
pub struct JsonlParser;

impl JsonlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single line. Blank and malformed lines yield None.
    fn parse_line(&self, line: &mut [u8]) -> Option<Entry> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        simd_json::from_slice(line).ok()
    }
}

impl EntryParser for JsonlParser {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn extensions(&self) -> &[&str] {
        &["jsonl", "ndjson"]
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Entry>> {
        let file = File::open(path).map_err(GridError::Io)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        // Stream line-by-line to avoid loading entire file into memory
        for (line_no, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let mut line_bytes = line.into_bytes();
            match self.parse_line(&mut line_bytes) {
                Some(entry) => entries.push(entry),
                None if !line_bytes.is_empty() => {
                    debug!(path = %path.display(), line = line_no + 1, "skipping unparsable line");
                }
                None => {}
            }
        }

        Ok(entries)
    }
}
