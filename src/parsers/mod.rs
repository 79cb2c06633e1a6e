//! Entry file parsers

mod json;
mod jsonl;

pub use json::JsonParser;
pub use jsonl::JsonlParser;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::types::{Entry, GridError, Result};

/// Trait for reading completion entries from one kind of file
pub trait EntryParser: Send + Sync {
    /// Parser name (e.g., "jsonl")
    fn name(&self) -> &str;

    /// File extensions this parser handles, lowercase, without the dot
    fn extensions(&self) -> &[&str];

    /// Parse a single file and return its entries
    fn parse_file(&self, path: &Path) -> Result<Vec<Entry>>;

    /// Whether `path` has one of this parser's extensions
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Registry of available parsers
pub struct ParserRegistry {
    parsers: Vec<Box<dyn EntryParser>>,
}

impl ParserRegistry {
    /// Create a new registry with default parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(JsonlParser::new()), Box::new(JsonParser::new())],
        }
    }

    /// Get all registered parsers
    pub fn parsers(&self) -> &[Box<dyn EntryParser>] {
        &self.parsers
    }

    /// Find a parser by name
    pub fn get(&self, name: &str) -> Option<&dyn EntryParser> {
        self.parsers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Parser for a file, chosen by extension
    pub fn for_path(&self, path: &Path) -> Option<&dyn EntryParser> {
        self.parsers
            .iter()
            .find(|p| p.handles(path))
            .map(|p| p.as_ref())
    }

    /// Expand paths and glob patterns into a sorted, de-duplicated file list
    pub fn collect_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for pattern in patterns {
            let paths = glob::glob(pattern)
                .map_err(|e| GridError::Pattern(format!("{}: {}", pattern, e)))?;
            let before = files.len();
            files.extend(paths.filter_map(|p| p.ok()).filter(|p| p.is_file()));
            if files.len() == before {
                warn!(pattern = %pattern, "pattern matched no files");
            }
        }
        Ok(files.into_iter().collect())
    }

    /// Load entries from every file matched by `patterns`.
    ///
    /// Files are parsed in parallel; output keeps file order. Files with an
    /// unknown extension or that fail to parse are logged and skipped.
    pub fn load(&self, patterns: &[String]) -> Result<Vec<Entry>> {
        let files = self.collect_files(patterns)?;
        debug!(files = files.len(), "loading entry files");

        let per_file: Vec<Vec<Entry>> = files
            .par_iter()
            .map(|path| {
                let Some(parser) = self.for_path(path) else {
                    warn!(path = %path.display(), "unsupported file type, skipping");
                    return Vec::new();
                };
                match parser.parse_file(path) {
                    Ok(entries) => {
                        debug!(
                            path = %path.display(),
                            parser = parser.name(),
                            entries = entries.len(),
                            "parsed entry file"
                        );
                        entries
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse entry file");
                        Vec::new()
                    }
                }
            })
            .collect();

        let entries: Vec<Entry> = per_file.into_iter().flatten().collect();
        info!(
            files = files.len(),
            entries = entries.len(),
            "loaded completion entries"
        );
        Ok(entries)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Load entries from `patterns` with the default parsers
pub fn load_entries(patterns: &[String]) -> Result<Vec<Entry>> {
    ParserRegistry::new().load(patterns)
}
