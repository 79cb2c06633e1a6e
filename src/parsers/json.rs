//! JSON document entry parser

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::EntryParser;
use crate::types::{Entry, GridError, Result};

/// Accepted top-level shapes of a `.json` entry file
#[derive(Deserialize)]
#[serde(untagged)]
enum EntryDocument {
    List(Vec<Option<Entry>>),
    Wrapped { entries: Vec<Option<Entry>> },
}

/// Parser for `.json` files holding an array of entries or `{"entries": [...]}`
#[derive(Debug, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl EntryParser for JsonParser {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Entry>> {
        let mut content = fs::read(path)?;
        let document: EntryDocument =
            simd_json::from_slice(&mut content).map_err(|e| GridError::Parse(e.to_string()))?;

        let items = match document {
            EntryDocument::List(items) | EntryDocument::Wrapped { entries: items } => items,
        };
        // null items carry no timestamp
        Ok(items.into_iter().flatten().collect())
    }
}
