//! Instrument universe: the static list of symbols a run considers.
//!
//! Either a CSV file with a header row whose first column holds the symbol
//! (extra columns such as name or sector are ignored) or a list written
//! inline in the config. Blank entries and repeats are dropped, first
//! occurrence wins.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read universe file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Universe as written in the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniverseSpec {
    Inline(Vec<String>),
    File(PathBuf),
}

impl UniverseSpec {
    /// Resolve to an ordered, de-duplicated symbol list.
    pub fn resolve(&self) -> Result<Vec<String>, UniverseError> {
        match self {
            UniverseSpec::Inline(symbols) => Ok(normalize(symbols.iter().cloned())),
            UniverseSpec::File(path) => read_universe_csv(path),
        }
    }
}

/// Read a universe CSV file.
pub fn read_universe_csv(path: &Path) -> Result<Vec<String>, UniverseError> {
    let file = std::fs::File::open(path).map_err(|e| UniverseError::Read {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    parse_universe(file).map_err(|source| UniverseError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse universe CSV text from any reader.
pub fn parse_universe<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut symbols = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(symbol) = record.get(0) {
            symbols.push(symbol.to_string());
        }
    }
    Ok(normalize(symbols))
}

fn normalize(symbols: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    symbols
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
