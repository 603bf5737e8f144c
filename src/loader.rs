//! Ingestion of the `allkeys.txt` weight table and its bincode form.
//!
//! Parsing the text table takes a while, so `unicol import` does it once and
//! writes a [`TableData`] with bincode; collators are then built from the
//! persisted bytes through [`read_table`] or a [`SharedTable`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::element::CollationElement;
use crate::error::{CollationError, Result};
use crate::table::{build_table, CollationTable};

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: OnceCell<Regex> = OnceCell::new();
        RE.get_or_init(|| Regex::new($re).expect("invalid regex literal"))
    }};
}

/// Parsed weight table, as persisted.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TableData {
    pub version: Option<String>,
    pub entries: HashMap<String, Vec<CollationElement>>,
}

impl TableData {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn into_table(self) -> Result<CollationTable> {
        build_table(self.entries)
    }
}

/// Parse the text form of a UCA weight table (`allkeys.txt`).
///
/// Any malformed line fails the whole parse.
pub fn parse_allkeys(text: &str) -> Result<TableData> {
    let mut data = TableData::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let malformed = |reason: String| CollationError::Malformed {
            line: line_no,
            reason,
        };

        let line = raw_line
            .split('#')
            .next()
            .and_then(|l| l.split('%').next())
            .unwrap_or_default()
            .trim();

        if line.is_empty() {
            continue;
        }

        if let Some(directive) = line.strip_prefix('@') {
            if let Some(version) = directive.strip_prefix("version") {
                data.version = Some(version.trim().to_string());
            }
            continue;
        }

        let (char_list, coll_elements) = line
            .split_once(';')
            .ok_or_else(|| malformed("missing ';'".to_string()))?;

        let key = parse_code_points(char_list).map_err(malformed)?;
        let elements = parse_elements(coll_elements).map_err(malformed)?;

        data.entries.insert(key, elements);
    }

    info!(
        "parsed {} weight table entries (version {})",
        data.entries.len(),
        data.version.as_deref().unwrap_or("unknown")
    );

    Ok(data)
}

fn parse_code_points(char_list: &str) -> std::result::Result<String, String> {
    let mut key = String::new();

    for hex in char_list.split_whitespace() {
        let val = u32::from_str_radix(hex, 16).map_err(|_| format!("bad code point {hex:?}"))?;
        let c = char::from_u32(val).ok_or_else(|| format!("U+{val:04X} is not a scalar value"))?;
        key.push(c);
    }

    if key.is_empty() {
        return Err("no code points".to_string());
    }

    Ok(key)
}

fn parse_elements(coll_elements: &str) -> std::result::Result<Vec<CollationElement>, String> {
    let re_group = regex!(r"\[([^\[\]]*)\]");

    let leftover = re_group.replace_all(coll_elements, "");
    if !leftover.trim().is_empty() {
        return Err(format!("unbalanced brackets in {:?}", coll_elements.trim()));
    }

    let mut elements = Vec::new();

    for cap in re_group.captures_iter(coll_elements) {
        let group = cap[1].trim();

        let (variable, body) = if let Some(body) = group.strip_prefix('*') {
            (true, body)
        } else if let Some(body) = group.strip_prefix('.') {
            (false, body)
        } else {
            return Err(format!("weight group [{group}] has no '.' or '*' marker"));
        };

        let weights = body
            .split('.')
            .map(|w| u16::from_str_radix(w, 16).map_err(|_| format!("bad weight {w:?}")))
            .collect::<std::result::Result<Vec<u16>, String>>()?;

        elements.push(CollationElement::new(weights, variable));
    }

    if elements.is_empty() {
        return Err("no weight groups".to_string());
    }

    Ok(elements)
}

pub fn write_table(path: impl AsRef<Path>, data: &TableData) -> Result<()> {
    let path = path.as_ref();
    let bytes = data.to_bytes()?;
    std::fs::write(path, &bytes)?;

    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Load a persisted table. A missing file is reported as
/// [`CollationError::TableMissing`], never as an empty table.
pub fn read_table(path: impl AsRef<Path>) -> Result<CollationTable> {
    let path = path.as_ref();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CollationError::TableMissing(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    debug!("decoding {} bytes from {}", bytes.len(), path.display());
    TableData::from_bytes(&bytes)?.into_table()
}

/// A persisted table loaded on first use and then shared by every caller.
///
/// Concurrent first calls to [`SharedTable::get`] load the file once. A failed
/// load is returned to the caller and tried again on the next call.
#[derive(Debug)]
pub struct SharedTable {
    path: PathBuf,
    cell: OnceCell<Arc<CollationTable>>,
}

impl SharedTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Result<Arc<CollationTable>> {
        self.cell
            .get_or_try_init(|| read_table(&self.path).map(Arc::new))
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
