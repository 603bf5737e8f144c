use std::collections::HashMap;

use crate::element::CollationElement;
use crate::error::{CollationError, Result};

/// Immutable map from a character sequence (one char, or a contraction) to
/// its collation elements.
#[derive(Debug, Default)]
pub struct CollationTable {
    entries: HashMap<String, Vec<CollationElement>>,
    max_key_chars: usize,
}

/// Build a table from `(key, elements)` pairs. Later duplicates replace
/// earlier ones; an empty key is rejected.
pub fn build_table<I>(entries: I) -> Result<CollationTable>
where
    I: IntoIterator<Item = (String, Vec<CollationElement>)>,
{
    let mut map = HashMap::new();
    let mut max_key_chars = 0;

    for (key, elements) in entries {
        let key_chars = key.chars().count();
        if key_chars == 0 {
            return Err(CollationError::EmptyKey);
        }

        max_key_chars = max_key_chars.max(key_chars);
        map.insert(key, elements);
    }

    Ok(CollationTable {
        entries: map,
        max_key_chars,
    })
}

impl CollationTable {
    pub fn lookup(&self, key: &str) -> Option<&[CollationElement]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Length of the longest key, in chars. No substring longer than this can match.
    pub fn max_key_chars(&self) -> usize {
        self.max_key_chars
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
