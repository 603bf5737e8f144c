use serde::{Deserialize, Serialize};

/// One collation element: a weight per level, primary first, plus the
/// variable flag from the table (`[*...]`). The flag is carried but not used
/// when building keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CollationElement {
    pub weights: Vec<u16>,
    pub variable: bool,
}

impl CollationElement {
    pub fn new(weights: impl Into<Vec<u16>>, variable: bool) -> Self {
        Self {
            weights: weights.into(),
            variable,
        }
    }

    /// Weight at `level` (1-indexed). Levels the element doesn't carry read as 0.
    pub fn weight(&self, level: usize) -> u16 {
        level
            .checked_sub(1)
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn levels(&self) -> usize {
        self.weights.len()
    }
}
