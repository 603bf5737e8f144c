use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::element::CollationElement;

/// Three-way comparison of two sort keys. A key that is a strict prefix of the
/// other sorts first.
pub fn compare_sort_keys(a: &[u16], b: &[u16]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return Ordering::Less;
        }

        if x > y {
            return Ordering::Greater;
        }
    }

    if a.len() < b.len() {
        Ordering::Less
    } else if a.len() > b.len() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Flatten a collation element array into a sort key: the non-zero weights of
/// each level in turn, levels separated by 0. Levels in `backward_levels`
/// are emitted last element first.
pub fn sort_key_from_elements(
    elements: &[CollationElement],
    strength: usize,
    backward_levels: &BTreeSet<usize>,
) -> Vec<u16> {
    let max_level = elements
        .iter()
        .map(CollationElement::levels)
        .max()
        .unwrap_or(0)
        .max(strength);

    let mut sort_key: Vec<u16> = Vec::new();

    for level in 1..=max_level {
        if level > 1 {
            sort_key.push(0);
        }

        let weights = elements.iter().map(|elem| elem.weight(level));

        if backward_levels.contains(&level) {
            let mut level_weights: Vec<u16> = weights.filter(|&w| w != 0).collect();
            level_weights.reverse();
            sort_key.extend(level_weights);
        } else {
            sort_key.extend(weights.filter(|&w| w != 0));
        }
    }

    sort_key
}
