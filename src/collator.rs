use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use log::trace;
use unicode_canonical_combining_class::get_canonical_combining_class as get_ccc;
use unicode_normalization::UnicodeNormalization;

use crate::element::CollationElement;
use crate::error::{CollationError, Result};
use crate::implicit::implicit_weights;
use crate::sort_key::{compare_sort_keys, sort_key_from_elements};
use crate::table::CollationTable;

#[derive(Clone, Debug)]
pub struct CollatorOptions {
    /// Apply NFD to the input before looking anything up.
    pub normalization: bool,
    /// Minimum number of levels in every key.
    pub strength: usize,
    /// Levels whose weights are emitted last element first (e.g. `{2}` for French).
    pub backward_levels: BTreeSet<usize>,
}

impl Default for CollatorOptions {
    fn default() -> Self {
        Self {
            normalization: true,
            strength: 3,
            backward_levels: BTreeSet::new(),
        }
    }
}

/// Builds sort keys against a shared table. Cheap to create; holds no state
/// besides its options.
#[derive(Clone, Debug)]
pub struct Collator {
    table: Arc<CollationTable>,
    options: CollatorOptions,
}

pub fn make_collator(
    table: Arc<CollationTable>,
    normalization: bool,
    strength: usize,
    backward_levels: Option<BTreeSet<usize>>,
) -> Result<Collator> {
    Collator::new(
        table,
        CollatorOptions {
            normalization,
            strength,
            backward_levels: backward_levels.unwrap_or_default(),
        },
    )
}

impl Collator {
    pub fn new(table: Arc<CollationTable>, options: CollatorOptions) -> Result<Self> {
        if options.strength == 0 {
            return Err(CollationError::InvalidStrength);
        }

        if options.backward_levels.contains(&0) {
            return Err(CollationError::InvalidBackwardLevel(0));
        }

        Ok(Self { table, options })
    }

    pub fn table(&self) -> &CollationTable {
        &self.table
    }

    pub fn options(&self) -> &CollatorOptions {
        &self.options
    }

    pub fn compare(&self, str_a: &str, str_b: &str) -> Ordering {
        compare_sort_keys(&self.key(str_a), &self.key(str_b))
    }

    pub fn key(&self, text: &str) -> Vec<u16> {
        let collation_element_array = self.collation_element_array(text);

        sort_key_from_elements(
            &collation_element_array,
            self.options.strength,
            &self.options.backward_levels,
        )
    }

    /// Segment `text` into collation elements: longest match against the
    /// table, extended by at most one non-starter from the run that follows,
    /// with implicit weights for anything unmatched.
    pub fn collation_element_array(&self, text: &str) -> Vec<CollationElement> {
        let char_vals: Vec<char> = if self.options.normalization {
            text.nfd().collect()
        } else {
            text.chars().collect()
        };

        // Marks pulled into an earlier match; the scan steps over them.
        let mut spliced = vec![false; char_vals.len()];
        let max_key_chars = self.table.max_key_chars().max(1);

        let mut cea: Vec<CollationElement> = Vec::new();
        let mut left = 0;

        while left < char_vals.len() {
            if spliced[left] {
                left += 1;
                continue;
            }

            let window: Vec<usize> = (left..char_vals.len())
                .filter(|&i| !spliced[i])
                .take(max_key_chars)
                .collect();

            // Longest initial substring with an entry. Without one, the single
            // char at `left` still gets a chance at a discontiguous match.
            let mut subset = String::new();
            let mut matched_len = 1;

            for len in (1..=window.len()).rev() {
                let candidate: String = window[..len].iter().map(|&i| char_vals[i]).collect();

                if self.table.contains(&candidate) {
                    subset = candidate;
                    matched_len = len;
                    break;
                }
            }

            if subset.is_empty() {
                subset.push(char_vals[left]);
            }

            let right = window[matched_len - 1] + 1;

            let non_starters: Vec<usize> = (right..char_vals.len())
                .filter(|&i| !spliced[i])
                .take_while(|&i| is_non_starter(char_vals[i]))
                .collect();

            // The first non-starter would have been part of a contiguous
            // match; try the rest in order and take the first hit. Blocking
            // by combining class is not checked.
            if non_starters.len() > 1 {
                for &mark in &non_starters[1..] {
                    let mut new_subset = subset.clone();
                    new_subset.push(char_vals[mark]);

                    if self.table.contains(&new_subset) {
                        trace!(
                            "discontiguous match {:04X?} at {left}",
                            new_subset.chars().map(u32::from).collect::<Vec<_>>()
                        );
                        spliced[mark] = true;
                        subset = new_subset;
                        break;
                    }
                }
            }

            if let Some(elements) = self.table.lookup(&subset) {
                cea.extend_from_slice(elements);
                left = right;
            } else {
                let c = char_vals[left];
                trace!("implicit weights for U+{:04X}", u32::from(c));
                cea.extend(implicit_weights(c));
                left += 1;
            }
        }

        cea
    }
}

fn is_non_starter(c: char) -> bool {
    get_ccc(c) as u8 != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::build_table;

    fn ce(p: u16, s: u16, t: u16) -> CollationElement {
        CollationElement::new([p, s, t], false)
    }

    fn table(rows: &[(&str, &[CollationElement])]) -> Arc<CollationTable> {
        Arc::new(
            build_table(rows.iter().map(|(k, v)| ((*k).to_string(), v.to_vec()))).unwrap(),
        )
    }

    fn raw(table: Arc<CollationTable>) -> Collator {
        make_collator(table, false, 3, None).unwrap()
    }

    fn ab_table() -> Arc<CollationTable> {
        table(&[("a", &[ce(100, 20, 2)]), ("b", &[ce(200, 20, 2)])])
    }

    #[test]
    fn end_to_end() {
        let collator = raw(ab_table());

        assert_eq!(collator.key("ab"), vec![100, 200, 0, 20, 20, 0, 2, 2]);
        assert_eq!(collator.compare("a", "b"), Ordering::Less);
        assert_eq!(collator.compare("ab", "a"), Ordering::Greater);
        assert_eq!(collator.compare("ab", "ab"), Ordering::Equal);
    }

    #[test]
    fn sorts_by_primary_before_secondary() {
        let t = table(&[
            ("a", &[ce(100, 20, 2)]),
            ("A", &[ce(100, 20, 8)]),
            ("b", &[ce(200, 20, 2)]),
        ]);
        let collator = raw(t);

        let mut words = ["b", "Ab", "ab", "A", "a"];
        words.sort_by(|a, b| collator.compare(a, b));

        assert_eq!(words, ["a", "A", "ab", "Ab", "b"]);
    }

    #[test]
    fn contraction_beats_single_chars() {
        let t = table(&[
            ("c", &[ce(300, 20, 2)]),
            ("h", &[ce(400, 20, 2)]),
            ("ch", &[ce(350, 20, 2)]),
        ]);
        let collator = raw(t);

        assert_eq!(collator.collation_element_array("ch"), vec![ce(350, 20, 2)]);
        assert_eq!(
            collator.collation_element_array("hc"),
            vec![ce(400, 20, 2), ce(300, 20, 2)]
        );
        assert_eq!(collator.compare("ch", "ci"), Ordering::Greater);
    }

    #[test]
    fn expansion_appends_every_element() {
        let t = table(&[("\u{00E6}", &[ce(100, 20, 4), ce(0, 0x110, 4), ce(150, 20, 4)])]);
        let collator = raw(t);

        assert_eq!(collator.collation_element_array("\u{00E6}").len(), 3);
    }

    #[test]
    fn unmapped_char_gets_implicit_weights() {
        let collator = raw(ab_table());

        let cea = collator.collation_element_array("a\u{4E00}");

        assert_eq!(cea.len(), 3);
        assert_eq!(cea[1].weights, vec![0xFB40, 0x20, 0x2]);
        assert_eq!(cea[2].weights, vec![0xCE00, 0, 0]);
        assert!(!collator.key("\u{0378}").is_empty());
    }

    #[test]
    fn implicit_order_follows_code_points() {
        let collator = raw(ab_table());

        assert_eq!(collator.compare("\u{4E01}", "\u{4E02}"), Ordering::Less);
        assert_eq!(collator.compare("b", "\u{4E01}"), Ordering::Less);
    }

    #[test]
    fn discontiguous_mark_is_spliced_out() {
        // a + acute + dot below; "a" + dot below is a table entry
        let t = table(&[
            ("a", &[ce(100, 20, 2)]),
            ("\u{0301}", &[ce(0, 36, 2)]),
            ("\u{0323}", &[ce(0, 42, 2)]),
            ("a\u{0323}", &[ce(110, 20, 2)]),
        ]);
        let collator = raw(t);

        assert_eq!(
            collator.collation_element_array("a\u{0301}\u{0323}"),
            vec![ce(110, 20, 2), ce(0, 36, 2)]
        );
    }

    #[test]
    fn first_discontiguous_hit_wins() {
        let t = table(&[
            ("a", &[ce(100, 20, 2)]),
            ("\u{0301}", &[ce(0, 36, 2)]),
            ("\u{0308}", &[ce(0, 43, 2)]),
            ("\u{0323}", &[ce(0, 42, 2)]),
            ("a\u{0323}", &[ce(110, 20, 2)]),
            ("a\u{0308}", &[ce(120, 20, 2)]),
        ]);
        let collator = raw(t);

        assert_eq!(
            collator.collation_element_array("a\u{0301}\u{0323}\u{0308}"),
            vec![ce(110, 20, 2), ce(0, 36, 2), ce(0, 43, 2)]
        );
    }

    #[test]
    fn first_non_starter_is_never_spliced() {
        let t = table(&[
            ("a", &[ce(100, 20, 2)]),
            ("\u{0301}", &[ce(0, 36, 2)]),
            ("\u{0323}", &[ce(0, 42, 2)]),
            ("a\u{0323}", &[ce(110, 20, 2)]),
        ]);
        let collator = raw(t);

        // A lone trailing mark is contiguous and matched by the longest-match step
        // when it is in the table, so nothing is spliced here.
        assert_eq!(
            collator.collation_element_array("a\u{0301}"),
            vec![ce(100, 20, 2), ce(0, 36, 2)]
        );
        assert_eq!(
            collator.collation_element_array("a\u{0323}\u{0301}"),
            vec![ce(110, 20, 2), ce(0, 36, 2)]
        );
    }

    #[test]
    fn discontiguous_match_for_unmapped_base() {
        let t = table(&[
            ("\u{0301}", &[ce(0, 36, 2)]),
            ("x\u{0323}", &[ce(500, 20, 2)]),
        ]);
        let collator = raw(t);

        assert_eq!(
            collator.collation_element_array("x\u{0301}\u{0323}"),
            vec![ce(500, 20, 2), ce(0, 36, 2)]
        );
    }

    #[test]
    fn starter_ends_the_non_starter_run() {
        let t = table(&[
            ("a", &[ce(100, 20, 2)]),
            ("b", &[ce(200, 20, 2)]),
            ("\u{0301}", &[ce(0, 36, 2)]),
            ("\u{0323}", &[ce(0, 42, 2)]),
            ("a\u{0323}", &[ce(110, 20, 2)]),
        ]);
        let collator = raw(t);

        assert_eq!(
            collator.collation_element_array("a\u{0301}b\u{0323}"),
            vec![ce(100, 20, 2), ce(0, 36, 2), ce(200, 20, 2), ce(0, 42, 2)]
        );
    }

    #[test]
    fn normalization_decomposes_first() {
        let t = table(&[("e", &[ce(100, 20, 2)]), ("\u{0301}", &[ce(0, 36, 2)])]);

        let nfd = make_collator(Arc::clone(&t), true, 3, None).unwrap();
        assert_eq!(nfd.key("\u{00E9}"), nfd.key("e\u{0301}"));
        assert_eq!(nfd.key("\u{00E9}"), vec![100, 0, 20, 36, 0, 2, 2]);

        let plain = raw(t);
        assert_ne!(plain.key("\u{00E9}"), plain.key("e\u{0301}"));
    }

    #[test]
    fn french_secondary_is_backward() {
        let t = table(&[
            ("x", &[ce(1, 5, 2)]),
            ("y", &[ce(2, 3, 2)]),
            ("z", &[ce(3, 9, 2)]),
        ]);
        let collator = make_collator(t, false, 3, Some(BTreeSet::from([2]))).unwrap();

        assert_eq!(collator.key("xyz"), vec![1, 2, 3, 0, 9, 3, 5, 0, 2, 2, 2]);
    }

    #[test]
    fn strength_one_still_emits_every_table_level() {
        let collator = make_collator(ab_table(), false, 1, None).unwrap();

        assert_eq!(collator.key("a"), vec![100, 0, 20, 0, 2]);
    }

    #[test]
    fn empty_string() {
        let collator = raw(ab_table());

        assert_eq!(collator.key(""), vec![0, 0]);
        assert_eq!(collator.compare("", "a"), Ordering::Less);
    }

    #[test]
    fn rejects_bad_options() {
        assert!(matches!(
            make_collator(ab_table(), true, 0, None),
            Err(CollationError::InvalidStrength)
        ));
        assert!(matches!(
            make_collator(ab_table(), true, 3, Some(BTreeSet::from([0, 2]))),
            Err(CollationError::InvalidBackwardLevel(0))
        ));
    }

    #[test]
    fn defaults() {
        let options = CollatorOptions::default();

        assert!(options.normalization);
        assert_eq!(options.strength, 3);
        assert!(options.backward_levels.is_empty());
    }
}
