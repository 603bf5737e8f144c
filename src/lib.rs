//! Sort keys and string comparison following the Unicode Collation Algorithm.
//!
//! A [`CollationTable`] is built once (usually from the persisted DUCET via
//! [`SharedTable`]) and shared by any number of [`Collator`]s, each with its
//! own normalization, strength and backward-level settings.

mod collator;
mod element;
mod error;
mod implicit;
mod loader;
mod sort_key;
mod table;

pub use collator::{make_collator, Collator, CollatorOptions};
pub use element::CollationElement;
pub use error::{CollationError, Result};
pub use implicit::implicit_weights;
pub use loader::{parse_allkeys, read_table, write_table, SharedTable, TableData};
pub use sort_key::{compare_sort_keys, sort_key_from_elements};
pub use table::{build_table, CollationTable};
