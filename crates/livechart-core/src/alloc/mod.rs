//! Collections used across the chart pipeline.
//!
//! - AHash-backed maps and sets (identity tables, paint-task lookups)
//! - [`SparseSet`](sparse_set::SparseSet), a generational arena used to own
//!   visuals that outlive the chart point that created them

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Create an AHash map with room for `capacity` entries.
///
/// Identity tables are sized from the series length on first fetch.
pub fn map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    HashMap::with_capacity(capacity)
}
