//! Duplicate removal over a merged ranking.

use items::Item;
use std::collections::HashSet;

/// Keep the first item for each identity signature, preserving order.
pub fn dedup_by_identity(items: Vec<Item>) -> Vec<Item> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity_key()))
        .collect()
}
