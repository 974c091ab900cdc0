//! Rank-based scoring and merging of child filter outputs.
//!
//! ## Algorithm
//! 1. Truncate each child's list to its `limit` (0 = keep everything)
//! 2. Score the item at position `index` as `index / weight`
//! 3. Concatenate all children in configuration order
//! 4. Stable sort ascending by score
//!
//! A higher weight flattens a child's rank-to-score gradient, so its lower
//! ranked items interleave earlier against other children. Equal scores keep
//! concatenation order, so children listed first win ties.

use crate::params::ChildFilter;
use items::Item;
use std::cmp::Ordering;
use tracing::debug;

/// An item paired with its merge score. Lower sorts earlier.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub score: f64,
    pub item: Item,
}

/// Truncate and score one child's ordered output.
pub fn score_child(child: &ChildFilter, mut items: Vec<Item>) -> Vec<ScoredItem> {
    if child.limit > 0 {
        items.truncate(child.limit);
    }
    let inv_weight = 1.0 / child.weight;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| ScoredItem {
            score: index as f64 * inv_weight,
            item,
        })
        .collect()
}

/// Merge scored lists into a single ranking.
///
/// `children` must be in configuration order; ties are resolved by it.
pub fn merge_scored(children: Vec<Vec<ScoredItem>>) -> Vec<Item> {
    let mut merged: Vec<ScoredItem> = children.into_iter().flatten().collect();

    // sort_by is stable
    merged.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    merged.into_iter().map(|scored| scored.item).collect()
}

/// Score every child's output and merge them.
pub fn rank_children(outputs: Vec<(&ChildFilter, Vec<Item>)>) -> Vec<Item> {
    let scored: Vec<Vec<ScoredItem>> = outputs
        .into_iter()
        .map(|(child, items)| {
            let scored = score_child(child, items);
            debug!(filter = %child.name, kept = scored.len(), "Scored child output");
            scored
        })
        .collect();
    merge_scored(scored)
}
