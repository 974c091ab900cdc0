//! Building blocks for merging the output of several item filters.
//!
//! This crate provides:
//! - The `Filter` trait every child filter implements, and its call arguments
//! - Validation of raw merge parameters into a typed `MergeConfig`
//! - Rank-based scoring and stable merging of child outputs
//! - Identity-based deduplication of the merged ranking
//! - A few built-in matchers and sorters
//!
//! ## Architecture
//! A merge call processes items in stages:
//! 1. `MergeConfig::from_params` validates the user's parameters
//! 2. Each child filter reorders/reduces its own copy of the batch
//! 3. `rank_children` truncates, scores and merges the child outputs
//! 4. `dedup_by_identity` drops later duplicates when `unique` is set
//!
//! Resolving child filters by name and running them concurrently lives in
//! the `merge` crate.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{dedup_by_identity, rank_children, MergeConfig};
//!
//! let config = MergeConfig::from_value(&raw_params)?;
//! let outputs = config.filters.iter().zip(child_outputs).collect();
//! let mut merged = rank_children(outputs);
//! if config.unique {
//!     merged = dedup_by_identity(merged);
//! }
//! ```

pub mod dedup;
pub mod error;
pub mod filters;
pub mod params;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use dedup::dedup_by_identity;
pub use error::ConfigError;
pub use params::{ChildFilter, MergeConfig};
pub use scoring::{merge_scored, rank_children, score_child, ScoredItem};
pub use traits::{
    merge_params, CallContext, Filter, FilterArgs, FilterOptions, FilterOutput, FilterParams,
    InitArgs,
};
