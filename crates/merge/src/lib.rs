//! Merge crate for combining the rankings of several item filters.
//!
//! This crate contains the orchestrator that resolves child filters by name,
//! runs them concurrently over the same item batch and merges their outputs.

pub mod directory;
pub mod error;
pub mod fanout;
pub mod orchestrator;
pub mod registry;

pub use directory::{FilterDirectory, FilterFactory, FilterLookup, StaticDirectory};
pub use error::{MergeError, Result};
pub use orchestrator::MergeFilter;
pub use registry::{FilterRegistry, ResolvedFilter};
