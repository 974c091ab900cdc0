//! # Items Crate
//!
//! The item record that every filter in the pipeline consumes and produces,
//! plus helpers to load item batches from disk.
//!
//! ## Main Components
//!
//! - **types**: [`Item`] and its identity signature
//! - **parser**: parse JSON, JSON Lines and plain text batches
//! - **error**: error types for batch loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use items::{load_items, Item};
//! use std::path::Path;
//!
//! let batch = load_items(Path::new("candidates.jsonl"))?;
//! let extra = Item::new("README.md").with_kind("file");
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ItemLoadError, Result};
pub use parser::{load_items, parse_items, ItemFormat};
pub use types::{Item, IDENTITY_SEPARATOR};
