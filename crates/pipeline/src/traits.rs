//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait every child filter implements, and
//! the argument types passed to it. The merge stage only ever talks to child
//! filters through this trait.

use anyhow::Result;
use async_trait::async_trait;
use items::Item;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Host-declared options for one filter (e.g. which item field to match on).
pub type FilterOptions = Map<String, Value>;

/// User-supplied parameters for one filter.
pub type FilterParams = Map<String, Value>;

/// State shared by every filter invoked within one host request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Name of the host context the request belongs to; directory lookups are
    /// scoped by it.
    pub session: String,
    /// Current user input (the query text matchers compare against)
    pub input: String,
    /// Options of the source that produced the items
    pub source_options: Map<String, Value>,
    /// Extra arguments forwarded verbatim to child filters
    pub passthrough: Map<String, Value>,
}

impl CallContext {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }
}

/// Arguments for a filter's one-time initialization.
#[derive(Debug, Clone)]
pub struct InitArgs {
    pub context: Arc<CallContext>,
    pub filter_options: FilterOptions,
    pub filter_params: FilterParams,
}

/// Arguments for a single filter invocation.
///
/// Everything is owned so the resulting future can be moved onto another task.
#[derive(Debug, Clone)]
pub struct FilterArgs {
    pub context: Arc<CallContext>,
    pub items: Vec<Item>,
    pub filter_options: FilterOptions,
    pub filter_params: FilterParams,
}

/// What a filter hands back.
///
/// Either a bare ordered list, or the list plus side-channel metadata that
/// the caller may ignore.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutput {
    Items(Vec<Item>),
    WithMeta {
        items: Vec<Item>,
        meta: Map<String, Value>,
    },
}

impl FilterOutput {
    /// Drop any metadata and keep the ordered items.
    pub fn into_items(self) -> Vec<Item> {
        match self {
            FilterOutput::Items(items) => items,
            FilterOutput::WithMeta { items, .. } => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FilterOutput::Items(items) => items.len(),
            FilterOutput::WithMeta { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Item>> for FilterOutput {
    fn from(items: Vec<Item>) -> Self {
        FilterOutput::Items(items)
    }
}

/// Core trait for filtering item batches.
///
/// ## Design Note
/// - `Send + Sync` allows one instance to serve concurrent requests
/// - Filters take ownership of the item batch and return a reordered or
///   reduced one
/// - `on_init` runs at most once successfully per instance; the registry
///   tracks that, not the filter
#[async_trait]
pub trait Filter: Send + Sync {
    /// Returns the name of this filter implementation (for logging/debugging)
    fn name(&self) -> &str;

    /// Default parameters, applied underneath the user's parameters.
    fn params(&self) -> FilterParams {
        FilterParams::new()
    }

    /// One-time setup (load a dictionary, spawn a helper process...).
    async fn on_init(&self, _args: InitArgs) -> Result<()> {
        Ok(())
    }

    /// Apply this filter to a batch of items.
    async fn filter(&self, args: FilterArgs) -> Result<FilterOutput>;
}

/// Shallow-merge `overrides` on top of `defaults`.
///
/// Only top-level keys are replaced; nested objects are not merged.
pub fn merge_params(defaults: FilterParams, overrides: &FilterParams) -> FilterParams {
    let mut merged = defaults;
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
