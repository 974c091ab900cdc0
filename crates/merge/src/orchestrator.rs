//! # Merge Orchestrator
//!
//! This module coordinates one merge call:
//! 1. Apply default params and validate them
//! 2. Resolve every child filter by name (concurrently)
//! 3. Run every resolved child on its own copy of the batch (concurrently)
//! 4. Truncate, score and merge the child outputs
//! 5. Drop later duplicates when `unique` is set
//!
//! When no child resolves, the input batch is returned unchanged.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use items::Item;
use pipeline::{
    dedup_by_identity, merge_params, rank_children, CallContext, Filter, FilterArgs,
    FilterOutput, FilterParams, MergeConfig,
};

use crate::directory::FilterDirectory;
use crate::error::Result;
use crate::fanout::fan_out;
use crate::registry::FilterRegistry;

/// Filter that merges the rankings of several child filters.
///
/// Holds the registry, so child instances (and their initialization) are
/// shared by every call made through the same `MergeFilter`.
pub struct MergeFilter {
    registry: FilterRegistry,
}

impl MergeFilter {
    pub const NAME: &'static str = "merge";

    /// Create a merge filter resolving children through `directory`.
    pub fn new(directory: Arc<dyn FilterDirectory>) -> Self {
        Self {
            registry: FilterRegistry::new(directory),
        }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Main entry point: merge the children named in `params` over `items`.
    ///
    /// # Arguments
    /// * `context` - Shared call state forwarded to every child
    /// * `items` - The batch to filter; never modified
    /// * `params` - Raw merge parameters (`filters`, `unique`)
    ///
    /// # Errors
    /// Malformed params, a failing directory, or a failing child filter.
    #[instrument(skip_all, fields(session = %context.session, items = items.len()))]
    pub async fn merge(
        &self,
        context: Arc<CallContext>,
        items: Vec<Item>,
        params: &FilterParams,
    ) -> Result<Vec<Item>> {
        let start_time = Instant::now();

        let params = merge_params(self.params(), params);
        let config = MergeConfig::from_params(&params)?;

        let resolved = self.registry.resolve_all(&context, &config.filters).await?;
        if resolved.is_empty() {
            debug!(
                requested = config.filters.len(),
                "No child filter resolved, returning items unchanged"
            );
            return Ok(items);
        }
        debug!(
            "Resolved {} of {} child filters",
            resolved.len(),
            config.filters.len()
        );

        let outputs = fan_out(&context, &items, resolved).await?;

        let merged = rank_children(outputs);
        let merged_len = merged.len();
        let result = if config.unique {
            dedup_by_identity(merged)
        } else {
            merged
        };

        info!(
            "Merged {} items into {} (unique: {}) in {:.2?}",
            merged_len,
            result.len(),
            config.unique,
            start_time.elapsed()
        );
        Ok(result)
    }
}

#[async_trait]
impl Filter for MergeFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn params(&self) -> FilterParams {
        match json!({"filters": [], "unique": true}) {
            Value::Object(map) => map,
            _ => FilterParams::new(),
        }
    }

    async fn filter(&self, args: FilterArgs) -> anyhow::Result<FilterOutput> {
        let items = self
            .merge(args.context, args.items, &args.filter_params)
            .await?;
        Ok(items.into())
    }
}
