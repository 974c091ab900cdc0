//! Lazy, cached resolution of child filters by name.
//!
//! ## Lifecycle of a name
//! 1. Looked up in the [`FilterDirectory`] on every call (options and params
//!    may change between calls)
//! 2. Instantiated from the directory's factory the first time it is seen,
//!    then cached for the registry's lifetime
//! 3. Initialized (`on_init`) until that succeeds once; never again after
//!
//! An unknown name or a failed initialization only drops that child from the
//! current call. A failed initialization leaves the instance cached and
//! uninitialized, so the next call retries it.

use crate::directory::{FilterDirectory, FilterFactory};
use crate::error::{MergeError, Result};
use futures::future::join_all;
use pipeline::{
    merge_params, CallContext, ChildFilter, Filter, FilterOptions, FilterParams, InitArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// A cached filter instance and its one-shot initialization flag.
struct LoadedFilter {
    filter: Arc<dyn Filter>,
    /// Held across `on_init` so concurrent first uses initialize once
    initialized: Mutex<bool>,
}

/// A child filter ready to be invoked for the current call.
#[derive(Clone)]
pub struct ResolvedFilter {
    /// Name the filter was resolved under (may be an alias)
    pub name: String,
    pub filter: Arc<dyn Filter>,
    pub filter_options: FilterOptions,
    pub filter_params: FilterParams,
}

/// Name → instance cache shared by every call made through one merge filter.
pub struct FilterRegistry {
    directory: Arc<dyn FilterDirectory>,
    loaded: Mutex<HashMap<String, Arc<LoadedFilter>>>,
}

impl FilterRegistry {
    pub fn new(directory: Arc<dyn FilterDirectory>) -> Self {
        Self {
            directory,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve one name to an initialized filter.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - the filter, with this call's options and params
    /// * `Ok(None)` - unknown name, or initialization failed (logged)
    /// * `Err` - the directory itself failed
    pub async fn resolve(
        &self,
        context: &Arc<CallContext>,
        name: &str,
    ) -> Result<Option<ResolvedFilter>> {
        let lookup = self
            .directory
            .lookup(&context.session, name)
            .await
            .map_err(|source| MergeError::Directory {
                name: name.to_string(),
                source,
            })?;

        let Some(factory) = lookup.factory else {
            error!(filter = name, "Invalid filter: {}", name);
            return Ok(None);
        };

        let loaded = self.load(name, &factory).await;
        let filter_params = merge_params(loaded.filter.params(), &lookup.filter_params);

        {
            let mut initialized = loaded.initialized.lock().await;
            if !*initialized {
                let args = InitArgs {
                    context: Arc::clone(context),
                    filter_options: lookup.filter_options.clone(),
                    filter_params: filter_params.clone(),
                };
                if let Err(e) = loaded.filter.on_init(args).await {
                    error!(filter = name, error = %e, "Filter initialization failed");
                    return Ok(None);
                }
                *initialized = true;
                debug!(filter = name, "Filter initialized");
            }
        }

        Ok(Some(ResolvedFilter {
            name: name.to_string(),
            filter: Arc::clone(&loaded.filter),
            filter_options: lookup.filter_options,
            filter_params,
        }))
    }

    /// Resolve every child concurrently, keeping configuration order and
    /// dropping children that did not resolve.
    pub async fn resolve_all<'a>(
        &self,
        context: &Arc<CallContext>,
        children: &'a [ChildFilter],
    ) -> Result<Vec<(&'a ChildFilter, ResolvedFilter)>> {
        let lookups = children.iter().map(|child| async move {
            let resolved = self.resolve(context, &child.name).await?;
            Ok::<_, MergeError>(resolved.map(|filter| (child, filter)))
        });

        let resolved = join_all(lookups)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(resolved.into_iter().flatten().collect())
    }

    /// Fetch the cached instance for `name`, creating it on first use.
    ///
    /// The map lock is held while the factory runs, so one name never gets
    /// two instances.
    async fn load(&self, name: &str, factory: &FilterFactory) -> Arc<LoadedFilter> {
        let mut loaded = self.loaded.lock().await;
        let entry = loaded.entry(name.to_string()).or_insert_with(|| {
            debug!(filter = name, "Loading filter");
            Arc::new(LoadedFilter {
                filter: factory(),
                initialized: Mutex::new(false),
            })
        });
        Arc::clone(entry)
    }

    /// Number of distinct names instantiated so far.
    pub async fn loaded_count(&self) -> usize {
        self.loaded.lock().await.len()
    }

    /// Whether `name` has been loaded and successfully initialized.
    pub async fn is_initialized(&self, name: &str) -> bool {
        let loaded = self.loaded.lock().await.get(name).cloned();
        match loaded {
            Some(loaded) => *loaded.initialized.lock().await,
            None => false,
        }
    }
}
