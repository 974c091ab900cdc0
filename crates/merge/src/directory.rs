//! Mapping from filter names to loadable filter implementations.
//!
//! The host owns the real directory (it knows which filters are installed and
//! how the user configured them). [`StaticDirectory`] is an in-process
//! implementation backed by registered factories.

use anyhow::Result;
use async_trait::async_trait;
use pipeline::filters::builtin_filters;
use pipeline::{merge_params, Filter, FilterOptions, FilterParams};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Creates a fresh filter instance. Called at most once per name by the registry.
pub type FilterFactory = Arc<dyn Fn() -> Arc<dyn Filter> + Send + Sync>;

/// Result of looking a filter name up.
pub struct FilterLookup {
    /// `None` when the name is unknown
    pub factory: Option<FilterFactory>,
    pub filter_options: FilterOptions,
    pub filter_params: FilterParams,
}

impl FilterLookup {
    pub fn unknown() -> Self {
        Self {
            factory: None,
            filter_options: FilterOptions::new(),
            filter_params: FilterParams::new(),
        }
    }
}

impl fmt::Debug for FilterLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterLookup")
            .field("known", &self.factory.is_some())
            .field("filter_options", &self.filter_options)
            .field("filter_params", &self.filter_params)
            .finish()
    }
}

/// Resolves a filter name, within a host context, to a factory plus the
/// options/params configured for it.
///
/// An unknown name is `Ok` with no factory. `Err` means the directory
/// itself could not answer.
#[async_trait]
pub trait FilterDirectory: Send + Sync {
    async fn lookup(&self, session: &str, name: &str) -> Result<FilterLookup>;
}

/// Directory backed by factories registered up front.
///
/// ## Features
/// - default options/params per name
/// - per-session param overrides (shallow-merged over the defaults)
/// - aliases: an alias builds the target's filter but is configured, cached
///   and initialized under its own name
#[derive(Default)]
pub struct StaticDirectory {
    factories: HashMap<String, FilterFactory>,
    aliases: HashMap<String, String>,
    options: HashMap<String, FilterOptions>,
    params: HashMap<String, FilterParams>,
    session_params: HashMap<String, HashMap<String, FilterParams>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory with every built-in filter registered under its own name.
    pub fn with_builtin_filters() -> Self {
        builtin_filters()
            .into_iter()
            .fold(Self::new(), |directory, (name, make)| {
                directory.register_factory(name, Arc::new(make))
            })
    }

    /// Register a filter type by constructor.
    pub fn register<F, T>(self, name: impl Into<String>, make: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Filter + 'static,
    {
        self.register_factory(name, Arc::new(move || Arc::new(make()) as Arc<dyn Filter>))
    }

    pub fn register_factory(mut self, name: impl Into<String>, factory: FilterFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Make `alias` resolve to the filter registered as `target`.
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn with_options(mut self, name: impl Into<String>, options: FilterOptions) -> Self {
        self.options.insert(name.into(), options);
        self
    }

    pub fn with_params(mut self, name: impl Into<String>, params: FilterParams) -> Self {
        self.params.insert(name.into(), params);
        self
    }

    /// Params applied only when the lookup comes from `session`.
    pub fn with_session_params(
        mut self,
        session: impl Into<String>,
        name: impl Into<String>,
        params: FilterParams,
    ) -> Self {
        self.session_params
            .entry(session.into())
            .or_default()
            .insert(name.into(), params);
        self
    }

    /// Every name this directory can resolve (registrations and aliases), sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn target_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

#[async_trait]
impl FilterDirectory for StaticDirectory {
    async fn lookup(&self, session: &str, name: &str) -> Result<FilterLookup> {
        let target = self.target_of(name);
        let Some(factory) = self.factories.get(target) else {
            return Ok(FilterLookup::unknown());
        };

        // An alias's own configuration wins over its target's
        let filter_options = self
            .options
            .get(name)
            .or_else(|| self.options.get(target))
            .cloned()
            .unwrap_or_default();
        let mut filter_params = self
            .params
            .get(name)
            .or_else(|| self.params.get(target))
            .cloned()
            .unwrap_or_default();

        if let Some(overrides) = self
            .session_params
            .get(session)
            .and_then(|by_name| by_name.get(name))
        {
            filter_params = merge_params(filter_params, overrides);
        }

        Ok(FilterLookup {
            factory: Some(Arc::clone(factory)),
            filter_options,
            filter_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::filters::{MatcherHead, SorterAlpha};
    use serde_json::{json, Value};

    fn as_map(value: Value) -> FilterParams {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_unknown_name() {
        let directory = StaticDirectory::new().register("matcher_head", || MatcherHead);

        let lookup = directory.lookup("default", "matcher_fzf").await.unwrap();

        assert!(lookup.factory.is_none());
    }

    #[tokio::test]
    async fn test_known_name_carries_configuration() {
        let directory = StaticDirectory::new()
            .register("sorter_alpha", || SorterAlpha)
            .with_params("sorter_alpha", as_map(json!({"reverse": true})))
            .with_options("sorter_alpha", as_map(json!({"matcherKey": "word"})));

        let lookup = directory.lookup("default", "sorter_alpha").await.unwrap();

        let factory = lookup.factory.expect("registered");
        assert_eq!(factory().name(), "sorter_alpha");
        assert_eq!(lookup.filter_params["reverse"], json!(true));
        assert_eq!(lookup.filter_options["matcherKey"], json!("word"));
    }

    #[tokio::test]
    async fn test_session_params_override_defaults() {
        let directory = StaticDirectory::new()
            .register("sorter_alpha", || SorterAlpha)
            .with_params("sorter_alpha", as_map(json!({"reverse": false, "keep": 1})))
            .with_session_params("files", "sorter_alpha", as_map(json!({"reverse": true})));

        let plain = directory.lookup("default", "sorter_alpha").await.unwrap();
        let files = directory.lookup("files", "sorter_alpha").await.unwrap();

        assert_eq!(plain.filter_params["reverse"], json!(false));
        assert_eq!(files.filter_params["reverse"], json!(true));
        assert_eq!(files.filter_params["keep"], json!(1));
    }

    #[tokio::test]
    async fn test_alias_uses_target_factory_and_own_params() {
        let directory = StaticDirectory::new()
            .register("sorter_alpha", || SorterAlpha)
            .with_params("sorter_alpha", as_map(json!({"reverse": false})))
            .alias("sorter_alpha_desc", "sorter_alpha")
            .with_params("sorter_alpha_desc", as_map(json!({"reverse": true})))
            .alias("sorter_alpha_copy", "sorter_alpha");

        let desc = directory.lookup("default", "sorter_alpha_desc").await.unwrap();
        let copy = directory.lookup("default", "sorter_alpha_copy").await.unwrap();

        assert!(desc.factory.is_some());
        assert_eq!(desc.filter_params["reverse"], json!(true));
        assert_eq!(copy.filter_params["reverse"], json!(false));
    }

    #[tokio::test]
    async fn test_builtin_alias_builds_its_own_instance() {
        let directory = StaticDirectory::with_builtin_filters().alias("head", "matcher_head");

        let target = directory.lookup("default", "matcher_head").await.unwrap();
        let alias = directory.lookup("default", "head").await.unwrap();

        let (Some(make_target), Some(make_alias)) = (target.factory, alias.factory) else {
            panic!("built-in not registered");
        };
        let (a, b) = (make_target(), make_alias());
        assert_eq!(b.name(), "matcher_head");
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_builtin_names() {
        let directory = StaticDirectory::with_builtin_filters().alias("head", "matcher_head");

        assert_eq!(
            directory.names(),
            vec!["head", "matcher_head", "matcher_substring", "sorter_alpha"]
        );
    }
}
