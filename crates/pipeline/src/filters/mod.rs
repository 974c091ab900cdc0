//! Built-in child filter implementations.
//!
//! Small, dependency-free matchers and sorters that can be registered in a
//! filter directory and merged.

pub mod matcher_head;
pub mod matcher_substring;
pub mod sorter_alpha;

// Re-export for convenience
pub use matcher_head::MatcherHead;
pub use matcher_substring::MatcherSubstring;
pub use sorter_alpha::SorterAlpha;

use crate::traits::{Filter, FilterParams};
use serde_json::Value;
use std::sync::Arc;

/// Builds a fresh instance of a built-in filter.
pub type BuiltinConstructor = fn() -> Arc<dyn Filter>;

/// Constructor for every built-in filter, keyed by its registration name.
pub fn builtin_filters() -> Vec<(&'static str, BuiltinConstructor)> {
    let head: BuiltinConstructor = || Arc::new(MatcherHead);
    let substring: BuiltinConstructor = || Arc::new(MatcherSubstring);
    let sorter: BuiltinConstructor = || Arc::new(SorterAlpha);

    vec![
        (MatcherHead::NAME, head),
        (MatcherSubstring::NAME, substring),
        (SorterAlpha::NAME, sorter),
    ]
}

/// Read a boolean parameter, falling back to `default` when absent or mistyped.
pub(crate) fn param_bool(params: &FilterParams, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}
