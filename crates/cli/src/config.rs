//! JSON configuration for the `merge-items` binary.
//!
//! ```json
//! {
//!   "merge": { "filters": ["matcher_head", {"name": "sorter_alpha", "weight": 2}] },
//!   "filterParams": { "sorter_alpha": { "reverse": true } },
//!   "sessionParams": { "quick": { "matcher_substring": { "ignoreCase": false } } },
//!   "aliases": { "sorter_desc": "sorter_alpha" }
//! }
//! ```

use anyhow::{Context, Result};
use merge::StaticDirectory;
use pipeline::{FilterOptions, FilterParams};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Parameters handed to the merge filter itself
    pub merge: FilterParams,
    pub filter_options: HashMap<String, FilterOptions>,
    pub filter_params: HashMap<String, FilterParams>,
    /// session -> filter name -> params
    pub session_params: HashMap<String, HashMap<String, FilterParams>>,
    /// alias -> registered filter name
    pub aliases: HashMap<String, String>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Build a directory of the built-in filters configured by this file.
    pub fn directory(&self) -> StaticDirectory {
        let mut directory = StaticDirectory::with_builtin_filters();
        for (alias, target) in &self.aliases {
            directory = directory.alias(alias.clone(), target.clone());
        }
        for (name, options) in &self.filter_options {
            directory = directory.with_options(name.clone(), options.clone());
        }
        for (name, params) in &self.filter_params {
            directory = directory.with_params(name.clone(), params.clone());
        }
        for (session, by_name) in &self.session_params {
            for (name, params) in by_name {
                directory =
                    directory.with_session_params(session.clone(), name.clone(), params.clone());
            }
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merge::FilterDirectory;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CliConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse(json!({}));

        assert!(config.merge.is_empty());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_directory_lists_builtins_and_aliases() {
        let config = parse(json!({"aliases": {"sorter_desc": "sorter_alpha"}}));

        let names = config.directory().names();

        assert!(names.contains(&"sorter_alpha".to_string()));
        assert!(names.contains(&"matcher_head".to_string()));
        assert!(names.contains(&"sorter_desc".to_string()));
    }

    #[tokio::test]
    async fn test_session_params_reach_the_directory() {
        let config = parse(json!({
            "filterParams": {"sorter_alpha": {"reverse": false}},
            "sessionParams": {"quick": {"sorter_alpha": {"reverse": true}}}
        }));
        let directory = config.directory();

        let default = directory.lookup("default", "sorter_alpha").await.unwrap();
        let quick = directory.lookup("quick", "sorter_alpha").await.unwrap();

        assert_eq!(default.filter_params["reverse"], json!(false));
        assert_eq!(quick.filter_params["reverse"], json!(true));
    }
}
