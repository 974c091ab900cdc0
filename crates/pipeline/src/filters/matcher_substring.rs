//! Matcher keeping items whose text contains the user input.
//!
//! The simplest matcher there is; useful as a merge child next to fuzzier
//! matchers so exact substring hits are never lost.

use super::param_bool;
use crate::traits::{Filter, FilterArgs, FilterOutput};
use anyhow::Result;
use async_trait::async_trait;
use items::Item;
use rayon::prelude::*;

/// Keeps items whose matcher text contains the input.
///
/// ## Params
/// - `ignoreCase` (default `true`): compare lowercased text
///
/// Empty input keeps everything. Item order is untouched.
pub struct MatcherSubstring;

impl MatcherSubstring {
    pub const NAME: &'static str = "matcher_substring";
}

#[async_trait]
impl Filter for MatcherSubstring {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn filter(&self, args: FilterArgs) -> Result<FilterOutput> {
        let input = args.context.input.as_str();
        if input.is_empty() {
            return Ok(args.items.into());
        }

        let ignore_case = param_bool(&args.filter_params, "ignoreCase", true);
        let needle = if ignore_case {
            input.to_lowercase()
        } else {
            input.to_string()
        };

        // par_iter + collect keeps the original relative order
        let filtered: Vec<Item> = args
            .items
            .into_par_iter()
            .filter(|item| {
                if ignore_case {
                    item.matcher_text().to_lowercase().contains(&needle)
                } else {
                    item.matcher_text().contains(&needle)
                }
            })
            .collect();

        Ok(filtered.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::{args_with, words};
    use serde_json::json;

    #[tokio::test]
    async fn test_matcher_substring_filter() {
        let args = args_with(
            "RS",
            &["main.rs", "README.md", "lib.rs", "Cargo.toml"],
            json!({}),
        );

        let output = MatcherSubstring.filter(args).await.unwrap();

        assert_eq!(words(output), vec!["main.rs", "lib.rs"]);
    }

    #[tokio::test]
    async fn test_matcher_substring_case_sensitive() {
        let args = args_with("R", &["README.md", "main.rs"], json!({"ignoreCase": false}));

        let output = MatcherSubstring.filter(args).await.unwrap();

        assert_eq!(words(output), vec!["README.md"]);
    }

    #[tokio::test]
    async fn test_empty_input_keeps_all() {
        let args = args_with("", &["a", "b"], json!({}));
        assert_eq!(MatcherSubstring.filter(args).await.unwrap().len(), 2);
    }
}
