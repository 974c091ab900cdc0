//! Matcher keeping items whose text starts with the user input.

use super::param_bool;
use crate::traits::{Filter, FilterArgs, FilterOutput};
use anyhow::Result;
use async_trait::async_trait;
use items::Item;

/// Keeps items whose matcher text starts with the input.
///
/// ## Params
/// - `ignoreCase` (default `true`)
pub struct MatcherHead;

impl MatcherHead {
    pub const NAME: &'static str = "matcher_head";
}

#[async_trait]
impl Filter for MatcherHead {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn filter(&self, args: FilterArgs) -> Result<FilterOutput> {
        let input = args.context.input.as_str();
        if input.is_empty() {
            return Ok(args.items.into());
        }
        let ignore_case = param_bool(&args.filter_params, "ignoreCase", true);
        let prefix = if ignore_case {
            input.to_lowercase()
        } else {
            input.to_string()
        };

        let filtered: Vec<Item> = args
            .items
            .into_iter()
            .filter(|item| {
                if ignore_case {
                    item.matcher_text().to_lowercase().starts_with(&prefix)
                } else {
                    item.matcher_text().starts_with(&prefix)
                }
            })
            .collect();
        Ok(filtered.into())
    }
}
