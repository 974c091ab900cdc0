//! Sorter ordering items alphabetically by word.

use super::param_bool;
use crate::traits::{Filter, FilterArgs, FilterOutput};
use anyhow::Result;
use async_trait::async_trait;

/// Sorts items by `word` (byte order), stable for equal words.
///
/// ## Params
/// - `reverse` (default `false`): descending order
pub struct SorterAlpha;

impl SorterAlpha {
    pub const NAME: &'static str = "sorter_alpha";
}

#[async_trait]
impl Filter for SorterAlpha {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn filter(&self, args: FilterArgs) -> Result<FilterOutput> {
        let reverse = param_bool(&args.filter_params, "reverse", false);
        let mut items = args.items;

        if reverse {
            items.sort_by(|a, b| b.word.cmp(&a.word));
        } else {
            items.sort_by(|a, b| a.word.cmp(&b.word));
        }
        Ok(items.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::{args_with, words};
    use serde_json::json;

    #[tokio::test]
    async fn test_sorter_alpha() {
        let args = args_with("", &["pear", "apple", "fig"], json!({}));
        let output = SorterAlpha.filter(args).await.unwrap();
        assert_eq!(words(output), vec!["apple", "fig", "pear"]);
    }

    #[tokio::test]
    async fn test_sorter_alpha_reverse() {
        let args = args_with("", &["pear", "apple", "fig"], json!({"reverse": true}));
        let output = SorterAlpha.filter(args).await.unwrap();
        assert_eq!(words(output), vec!["pear", "fig", "apple"]);
    }
}
