//! Error types for the merge crate.
//!
//! Only failures that abort a whole merge call live here. Unknown filter
//! names and failed initializations are logged and the child is skipped.

use pipeline::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    /// The merge parameters were malformed; no child ran
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The filter directory could not answer a lookup
    #[error("Failed to look up filter '{name}': {source}")]
    Directory {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A resolved child filter failed while filtering
    #[error("Filter '{name}' failed: {source}")]
    Transform {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A child filter task panicked or was cancelled
    #[error("Filter task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MergeError>;
