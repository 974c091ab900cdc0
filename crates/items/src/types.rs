//! Core item type shared by every filter in the pipeline.
//!
//! An [`Item`] is one result entry (a file, a line, a completion candidate).
//! Only a handful of descriptive fields matter to the merge stage; everything
//! else is opaque payload that child filters may read or replace.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Separator used when joining identity fields.
///
/// A NUL never appears in display text, so joined keys cannot collide the
/// way a naive concatenation of `"ab" + "c"` and `"a" + "bc"` would.
pub const IDENTITY_SEPARATOR: char = '\0';

/// One result entry flowing through the filter pipeline.
///
/// `Clone` is a shallow copy: the top-level fields are copied, while the
/// nested `action` and `data` payloads, and the `extra` fields, stay shared
/// behind an [`Arc`].
/// A filter that wants to change a payload goes through [`Arc::make_mut`],
/// which detaches its own copy first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Primary text of the item
    pub word: String,

    /// Text shown to the user when it differs from `word`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Kind name used by the host to pick actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Tree depth for hierarchical sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Text matchers should look at instead of `word`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher_key: Option<String>,

    #[serde(default, skip_serializing_if = "is_null")]
    pub action: Arc<Value>,

    #[serde(default, skip_serializing_if = "is_null")]
    pub data: Arc<Value>,

    /// Host fields this crate does not interpret (`isTree`, `highlights`...),
    /// kept so they survive a load and re-serialize unchanged
    #[serde(flatten)]
    pub extra: Arc<Map<String, Value>>,
}

fn is_null(value: &Arc<Value>) -> bool {
    value.is_null()
}

impl Item {
    /// Create an item with only its primary text set.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_matcher_key(mut self, key: impl Into<String>) -> Self {
        self.matcher_key = Some(key.into());
        self
    }

    pub fn with_action(mut self, action: Value) -> Self {
        self.action = Arc::new(action);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Arc::new(data);
        self
    }

    /// Text that matchers compare against: `matcher_key`, falling back to `word`.
    pub fn matcher_text(&self) -> &str {
        self.matcher_key.as_deref().unwrap_or(&self.word)
    }

    /// Identity signature used for duplicate detection.
    ///
    /// Built from `kind`, `level`, `word` and `display` (in that order).
    /// Missing fields contribute an empty segment.
    pub fn identity_key(&self) -> String {
        let level = self.level.map(|l| l.to_string()).unwrap_or_default();
        let parts = [
            self.kind.as_deref().unwrap_or(""),
            level.as_str(),
            self.word.as_str(),
            self.display.as_deref().unwrap_or(""),
        ];

        let mut key = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                key.push(IDENTITY_SEPARATOR);
            }
            key.push_str(part);
        }
        key
    }
}
