//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] lists the documentation sources to aggregate and the
//! [`SearchOptions`] that shape ranking and previews.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SearchError;
use crate::types::SearchSource;

/// Ranking and preview options shared by every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Results kept per source after ranking.
    pub max_results_per_source: usize,
    /// Results scoring below this threshold are discarded. Within `[0, 1]`.
    pub min_score: f64,
    /// Wrap query terms in `<mark>` inside previews.
    pub highlight_terms: bool,
    /// Produce previews at all. When false every preview is empty.
    pub show_previews: bool,
    /// Maximum preview length in characters before `...` is appended.
    pub preview_length: usize,
    /// Emit per-query diagnostics at debug level.
    pub enable_debug_log: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results_per_source: 10,
            min_score: 0.1,
            highlight_terms: true,
            show_previews: true,
            preview_length: 150,
            enable_debug_log: false,
        }
    }
}

/// Configuration for the multi-source aggregator.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Documentation sources, in presentation order.
    pub sources: Vec<SearchSource>,
    /// Ranking and preview options.
    pub options: SearchOptions,
    /// Per-request HTTP timeout in seconds when fetching indices.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, identifies as this crate.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            options: SearchOptions::default(),
            timeout_seconds: 15,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results_per_source` must be greater than 0
    /// - `min_score` must be within `[0, 1]`
    /// - `preview_length` must be greater than 0 when previews are shown
    /// - `timeout_seconds` must be greater than 0
    /// - source names must be non-empty and unique
    /// - source `url` and `search_index` must be absolute URLs
    pub fn validate(&self) -> Result<(), SearchError> {
        let options = &self.options;
        if options.max_results_per_source == 0 {
            return Err(SearchError::Config(
                "max_results_per_source must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&options.min_score) {
            return Err(SearchError::Config(
                "min_score must be within [0, 1]".into(),
            ));
        }
        if options.show_previews && options.preview_length == 0 {
            return Err(SearchError::Config(
                "preview_length must be greater than 0 when previews are shown".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(SearchError::Config("source name must not be empty".into()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(SearchError::Config(format!(
                    "duplicate source name \"{}\"",
                    source.name
                )));
            }
            for (field, value) in [("url", &source.url), ("search_index", &source.search_index)] {
                Url::parse(value).map_err(|e| {
                    SearchError::Config(format!(
                        "source \"{}\" has invalid {field} \"{value}\": {e}",
                        source.name
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Look up a configured source by name.
    pub fn source(&self, name: &str) -> Option<&SearchSource> {
        self.sources.iter().find(|s| s.name == name)
    }
}
