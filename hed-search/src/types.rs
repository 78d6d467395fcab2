//! Core types for documentation sources, search results and load status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently-built documentation site with its own search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSource {
    /// Display name, also the key for the index and status maps.
    pub name: String,
    /// Base URL of the rendered documentation (no trailing slash).
    pub url: String,
    /// URL of the site's `searchindex.js`.
    pub search_index: String,
    /// Human-readable description shown next to grouped results.
    #[serde(default)]
    pub description: String,
    /// Tie-break rank when scores are indistinguishable. Lower wins.
    #[serde(default)]
    pub priority: i32,
    /// Display colour tag for the presentation layer.
    #[serde(default)]
    pub color: String,
    /// Glob patterns of source filenames that must never appear in results.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A single ranked document match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document title as stored in the index.
    pub title: String,
    /// Absolute URL of the rendered page.
    pub url: String,
    /// Name of the source that produced this result.
    pub source: String,
    /// Colour tag copied from the source.
    pub source_color: String,
    /// Description copied from the source.
    pub source_description: String,
    /// Normalised relevance score. A document hitting every query term in
    /// both title and body scores 1.0.
    pub score: f64,
    /// Priority copied from the source.
    pub priority: i32,
    /// HTML-escaped title preview, possibly containing `<mark>` highlights.
    pub preview: String,
}

impl SearchResult {
    /// Score as a rounded percentage, capped at 100.
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// Load state of a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "message")]
pub enum LoadStatus {
    /// Fetch in flight.
    Loading,
    /// Index parsed and available for search.
    Loaded,
    /// Fetch or parse failed; the message names source, URL and cause.
    Error(String),
}

impl LoadStatus {
    /// Returns the short status string used by status snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error(_) => "error",
        }
    }

    /// Whether this status is terminal (loaded or failed).
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement of one source in a `load_indices` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The index was fetched and parsed.
    Success,
    /// The fetch or parse failed; see [`LoadOutcome::error`].
    Error,
}

/// One row of the report returned by `load_indices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOutcome {
    /// Source name.
    pub source: String,
    /// Whether the source loaded.
    pub status: OutcomeStatus,
    /// Composed failure message, present only for failed sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadOutcome {
    pub(crate) fn success(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            status: OutcomeStatus::Success,
            error: None,
        }
    }

    pub(crate) fn failure(source: &str, message: String) -> Self {
        Self {
            source: source.to_owned(),
            status: OutcomeStatus::Error,
            error: Some(message),
        }
    }

    /// Whether the source loaded successfully.
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Aggregate view of the status map, as needed for a "some sources could
/// not be loaded" banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Number of sources currently loaded.
    pub loaded: usize,
    /// Number of sources with any recorded status.
    pub total: usize,
    /// Names of sources whose last load failed, in configuration order.
    pub failed: Vec<String>,
}

impl LoadSummary {
    /// True when every source with a status has loaded.
    pub fn all_loaded(&self) -> bool {
        self.loaded == self.total
    }
}
