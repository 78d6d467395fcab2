//! # hed-search
//!
//! Client-side search across multiple Sphinx-generated documentation sites.
//!
//! Each site publishes a `searchindex.js`. This crate fetches every
//! configured site's index concurrently, scores documents for a query with
//! a single relevance model, and merges the per-site results into one
//! ranked list.
//!
//! ## Design
//!
//! - Indices are fetched concurrently; a site that fails to load is
//!   reported in its load status and simply left out of results
//! - Title matches weigh three times as much as body matches; scores are
//!   normalised to `[0, 1]` per query
//! - Near-equal scores across sites are ordered by the site's priority
//! - Per-site glob exclusions hide pages such as redirect shims
//! - Previews are HTML-escaped before `<mark>` highlighting is applied
//!
//! ## Security
//!
//! - Titles from fetched indices are untrusted; previews contain no markup
//!   other than `<mark>`
//! - Document ids from fetched indices are bounds-checked before use

pub mod aggregator;
pub mod config;
pub mod error;
pub mod http;
pub mod index;
pub mod loader;
pub mod orchestrator;
pub mod pattern;
pub mod tokenizer;
pub mod types;

pub use aggregator::DocSearch;
pub use config::{SearchConfig, SearchOptions};
pub use error::{Result, SearchError};
pub use index::SourceIndex;
pub use loader::{HttpFetcher, IndexFetcher};
pub use orchestrator::merge::group_by_source;
pub use tokenizer::{Stemmer, Tokenizer};
pub use types::{LoadOutcome, LoadStatus, LoadSummary, OutcomeStatus, SearchResult, SearchSource};

/// Load every source in `config` and run one query against them.
///
/// Sources that fail to load are skipped; use [`DocSearch`] directly to
/// inspect load status or run several queries against one load.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration or
/// [`SearchError::Http`] if the HTTP client cannot be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hed_search::Result<()> {
/// let config = hed_search::SearchConfig {
///     sources: vec![hed_search::SearchSource {
///         name: "HED Python Tools".into(),
///         url: "https://www.hedtags.org/hed-python".into(),
///         search_index: "https://www.hedtags.org/hed-python/searchindex.js".into(),
///         description: "Python library for HED validation and analysis".into(),
///         priority: 1,
///         color: "#6610f2".into(),
///         exclude: vec![],
///     }],
///     ..Default::default()
/// };
/// for result in hed_search::search("schema validation", config).await? {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: SearchConfig) -> Result<Vec<SearchResult>> {
    let search = DocSearch::new(config)?;
    search.load_indices().await;
    Ok(search.search(query))
}
