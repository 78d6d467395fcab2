//! The aggregator facade: load every source, search whatever is loaded.
//!
//! [`DocSearch`] owns the only mutable state in the crate, the loaded
//! indices and the per-source load status, each behind its own lock. Loads
//! write one key at a time after their fetch settles and never hold a lock
//! across an await, so [`DocSearch::search`] can run at any moment and sees
//! a consistent snapshot of the sources loaded so far.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::SourceIndex;
use crate::loader::{describe_failure, load_source, HttpFetcher, IndexFetcher};
use crate::orchestrator::merge::merge_results;
use crate::orchestrator::preview::Highlighter;
use crate::orchestrator::scoring::search_index;
use crate::pattern::ExclusionFilter;
use crate::tokenizer::{Stemmer, Tokenizer};
use crate::types::{LoadOutcome, LoadStatus, LoadSummary, SearchResult, SearchSource};

/// Multi-source documentation search.
pub struct DocSearch<F = HttpFetcher> {
    config: SearchConfig,
    fetcher: F,
    tokenizer: Tokenizer,
    /// Compiled exclusion patterns, parallel to `config.sources`.
    exclusions: Vec<ExclusionFilter>,
    indices: RwLock<HashMap<String, Arc<SourceIndex>>>,
    status: RwLock<HashMap<String, LoadStatus>>,
}

impl DocSearch<HttpFetcher> {
    /// Create an aggregator that fetches indices over HTTP.
    ///
    /// No index is loaded until [`DocSearch::load_indices`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Config`] for an invalid configuration or
    /// [`crate::SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::assemble(config, fetcher))
    }
}

impl<F: IndexFetcher> DocSearch<F> {
    /// Create an aggregator with a custom [`IndexFetcher`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::SearchError::Config`] for an invalid configuration.
    pub fn with_fetcher(config: SearchConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, fetcher))
    }

    fn assemble(config: SearchConfig, fetcher: F) -> Self {
        let exclusions = config
            .sources
            .iter()
            .map(|s| ExclusionFilter::new(&s.exclude))
            .collect();
        Self {
            config,
            fetcher,
            tokenizer: Tokenizer::new(),
            exclusions,
            indices: RwLock::new(HashMap::new()),
            status: RwLock::new(HashMap::new()),
        }
    }

    /// Stem query terms with `stemmer` before lookup.
    pub fn with_stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
        self.tokenizer = Tokenizer::with_stemmer(stemmer);
        self
    }

    /// The configuration this aggregator was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Configured sources, in configuration order.
    pub fn sources(&self) -> &[SearchSource] {
        &self.config.sources
    }

    /// Load every configured source concurrently.
    ///
    /// Resolves once every source has either loaded or failed; one failure
    /// never cancels or affects the others. Returns one row per source in
    /// configuration order. Never returns an error: failures are reported in
    /// the rows and in [`DocSearch::loading_status`].
    pub async fn load_indices(&self) -> Vec<LoadOutcome> {
        let loads = self.config.sources.iter().map(|source| self.load_one(source));
        let outcomes = futures::future::join_all(loads).await;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        if failed > 0 {
            tracing::warn!(failed, total = outcomes.len(), "some indices failed to load");
        } else {
            tracing::info!(total = outcomes.len(), "all indices loaded");
        }
        outcomes
    }

    async fn load_one(&self, source: &SearchSource) -> LoadOutcome {
        self.set_status(&source.name, LoadStatus::Loading);
        self.debug(|| tracing::debug!(source = %source.name, "loading index"));

        match load_source(&self.fetcher, source).await {
            Ok(index) => {
                self.debug(|| {
                    tracing::debug!(
                        source = %source.name,
                        documents = index.len(),
                        discarded_refs = index.discarded_refs,
                        "loaded index"
                    )
                });
                write_lock(&self.indices).insert(source.name.clone(), Arc::new(index));
                self.set_status(&source.name, LoadStatus::Loaded);
                LoadOutcome::success(&source.name)
            }
            Err(err) => {
                let message = describe_failure(source, &err);
                tracing::warn!(
                    source = %source.name,
                    url = %source.search_index,
                    error = %err,
                    "failed to load search index"
                );
                write_lock(&self.indices).remove(&source.name);
                self.set_status(&source.name, LoadStatus::Error(message.clone()));
                LoadOutcome::failure(&source.name, message)
            }
        }
    }

    /// Search every currently loaded source.
    ///
    /// Returns an empty list for a blank query, a query with no usable
    /// terms, or when nothing has loaded yet. Never fails.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let terms = self.tokenizer.tokenize(query);
        self.debug(|| tracing::debug!(?terms, "searching"));
        if terms.is_empty() {
            return Vec::new();
        }

        let loaded: Vec<(usize, Arc<SourceIndex>)> = {
            let indices = read_lock(&self.indices);
            self.config
                .sources
                .iter()
                .enumerate()
                .filter_map(|(i, s)| indices.get(&s.name).map(|idx| (i, Arc::clone(idx))))
                .collect()
        };

        let highlighter = Highlighter::for_options(&terms, &self.config.options);
        let per_source: Vec<Vec<SearchResult>> = loaded
            .iter()
            .map(|(i, index)| {
                let source = &self.config.sources[*i];
                let results = search_index(
                    &terms,
                    &highlighter,
                    index,
                    source,
                    &self.exclusions[*i],
                    &self.config.options,
                );
                self.debug(|| {
                    tracing::debug!(source = %source.name, count = results.len(), "source results")
                });
                results
            })
            .collect();

        let merged = merge_results(per_source);
        self.debug(|| tracing::debug!(total = merged.len(), "merged results"));
        merged
    }

    /// Tokenize `query` exactly as [`DocSearch::search`] does.
    pub fn tokenize(&self, query: &str) -> Vec<String> {
        self.tokenizer.tokenize(query)
    }

    /// Snapshot of every source's status. Sources never loaded are absent.
    pub fn loading_status(&self) -> BTreeMap<String, LoadStatus> {
        read_lock(&self.status)
            .iter()
            .map(|(name, status)| (name.clone(), status.clone()))
            .collect()
    }

    /// Status of one source, if a load has been started for it.
    pub fn status_of(&self, name: &str) -> Option<LoadStatus> {
        read_lock(&self.status).get(name).cloned()
    }

    /// Whether `name` currently has a searchable index.
    pub fn is_loaded(&self, name: &str) -> bool {
        read_lock(&self.indices).contains_key(name)
    }

    /// Loaded/total counts and failed source names.
    pub fn load_summary(&self) -> LoadSummary {
        let status = read_lock(&self.status);
        let mut summary = LoadSummary {
            total: status.len(),
            ..Default::default()
        };
        for source in &self.config.sources {
            match status.get(&source.name) {
                Some(LoadStatus::Loaded) => summary.loaded += 1,
                Some(LoadStatus::Error(_)) => summary.failed.push(source.name.clone()),
                _ => {}
            }
        }
        summary
    }

    fn set_status(&self, name: &str, status: LoadStatus) {
        write_lock(&self.status).insert(name.to_owned(), status);
    }

    fn debug(&self, emit: impl FnOnce()) {
        if self.config.options.enable_debug_log {
            emit();
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
