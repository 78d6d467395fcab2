//! Plain-text and JSON rendering of search results for the terminal.

use std::collections::BTreeMap;
use std::fmt::Write;

use hed_search::{LoadStatus, LoadSummary, SearchResult, SearchSource, group_by_source};
use serde::Serialize;

/// Machine-readable search output.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub query: &'a str,
    pub results: &'a [SearchResult],
    pub status: BTreeMap<String, String>,
}

impl<'a> JsonReport<'a> {
    pub fn new(
        query: &'a str,
        results: &'a [SearchResult],
        status: &BTreeMap<String, LoadStatus>,
    ) -> Self {
        Self {
            query,
            results,
            status: status
                .iter()
                .map(|(name, s)| (name.clone(), s.as_str().to_owned()))
                .collect(),
        }
    }
}

/// One line naming failed sources, or `None` when everything loaded.
pub fn load_warning(summary: &LoadSummary) -> Option<String> {
    if summary.failed.is_empty() {
        return None;
    }
    Some(format!(
        "Note: some documentation sources could not be loaded: {}",
        summary.failed.join(", ")
    ))
}

/// Results grouped by source, with score percentages and URLs.
pub fn format_results(query: &str, results: &[SearchResult], summary: &LoadSummary) -> String {
    let mut out = String::new();
    if let Some(warning) = load_warning(summary) {
        let _ = writeln!(out, "{warning}");
    }

    if results.is_empty() {
        let _ = writeln!(
            out,
            "No matches found for \"{query}\" in {} documentation source(s).",
            summary.loaded
        );
        return out;
    }

    let groups = group_by_source(results);
    let _ = writeln!(
        out,
        "Found {} result{} for \"{query}\" across {} documentation source(s)",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        groups.len()
    );

    for (source, members) in groups {
        let description = members
            .first()
            .map(|r| r.source_description.as_str())
            .unwrap_or_default();
        let _ = writeln!(out, "\n[{}] {source} - {description}", members.len());
        for result in members {
            let _ = writeln!(out, "  {:>3}%  {}", result.score_percent(), result.title);
            let _ = writeln!(out, "        {}", result.url);
        }
    }
    out
}

/// Per-source load status table in configuration order.
pub fn format_status(sources: &[SearchSource], status: &BTreeMap<String, LoadStatus>) -> String {
    let mut out = String::new();
    for source in sources {
        match status.get(&source.name) {
            Some(LoadStatus::Error(message)) => {
                let _ = writeln!(out, "error    {}: {message}", source.name);
            }
            Some(s) => {
                let _ = writeln!(out, "{:<8} {}", s.as_str(), source.name);
            }
            None => {
                let _ = writeln!(out, "pending  {}", source.name);
            }
        }
    }
    out
}

/// Configured sources with priority, URL and exclusions.
pub fn format_sources(sources: &[SearchSource]) -> String {
    let mut out = String::new();
    for source in sources {
        let _ = writeln!(out, "{:>2}. {} <{}>", source.priority, source.name, source.url);
        if !source.description.is_empty() {
            let _ = writeln!(out, "    {}", source.description);
        }
        if !source.exclude.is_empty() {
            let _ = writeln!(out, "    excludes: {}", source.exclude.join(", "));
        }
    }
    out
}
