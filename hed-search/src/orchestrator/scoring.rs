//! Per-source relevance scoring.
//!
//! Assigns scores based on:
//! - Body term hits (weight 1 per query term)
//! - Title term hits (weight 3 per query term)
//!
//! Formula: `score = raw / (query_terms * 4)`, so a document hitting every
//! term in both its title and its body scores 1.0.

use std::collections::BTreeMap;

use crate::config::SearchOptions;
use crate::index::SourceIndex;
use crate::pattern::ExclusionFilter;
use crate::types::{SearchResult, SearchSource};

use super::preview::{generate_preview, Highlighter};

/// Raw score contributed by a body hit.
pub const BODY_WEIGHT: u32 = 1;
/// Raw score contributed by a title hit.
pub const TITLE_WEIGHT: u32 = 3;
/// Maximum raw score a single query term can contribute.
pub const MAX_TERM_SCORE: u32 = BODY_WEIGHT + TITLE_WEIGHT;

/// Source filename extensions rewritten to `.html` when no docname exists.
const SOURCE_EXTENSIONS: &[&str] = &["md", "rst", "txt"];

/// Normalise a raw score against the number of query terms.
///
/// ```text
/// score = raw / (term_count * 4)
/// ```
pub fn normalize_score(raw: u32, term_count: usize) -> f64 {
    if term_count == 0 {
        return 0.0;
    }
    f64::from(raw) / (term_count as f64 * f64::from(MAX_TERM_SCORE))
}

/// Accumulate raw scores per document id.
///
/// Every query term is a separate scoring pass, so a repeated term counts
/// twice. Ids are returned in ascending order.
pub fn raw_scores(terms: &[String], index: &SourceIndex) -> BTreeMap<usize, u32> {
    let mut scores: BTreeMap<usize, u32> = BTreeMap::new();
    for term in terms {
        if let Some(ids) = index.terms.get(term) {
            for &id in ids {
                *scores.entry(id).or_default() += BODY_WEIGHT;
            }
        }
        if let Some(ids) = index.titleterms.get(term) {
            for &id in ids {
                *scores.entry(id).or_default() += TITLE_WEIGHT;
            }
        }
    }
    scores
}

/// Relative page path for a document.
///
/// Prefers the docname. Otherwise source extensions become `.html`, an
/// extensionless filename gains `.html`, and anything else (directory paths,
/// `.html`, other extensions) is kept as is.
pub fn resolve_path(index: &SourceIndex, id: usize) -> Option<String> {
    if let Some(docname) = index.docname(id) {
        return Some(format!("{docname}.html"));
    }
    let filename = index.filenames.get(id)?;
    Some(rewrite_extension(filename))
}

fn rewrite_extension(filename: &str) -> String {
    if filename.ends_with('/') {
        return filename.to_owned();
    }
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = &name[dot + 1..];
            if SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
            {
                let stem = &filename[..filename.len() - ext.len() - 1];
                format!("{stem}.html")
            } else {
                filename.to_owned()
            }
        }
        _ => format!("{filename}.html"),
    }
}

/// Score, filter, sort and cap one source's matches for `terms`.
///
/// Pure: no I/O, and identical inputs always produce identical output.
/// Ties on score keep ascending document id order. Previews are built only
/// for results that survive the cap, using the query's `highlighter`.
pub fn search_index(
    terms: &[String],
    highlighter: &Highlighter,
    index: &SourceIndex,
    source: &SearchSource,
    exclusions: &ExclusionFilter,
    options: &SearchOptions,
) -> Vec<SearchResult> {
    if index.titles.is_empty() || index.filenames.is_empty() {
        tracing::warn!(source = %source.name, "invalid index structure, skipping source");
        return Vec::new();
    }

    let base = source.url.trim_end_matches('/');
    let mut results = Vec::new();

    for (id, raw) in raw_scores(terms, index) {
        let (Some(title), Some(filename)) = (index.titles.get(id), index.filenames.get(id)) else {
            continue;
        };

        if exclusions.is_excluded(filename) {
            if options.enable_debug_log {
                tracing::debug!(source = %source.name, filename, "excluded");
            }
            continue;
        }

        let score = normalize_score(raw, terms.len());
        if score < options.min_score {
            continue;
        }

        let Some(path) = resolve_path(index, id) else {
            continue;
        };

        results.push(SearchResult {
            title: title.clone(),
            url: format!("{base}/{path}"),
            source: source.name.clone(),
            source_color: source.color.clone(),
            source_description: source.description.clone(),
            score,
            priority: source.priority,
            preview: String::new(),
        });
    }

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(options.max_results_per_source);
    for result in &mut results {
        result.preview = generate_preview(&result.title, highlighter, options);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_source(exclude: Vec<String>) -> SearchSource {
        SearchSource {
            name: "HED resources".into(),
            url: "https://www.hedtags.org/hed-resources".into(),
            search_index: "https://www.hedtags.org/hed-resources/searchindex.js".into(),
            description: "HED tutorials".into(),
            priority: 1,
            color: "#0dcaf0".into(),
            exclude,
        }
    }

    fn make_index(
        titles: &[&str],
        filenames: &[&str],
        terms: &[(&str, &[usize])],
        titleterms: &[(&str, &[usize])],
    ) -> SourceIndex {
        let to_map = |pairs: &[(&str, &[usize])]| -> HashMap<String, Vec<usize>> {
            pairs
                .iter()
                .map(|(t, ids)| (t.to_string(), ids.to_vec()))
                .collect()
        };
        SourceIndex {
            titles: titles.iter().map(|s| s.to_string()).collect(),
            filenames: filenames.iter().map(|s| s.to_string()).collect(),
            docnames: None,
            terms: to_map(terms),
            titleterms: to_map(titleterms),
            discarded_refs: 0,
        }
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run(
        terms: &[String],
        index: &SourceIndex,
        source: &SearchSource,
        options: &SearchOptions,
    ) -> Vec<SearchResult> {
        let exclusions = ExclusionFilter::new(&source.exclude);
        let highlighter = Highlighter::for_options(terms, options);
        search_index(terms, &highlighter, index, source, &exclusions, options)
    }

    #[test]
    fn title_hit_weighs_three_body_hits() {
        let index = make_index(
            &["Validation Errors", "Schema"],
            &["errors.md", "schema.md"],
            &[("validation", &[1])],
            &[("validation", &[0])],
        );
        let results = run(
            &terms(&["validation"]),
            &index,
            &make_source(vec![]),
            &SearchOptions::default(),
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Validation Errors");
        assert!((results[0].score - 0.75).abs() < f64::EPSILON);
        assert!((results[1].score - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn title_and_body_hit_scores_one() {
        let index = make_index(
            &["Validation Guide"],
            &["guide.md"],
            &[("validation", &[0])],
            &[("validation", &[0])],
        );
        let results = run(
            &terms(&["validation"]),
            &index,
            &make_source(vec![]),
            &SearchOptions::default(),
        );
        assert!((results[0].score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_divides_by_term_count() {
        let index = make_index(&["Events"], &["events.md"], &[], &[("event", &[0])]);
        let results = run(
            &terms(&["event", "marker"]),
            &index,
            &make_source(vec![]),
            &SearchOptions::default(),
        );
        assert!((results[0].score - 3.0 / 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn results_below_min_score_dropped() {
        let index = make_index(&["A", "B"], &["a.md", "b.md"], &[("x", &[1])], &[("x", &[0])]);
        let options = SearchOptions {
            min_score: 0.5,
            ..Default::default()
        };
        let results = run(&terms(&["x"]), &index, &make_source(vec![]), &options);
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|r| r.score >= options.min_score));
    }

    #[test]
    fn excluded_filenames_never_returned() {
        let index = make_index(
            &["Online tools (moved)", "Online tools"],
            &["HedOnlineTools.html", "tools/online.md"],
            &[],
            &[("online", &[0, 1])],
        );
        let source = make_source(vec!["HedOnlineTools.html".into()]);
        let results = run(&terms(&["online"]), &index, &source, &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://www.hedtags.org/hed-resources/tools/online.html");
    }

    #[test]
    fn per_source_cap_applied_after_sort() {
        let titles: Vec<String> = (0..15).map(|i| format!("Doc {i}")).collect();
        let filenames: Vec<String> = (0..15).map(|i| format!("doc{i}.md")).collect();
        let mut index = SourceIndex {
            titles,
            filenames,
            ..Default::default()
        };
        index.terms.insert("doc".into(), (0..15).collect());
        index.titleterms.insert("doc".into(), vec![14]);
        let options = SearchOptions {
            max_results_per_source: 5,
            ..Default::default()
        };
        let results = run(&terms(&["doc"]), &index, &make_source(vec![]), &options);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "Doc 14");
        // Remaining ties keep ascending id order.
        assert_eq!(results[1].title, "Doc 0");
        assert_eq!(results[4].title, "Doc 3");
    }

    #[test]
    fn missing_titles_or_filenames_yield_nothing() {
        let index = make_index(&[], &[], &[("x", &[0])], &[]);
        let results = run(&terms(&["x"]), &index, &make_source(vec![]), &SearchOptions::default());
        assert!(results.is_empty());
    }

    #[test]
    fn ids_beyond_filenames_skipped() {
        let index = make_index(&["A", "B"], &["a.md"], &[], &[("x", &[0, 1])]);
        let results = run(&terms(&["x"]), &index, &make_source(vec![]), &SearchOptions::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "A");
    }

    #[test]
    fn url_prefers_docname() {
        let mut index = make_index(&["Intro"], &["intro.md"], &[], &[("intro", &[0])]);
        index.docnames = Some(vec!["guide/introduction".into()]);
        assert_eq!(resolve_path(&index, 0).as_deref(), Some("guide/introduction.html"));
    }

    #[test]
    fn url_falls_back_to_filename_rewrite() {
        let index = make_index(
            &["a", "b", "c", "d", "e", "f", "g"],
            &["guide.md", "api.RST", "notes.txt", "page.html", "folder/", "plain", "v1.2/intro"],
            &[],
            &[],
        );
        let paths: Vec<_> = (0..7)
            .map(|i| resolve_path(&index, i).unwrap_or_default())
            .collect();
        assert_eq!(
            paths,
            vec![
                "guide.html",
                "api.html",
                "notes.html",
                "page.html",
                "folder/",
                "plain.html",
                "v1.2/intro.html",
            ]
        );
    }

    #[test]
    fn other_extensions_left_unchanged() {
        let index = make_index(
            &["Notebook", "Schema", "Archive"],
            &["tutorials/page.ipynb", "schemas/HED8.3.0.xml", "downloads/hed.tar.gz"],
            &[],
            &[],
        );
        let paths: Vec<_> = (0..3)
            .map(|i| resolve_path(&index, i).unwrap_or_default())
            .collect();
        assert_eq!(
            paths,
            vec!["tutorials/page.ipynb", "schemas/HED8.3.0.xml", "downloads/hed.tar.gz"]
        );
    }

    #[test]
    fn base_url_trailing_slash_not_doubled() {
        let index = make_index(&["A"], &["a.md"], &[], &[("a1", &[0])]);
        let mut source = make_source(vec![]);
        source.url.push('/');
        let results = run(&terms(&["a1"]), &index, &source, &SearchOptions::default());
        assert_eq!(results[0].url, "https://www.hedtags.org/hed-resources/a.html");
    }

    #[test]
    fn result_carries_source_metadata() {
        let index = make_index(&["Schema"], &["schema.md"], &[], &[("schema", &[0])]);
        let results = run(
            &terms(&["schema"]),
            &index,
            &make_source(vec![]),
            &SearchOptions::default(),
        );
        let r = &results[0];
        assert_eq!(r.source, "HED resources");
        assert_eq!(r.source_color, "#0dcaf0");
        assert_eq!(r.source_description, "HED tutorials");
        assert_eq!(r.priority, 1);
        assert_eq!(r.preview, "<mark>Schema</mark>");
    }

    #[test]
    fn scoring_is_deterministic() {
        let index = make_index(
            &["A", "B", "C"],
            &["a.md", "b.md", "c.md"],
            &[("x", &[2, 0, 1])],
            &[("x", &[1])],
        );
        let source = make_source(vec![]);
        let first = run(&terms(&["x"]), &index, &source, &SearchOptions::default());
        let second = run(&terms(&["x"]), &index, &source, &SearchOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn previews_use_the_shared_highlighter() {
        let index = make_index(
            &["Schema basics", "Schema library", "Other schema"],
            &["a.md", "b.md", "c.md"],
            &[],
            &[("schema", &[0, 1, 2])],
        );
        let source = make_source(vec![]);
        let options = SearchOptions {
            max_results_per_source: 2,
            ..Default::default()
        };
        let words = terms(&["schema"]);
        let highlighter = Highlighter::for_options(&words, &options);
        let exclusions = ExclusionFilter::new(&source.exclude);
        let results = search_index(&words, &highlighter, &index, &source, &exclusions, &options);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].preview, "<mark>Schema</mark> basics");
        assert_eq!(results[1].preview, "<mark>Schema</mark> library");

        let plain = search_index(
            &words,
            &Highlighter::default(),
            &index,
            &source,
            &exclusions,
            &options,
        );
        assert_eq!(plain[0].preview, "Schema basics");
    }

    #[test]
    fn normalize_score_with_no_terms_is_zero() {
        assert_eq!(normalize_score(3, 0), 0.0);
        assert!((normalize_score(3, 1) - 0.75).abs() < f64::EPSILON);
    }
}
