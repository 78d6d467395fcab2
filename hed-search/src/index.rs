//! Parsed Sphinx search index for one documentation source.
//!
//! Sphinx publishes `searchindex.js`, a script consisting of a single call
//! `Search.setIndex({...})`. Only the keys needed for title/term scoring are
//! read; everything else in the payload (`objects`, `alltitles`,
//! `indexentries`, ...) is ignored.
//!
//! The payload is untrusted: term mappings may reference ids beyond the end
//! of `titles`. Such references are dropped here, once, so scoring can index
//! the parallel arrays without re-checking every lookup.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, SearchError};

/// Opening marker of the embedded payload.
const PAYLOAD_MARKER: &str = "Search.setIndex(";

/// A term maps to one id or a list of ids depending on the Sphinx version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocRefs {
    One(i64),
    Many(Vec<i64>),
}

impl DocRefs {
    fn into_vec(self) -> Vec<i64> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawIndex {
    #[serde(default)]
    titles: Option<Vec<String>>,
    #[serde(default)]
    filenames: Option<Vec<String>>,
    #[serde(default)]
    docnames: Option<Vec<String>>,
    #[serde(default)]
    terms: HashMap<String, DocRefs>,
    #[serde(default)]
    titleterms: HashMap<String, DocRefs>,
}

/// In-memory search index for one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceIndex {
    /// Document titles, indexed by document id.
    pub titles: Vec<String>,
    /// Source filenames, parallel to `titles`.
    pub filenames: Vec<String>,
    /// Canonical page paths without extension, parallel to `titles` when present.
    pub docnames: Option<Vec<String>>,
    /// Body term → sorted, deduplicated document ids.
    pub terms: HashMap<String, Vec<usize>>,
    /// Title term → sorted, deduplicated document ids.
    pub titleterms: HashMap<String, Vec<usize>>,
    /// Number of term references dropped because they were out of range.
    pub discarded_refs: usize,
}

impl SourceIndex {
    /// Parse a full `searchindex.js` body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Format`] if the `Search.setIndex(...)` wrapper
    /// is missing or the embedded JSON is not a valid index object.
    pub fn from_script(body: &str) -> Result<Self> {
        let json = extract_payload(body)?;
        Self::from_json(json)
    }

    /// Parse the JSON object embedded in `searchindex.js`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Format`] if the JSON is invalid or has the
    /// wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawIndex = serde_json::from_str(json)
            .map_err(|e| SearchError::Format(format!("invalid index JSON: {e}")))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawIndex) -> Self {
        let titles = raw.titles.unwrap_or_default();
        let filenames = raw.filenames.unwrap_or_default();
        if titles.len() != filenames.len() {
            tracing::warn!(
                titles = titles.len(),
                filenames = filenames.len(),
                "index titles and filenames differ in length"
            );
        }
        let doc_count = titles.len();

        let mut discarded_refs = 0;
        let mut sanitize = |map: HashMap<String, DocRefs>| -> HashMap<String, Vec<usize>> {
            map.into_iter()
                .map(|(term, refs)| {
                    let mut ids: Vec<usize> = Vec::new();
                    for id in refs.into_vec() {
                        match usize::try_from(id) {
                            Ok(id) if id < doc_count => ids.push(id),
                            _ => discarded_refs += 1,
                        }
                    }
                    ids.sort_unstable();
                    ids.dedup();
                    (term, ids)
                })
                .filter(|(_, ids)| !ids.is_empty())
                .collect()
        };
        let terms = sanitize(raw.terms);
        let titleterms = sanitize(raw.titleterms);

        if discarded_refs > 0 {
            let err = SearchError::CorruptIndex(format!(
                "{discarded_refs} document references outside 0..{doc_count}"
            ));
            tracing::debug!(error = %err, "dropped corrupt term references");
        }

        Self {
            titles,
            filenames,
            docnames: raw.docnames,
            terms,
            titleterms,
            discarded_refs,
        }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Canonical path for `id`, if the index carries a non-empty one.
    pub fn docname(&self, id: usize) -> Option<&str> {
        self.docnames
            .as_ref()
            .and_then(|names| names.get(id))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Locate the JSON argument of `Search.setIndex(...)`: from the marker to
/// the last closing parenthesis in the body.
///
/// # Errors
///
/// Returns [`SearchError::Format`] when the wrapper is absent.
pub fn extract_payload(body: &str) -> Result<&str> {
    let start = body
        .find(PAYLOAD_MARKER)
        .map(|i| i + PAYLOAD_MARKER.len())
        .ok_or_else(|| SearchError::Format("invalid search index format".into()))?;
    let end = body[start..]
        .rfind(')')
        .map(|i| start + i)
        .ok_or_else(|| SearchError::Format("invalid search index format".into()))?;
    Ok(&body[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Search.setIndex({"docnames":["index","guide/intro"],"filenames":["index.rst","guide/intro.md"],"titles":["Welcome","Introduction"],"terms":{"hed":[0,1],"schema":1},"titleterms":{"introduct":[1]},"objects":{}})"#;

    #[test]
    fn parses_sphinx_payload() {
        let index = SourceIndex::from_script(SAMPLE).expect("parse");
        assert_eq!(index.len(), 2);
        assert_eq!(index.titles[1], "Introduction");
        assert_eq!(index.filenames[0], "index.rst");
        assert_eq!(index.docname(1), Some("guide/intro"));
        assert_eq!(index.terms["hed"], vec![0, 1]);
        assert_eq!(index.terms["schema"], vec![1]);
        assert_eq!(index.titleterms["introduct"], vec![1]);
        assert_eq!(index.discarded_refs, 0);
    }

    #[test]
    fn payload_may_span_lines_and_have_trailing_text() {
        let body = "// generated\nSearch.setIndex({\n\"titles\": [\"A\"],\n\"filenames\": [\"a.md\"]\n});\n";
        let index = SourceIndex::from_script(body).expect("parse");
        assert_eq!(index.titles, vec!["A"]);
    }

    #[test]
    fn missing_marker_is_format_error() {
        let err = SourceIndex::from_script("var index = {};").unwrap_err();
        assert!(matches!(err, SearchError::Format(_)));
        assert!(err.to_string().contains("invalid search index format"));
    }

    #[test]
    fn invalid_json_is_format_error() {
        let err = SourceIndex::from_script("Search.setIndex({titles: oops})").unwrap_err();
        assert!(matches!(err, SearchError::Format(_)));
        assert!(err.to_string().contains("invalid index JSON"));
    }

    #[test]
    fn out_of_range_references_discarded() {
        let json = r#"{"titles":["A","B"],"filenames":["a.md","b.md"],"terms":{"x":[0,2,-1,1],"y":[7]},"titleterms":{"z":5}}"#;
        let index = SourceIndex::from_json(json).expect("parse");
        assert_eq!(index.terms["x"], vec![0, 1]);
        assert!(!index.terms.contains_key("y"));
        assert!(index.titleterms.is_empty());
        assert_eq!(index.discarded_refs, 4);
    }

    #[test]
    fn duplicate_ids_collapse() {
        let json = r#"{"titles":["A"],"filenames":["a.md"],"terms":{"x":[0,0,0]}}"#;
        let index = SourceIndex::from_json(json).expect("parse");
        assert_eq!(index.terms["x"], vec![0]);
    }

    #[test]
    fn missing_arrays_parse_as_empty() {
        let index = SourceIndex::from_json(r#"{"terms":{"x":[0]}}"#).expect("parse");
        assert!(index.is_empty());
        assert!(index.filenames.is_empty());
        assert!(index.terms.is_empty());
    }

    #[test]
    fn empty_docname_is_ignored() {
        let json = r#"{"titles":["A"],"filenames":["a.md"],"docnames":[""]}"#;
        let index = SourceIndex::from_json(json).expect("parse");
        assert_eq!(index.docname(0), None);
        assert_eq!(index.docname(3), None);
    }
}
