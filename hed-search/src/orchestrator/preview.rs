//! Safe HTML previews with optional term highlighting.
//!
//! Text is escaped first and truncated second; highlighting runs last on
//! the escaped text, so the only markup in a preview is the `<mark>`
//! wrapper added here.

use regex::{Captures, Regex};

use crate::config::SearchOptions;

/// Appended to previews cut at `preview_length`.
pub const ELLIPSIS: &str = "...";

/// Longest entity produced by [`escape_html`] (`&#039;`).
const MAX_ENTITY_LEN: usize = 6;

/// Build the preview for `text` according to `options`.
///
/// Returns an empty string when previews are disabled or `text` is empty.
pub fn generate_preview(text: &str, highlighter: &Highlighter, options: &SearchOptions) -> String {
    if !options.show_previews || text.is_empty() {
        return String::new();
    }

    let escaped = escape_html(text);
    let preview = truncate(&escaped, options.preview_length);

    if options.highlight_terms {
        highlighter.apply(&preview)
    } else {
        preview
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cut escaped text to `max_chars` characters, backing off to before any
/// entity the cut would split.
fn truncate(escaped: &str, max_chars: usize) -> String {
    let Some((byte_end, _)) = escaped.char_indices().nth(max_chars) else {
        return escaped.to_owned();
    };

    let mut head = &escaped[..byte_end];
    if let Some(amp) = head.rfind('&') {
        let tail = &head[amp..];
        if !tail.contains(';') && tail.len() < MAX_ENTITY_LEN {
            head = &head[..amp];
        }
    }
    format!("{head}{ELLIPSIS}")
}

/// Wrap whole-word, case-insensitive occurrences of any term in `<mark>`.
pub fn highlight(escaped: &str, terms: &[String]) -> String {
    Highlighter::new(terms).apply(escaped)
}

/// Compiled highlighting pattern for one query's terms.
///
/// All terms are matched in a single pass so one term can never match
/// inside markup inserted for another. Entities are matched as a separate
/// alternative and passed through untouched.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Compile a highlighter for `terms`. Empty terms are ignored.
    pub fn new(terms: &[String]) -> Self {
        let mut alternatives: Vec<String> = terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(t))
            .collect();
        if alternatives.is_empty() {
            return Self::default();
        }
        // Longest first so "event-context" wins over "event".
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();

        let source = format!(
            r"(?i)(&(?:#[0-9]+|[a-z]+);)|\b({})\b",
            alternatives.join("|")
        );
        match Regex::new(&source) {
            Ok(pattern) => Self {
                pattern: Some(pattern),
            },
            Err(err) => {
                tracing::warn!(error = %err, "highlight pattern failed to compile");
                Self::default()
            }
        }
    }

    /// The highlighter `options` call for: compiled only when previews and
    /// highlighting are both enabled.
    pub fn for_options(terms: &[String], options: &SearchOptions) -> Self {
        if options.show_previews && options.highlight_terms {
            Self::new(terms)
        } else {
            Self::default()
        }
    }

    /// Whether any term will be highlighted.
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Highlight already-escaped text.
    pub fn apply(&self, escaped: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return escaped.to_owned();
        };
        pattern
            .replace_all(escaped, |caps: &Captures<'_>| match caps.get(2) {
                Some(term) => format!("<mark>{}</mark>", term.as_str()),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
