//! Glob-style exclusion matching for source filenames.
//!
//! Supported wildcards:
//!
//! - `**` matches any run of characters, including `/`
//! - `*` matches any run of characters except `/`
//!
//! Everything else matches literally. Backslashes in either operand are
//! treated as `/`, and the whole filename must match.

use regex::Regex;

/// Returns true if `filename` matches the glob `pattern`.
///
/// # Examples
///
/// ```
/// use hed_search::pattern::matches_pattern;
///
/// assert!(matches_pattern("Foo.html", "*.html"));
/// assert!(!matches_pattern("sub/Foo.html", "*.html"));
/// assert!(matches_pattern("sub/Foo.html", "**/*.html"));
/// ```
pub fn matches_pattern(filename: &str, pattern: &str) -> bool {
    let filename = filename.replace('\\', "/");
    let pattern = pattern.replace('\\', "/");

    if filename == pattern {
        return true;
    }

    match compile(&pattern) {
        Some(re) => re.is_match(&filename),
        None => false,
    }
}

/// Returns true if any of `patterns` matches `filename`. An empty list
/// excludes nothing.
pub fn is_excluded(filename: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| matches_pattern(filename, p))
}

/// A source's exclusion patterns, compiled once.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<(String, Option<Regex>)>,
}

impl ExclusionFilter {
    /// Compile `patterns`. A pattern whose expression fails to compile still
    /// matches by exact equality.
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                let normalized = p.replace('\\', "/");
                let re = compile(&normalized);
                (normalized, re)
            })
            .collect();
        Self { patterns }
    }

    /// Whether no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Same semantics as [`is_excluded`].
    pub fn is_excluded(&self, filename: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let filename = filename.replace('\\', "/");
        self.patterns.iter().any(|(pattern, re)| {
            *pattern == filename || re.as_ref().is_some_and(|re| re.is_match(&filename))
        })
    }
}

/// Translate a glob into an anchored regex.
fn compile(pattern: &str) -> Option<Regex> {
    let mut expr = String::with_capacity(pattern.len() * 2 + 2);
    expr.push('^');
    for (i, segment) in pattern.split("**").enumerate() {
        if i > 0 {
            expr.push_str(".*");
        }
        for (j, literal) in segment.split('*').enumerate() {
            if j > 0 {
                expr.push_str("[^/]*");
            }
            expr.push_str(&regex::escape(literal));
        }
    }
    expr.push('$');

    match Regex::new(&expr) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "ignoring invalid exclude pattern");
            None
        }
    }
}
