use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::matcher::SearchMatch;

/// How the pattern string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Literal,
    Regex,
}

/// Options fixed for the lifetime of one search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            mode: SearchMode::Literal,
        }
    }
}

/// The pattern failed to parse as a regular expression.
///
/// Only regex-mode searches can raise this; literal patterns are escaped
/// before compilation and always parse.
#[derive(Debug, Clone)]
pub struct PatternSyntaxError {
    message: String,
}

impl fmt::Display for PatternSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PatternSyntaxError {}

impl From<regex::Error> for PatternSyntaxError {
    fn from(err: regex::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub(crate) fn compile(pattern: &str, config: &SearchConfig) -> Result<Regex, PatternSyntaxError> {
    let source = match config.mode {
        SearchMode::Literal => regex::escape(pattern),
        SearchMode::Regex => pattern.to_string(),
    };

    RegexBuilder::new(&source)
        .case_insensitive(!config.case_sensitive)
        .build()
        .map_err(PatternSyntaxError::from)
}

/// Collect every non-overlapping match in left-to-right order.
///
/// Zero-width matches are dropped: they select nothing, and keeping them
/// would turn an empty pattern into one match per character boundary.
pub(crate) fn scan_matches(regex: &Regex, text: &str) -> Vec<SearchMatch> {
    regex
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| SearchMatch::new(m.start(), m.end()))
        .collect()
}

/// First match starting strictly after byte offset `pos` (`-1` scans from the
/// top). Overlapping starts count: this is an offset comparison, not a step
/// through non-overlapping matches.
pub(crate) fn find_after(regex: &Regex, text: &str, pos: isize) -> Option<SearchMatch> {
    let from = ceil_char_boundary(text, (pos + 1).max(0) as usize)?;
    regex
        .find_at(text, from)
        .map(|m| SearchMatch::new(m.start(), m.end()))
}

/// Last match starting strictly before byte offset `pos`. Pass `isize::MAX`
/// for the last match in the whole snapshot.
pub(crate) fn find_before(regex: &Regex, text: &str, pos: isize) -> Option<SearchMatch> {
    if pos <= 0 {
        return None;
    }

    let mut found = None;
    let mut from = 0;
    while let Some(m) = regex.find_at(text, from) {
        if (m.start() as isize) >= pos {
            break;
        }
        found = Some(SearchMatch::new(m.start(), m.end()));
        match ceil_char_boundary(text, m.start() + 1) {
            Some(next) => from = next,
            None => break,
        }
    }
    found
}

/// Smallest char boundary at or after `at`; `None` past the end of `text`.
fn ceil_char_boundary(text: &str, at: usize) -> Option<usize> {
    (at..=text.len()).find(|&i| text.is_char_boundary(i))
}
