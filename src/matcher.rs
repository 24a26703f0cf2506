/// A single occurrence of the pattern inside the snapshot.
///
/// Offsets are byte positions into the snapshot the search was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
}

impl SearchMatch {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered matches with a cyclic cursor.
///
/// Built once per indexed search, in left-to-right scan order. An empty ring
/// is valid and reports no current match.
#[derive(Debug, Clone, Default)]
pub struct MatchRing {
    matches: Vec<SearchMatch>,
    cursor: usize,
}

impl MatchRing {
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        Self { matches, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn current(&self) -> Option<SearchMatch> {
        self.matches.get(self.cursor).copied()
    }

    /// Move the cursor to the next match, wrapping after the last one.
    pub fn advance(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.matches.len();
        self.current()
    }

    /// Move the cursor to the previous match, wrapping before the first one.
    pub fn retreat(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.matches.len() - 1) % self.matches.len();
        self.current()
    }
}
