use crate::matcher::SearchMatch;

/// What the host should highlight after a completed search step.
///
/// `position < 0` or `length == 0` means there is nothing to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub position: isize,
    pub length: usize,
}

impl Highlight {
    /// "Nothing found" for searches tracking a raw text offset.
    pub const NONE: Highlight = Highlight {
        position: -1,
        length: 0,
    };

    /// "Nothing to highlight" for searches tracking an index into a match list.
    pub const CLEAR: Highlight = Highlight {
        position: 0,
        length: 0,
    };

    /// Whether this highlight selects an actual span of text.
    pub fn is_visible(&self) -> bool {
        self.position >= 0 && self.length > 0
    }
}

impl From<SearchMatch> for Highlight {
    fn from(m: SearchMatch) -> Self {
        Self {
            position: m.start as isize,
            length: m.len(),
        }
    }
}

/// Sink for highlights produced by search workers.
///
/// Invoked from worker threads; an implementation that needs the UI thread
/// must marshal itself. A channel sink makes that a plain drain.
pub trait HighlightSink: Send + Sync + 'static {
    fn on_match(&self, highlight: Highlight);
}

/// Forwards highlights into a channel the host drains wherever it schedules
/// redraws. A disconnected receiver drops the report.
impl HighlightSink for flume::Sender<Highlight> {
    fn on_match(&self, highlight: Highlight) {
        let _ = self.send(highlight);
    }
}
