use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use regex::Regex;

use crate::engine::{self, PatternSyntaxError, SearchConfig, SearchMode};
use crate::highlight::{Highlight, HighlightSink};
use crate::matcher::{MatchRing, SearchMatch};
use crate::queue::TaskQueue;

/// Common contract for all search strategies.
///
/// Navigation is asynchronous: `find_next`/`find_prev` enqueue the step and
/// return immediately; the outcome reaches the [`HighlightSink`] given at
/// construction, in the order the calls were issued. The accessors reflect
/// the most recently *completed* step, never a pending one.
pub trait Searcher: Send + Sync {
    /// Advance to the next occurrence, wrapping after the last one.
    fn find_next(&self);

    /// Retreat to the previous occurrence, wrapping before the first one.
    fn find_prev(&self);

    /// Offset of the current occurrence, negative when there is none.
    fn position(&self) -> isize;

    /// Length of the current occurrence, 0 when there is none.
    fn match_length(&self) -> usize;
}

/// Placeholder strategy used before any search has started.
///
/// Navigation requests are accepted and ignored, so hosts can wire up
/// next/previous controls without checking whether a search exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct InactiveSearcher;

impl Searcher for InactiveSearcher {
    fn find_next(&self) {}

    fn find_prev(&self) {}

    fn position(&self) -> isize {
        0
    }

    fn match_length(&self) -> usize {
        0
    }
}

/// Substring search that re-scans the snapshot on every step.
///
/// Keeps no match index: each step costs one pass over the snapshot and O(1)
/// memory, the opposite trade-off from [`RegexSearcher`]. The cursor starts
/// at `-1` ("nothing found yet"); wrap-around re-searches the whole snapshot.
pub struct LiteralSearcher {
    shared: Arc<LiteralShared>,
    queue: TaskQueue,
}

struct LiteralShared {
    text: Arc<str>,
    regex: Option<Regex>,
    current: Mutex<Highlight>,
    sink: Arc<dyn HighlightSink>,
}

impl LiteralSearcher {
    /// An empty pattern never matches; every step then reports the
    /// "nothing found" state.
    pub fn new(
        snapshot: impl Into<Arc<str>>,
        pattern: &str,
        case_sensitive: bool,
        sink: impl HighlightSink,
    ) -> Self {
        let config = SearchConfig {
            case_sensitive,
            mode: SearchMode::Literal,
        };
        let regex = if pattern.is_empty() {
            None
        } else {
            // Escaped literals always parse.
            engine::compile(pattern, &config).ok()
        };
        Self::assemble(snapshot.into(), regex, Arc::new(sink))
    }

    pub(crate) fn assemble(
        text: Arc<str>,
        regex: Option<Regex>,
        sink: Arc<dyn HighlightSink>,
    ) -> Self {
        Self {
            shared: Arc::new(LiteralShared {
                text,
                regex,
                current: Mutex::new(Highlight::NONE),
                sink,
            }),
            queue: TaskQueue::new("literal"),
        }
    }
}

impl LiteralShared {
    fn step(&self, backward: bool) {
        let hit = self.regex.as_ref().and_then(|regex| {
            let pos = self.current.lock().position;
            if backward {
                engine::find_before(regex, &self.text, pos)
                    .or_else(|| engine::find_before(regex, &self.text, isize::MAX))
            } else {
                engine::find_after(regex, &self.text, pos)
                    .or_else(|| engine::find_after(regex, &self.text, -1))
            }
        });
        self.publish(hit);
    }

    fn publish(&self, hit: Option<SearchMatch>) {
        let highlight = hit.map(Highlight::from).unwrap_or(Highlight::NONE);
        *self.current.lock() = highlight;
        self.sink.on_match(highlight);
    }
}

impl Searcher for LiteralSearcher {
    fn find_next(&self) {
        let shared = Arc::clone(&self.shared);
        self.queue.submit(move || shared.step(false));
    }

    fn find_prev(&self) {
        let shared = Arc::clone(&self.shared);
        self.queue.submit(move || shared.step(true));
    }

    fn position(&self) -> isize {
        self.shared.current.lock().position
    }

    fn match_length(&self) -> usize {
        self.shared.current.lock().length
    }
}

/// Regex search that indexes the whole snapshot up front.
///
/// One background scan collects every non-overlapping match; navigation
/// afterwards is a constant-time cursor move around the index. Construction
/// counts as the first reveal: the state at the first match (or the
/// no-match state) is reported as soon as the scan completes, before any
/// navigation result.
pub struct RegexSearcher {
    shared: Arc<RegexShared>,
    queue: TaskQueue,
}

struct RegexShared {
    ring: Mutex<Option<MatchRing>>,
    scanned: flume::Receiver<MatchRing>,
    current: Mutex<Highlight>,
    sink: Arc<dyn HighlightSink>,
}

impl RegexSearcher {
    /// Compiles `pattern` and kicks off the index scan.
    ///
    /// Fails synchronously on a syntax error; nothing is spawned in that
    /// case.
    pub fn new(
        snapshot: impl Into<Arc<str>>,
        pattern: &str,
        case_sensitive: bool,
        sink: impl HighlightSink,
    ) -> Result<Self, PatternSyntaxError> {
        let config = SearchConfig {
            case_sensitive,
            mode: SearchMode::Regex,
        };
        let regex = engine::compile(pattern, &config)?;
        Ok(Self::assemble(snapshot.into(), regex, Arc::new(sink)))
    }

    pub(crate) fn assemble(text: Arc<str>, regex: Regex, sink: Arc<dyn HighlightSink>) -> Self {
        let (scan_tx, scan_rx) = flume::bounded(1);
        let shared = Arc::new(RegexShared {
            ring: Mutex::new(None),
            scanned: scan_rx,
            current: Mutex::new(Highlight::CLEAR),
            sink,
        });

        // One-shot scan, off the navigation queue. The reveal is sent before
        // the ring is handed over, so it precedes every navigation report.
        let scan_shared = Arc::clone(&shared);
        let scan = thread::Builder::new()
            .name("search-scan".to_string())
            .spawn(move || {
                let ring = MatchRing::new(engine::scan_matches(&regex, &text));
                log::debug!("search indexed {} occurrence(s)", ring.len());

                let reveal = ring.current().map(Highlight::from).unwrap_or(Highlight::CLEAR);
                *scan_shared.current.lock() = reveal;
                scan_shared.sink.on_match(reveal);
                let _ = scan_tx.send(ring);
            });
        if let Err(err) = scan {
            log::error!("failed to spawn index scan: {err}");
        }

        Self {
            shared,
            queue: TaskQueue::new("regex"),
        }
    }
}

impl RegexShared {
    /// Runs one cursor move against the ring, first waiting for the scan to
    /// hand it over if it is still running. Runs on the queue worker, so the
    /// wait never blocks the caller and FIFO order is preserved.
    fn navigate(&self, step: impl FnOnce(&mut MatchRing) -> Option<SearchMatch>) {
        let mut slot = self.ring.lock();
        if slot.is_none() {
            // A dead scan thread counts as an empty index.
            *slot = Some(self.scanned.recv().unwrap_or_default());
        }
        let Some(ring) = slot.as_mut() else { return };

        let highlight = step(ring).map(Highlight::from).unwrap_or(Highlight::CLEAR);
        *self.current.lock() = highlight;
        self.sink.on_match(highlight);
    }
}

impl Searcher for RegexSearcher {
    fn find_next(&self) {
        let shared = Arc::clone(&self.shared);
        self.queue.submit(move || shared.navigate(|ring| ring.advance()));
    }

    fn find_prev(&self) {
        let shared = Arc::clone(&self.shared);
        self.queue.submit(move || shared.navigate(|ring| ring.retreat()));
    }

    fn position(&self) -> isize {
        self.shared.current.lock().position
    }

    fn match_length(&self) -> usize {
        self.shared.current.lock().length
    }
}
