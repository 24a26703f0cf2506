use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::{self, PatternSyntaxError, SearchConfig, SearchMode};
use crate::highlight::{Highlight, HighlightSink};
use crate::searcher::{InactiveSearcher, LiteralSearcher, RegexSearcher, Searcher};

/// Owns the active [`Searcher`] for one host view.
///
/// Every search start replaces the previous searcher wholesale. A superseded
/// searcher's worker may still drain queued steps; those reports carry a
/// stale epoch and are dropped before they reach the host sink.
pub struct SearchSession {
    sink: Arc<dyn HighlightSink>,
    epoch: Arc<AtomicU64>,
    searcher: Box<dyn Searcher>,
}

impl SearchSession {
    /// A session with no active search; navigation is a harmless no-op.
    pub fn new(sink: impl HighlightSink) -> Self {
        Self {
            sink: Arc::new(sink),
            epoch: Arc::new(AtomicU64::new(0)),
            searcher: Box::new(InactiveSearcher),
        }
    }

    /// Start a search over `snapshot`, superseding the previous one.
    ///
    /// An invalid regex pattern fails here, synchronously, and leaves the
    /// previous search active and observable.
    pub fn start_search(
        &mut self,
        snapshot: &str,
        pattern: &str,
        config: SearchConfig,
    ) -> Result<(), PatternSyntaxError> {
        self.searcher = match config.mode {
            SearchMode::Regex => {
                // Validate before retiring the current search.
                let regex = engine::compile(pattern, &config)?;
                Box::new(RegexSearcher::assemble(
                    Arc::from(snapshot),
                    regex,
                    self.supersede(),
                ))
            }
            SearchMode::Literal => {
                let regex = if pattern.is_empty() {
                    None
                } else {
                    engine::compile(pattern, &config).ok()
                };
                Box::new(LiteralSearcher::assemble(
                    Arc::from(snapshot),
                    regex,
                    self.supersede(),
                ))
            }
        };
        Ok(())
    }

    /// Drop the active search and go back to the inactive placeholder.
    pub fn clear(&mut self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.searcher = Box::new(InactiveSearcher);
    }

    pub fn find_next(&self) {
        self.searcher.find_next();
    }

    pub fn find_prev(&self) {
        self.searcher.find_prev();
    }

    /// Offset of the current occurrence reported by the active search.
    pub fn position(&self) -> isize {
        self.searcher.position()
    }

    /// Length of the current occurrence reported by the active search.
    pub fn match_length(&self) -> usize {
        self.searcher.match_length()
    }

    /// Retire the current epoch and mint the sink for the next searcher.
    fn supersede(&self) -> Arc<dyn HighlightSink> {
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        Arc::new(EpochSink {
            epoch,
            current: Arc::clone(&self.epoch),
            inner: Arc::clone(&self.sink),
        })
    }
}

/// Tags every report with its search's epoch and drops stale ones.
struct EpochSink {
    epoch: u64,
    current: Arc<AtomicU64>,
    inner: Arc<dyn HighlightSink>,
}

impl HighlightSink for EpochSink {
    fn on_match(&self, highlight: Highlight) {
        if self.current.load(Ordering::Acquire) == self.epoch {
            self.inner.on_match(highlight);
        } else {
            log::trace!("dropping highlight from a superseded search");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recv(rx: &flume::Receiver<Highlight>) -> Highlight {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("timed out waiting for a highlight")
    }

    fn regex_config() -> SearchConfig {
        SearchConfig {
            case_sensitive: true,
            mode: SearchMode::Regex,
        }
    }

    #[test]
    fn session_starts_inactive() {
        let (tx, rx) = flume::unbounded();
        let session = SearchSession::new(tx);

        session.find_next();
        session.find_prev();

        assert_eq!(session.position(), 0);
        assert_eq!(session.match_length(), 0);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn literal_search_through_session() {
        let (tx, rx) = flume::unbounded();
        let mut session = SearchSession::new(tx);

        session
            .start_search("ababab", "ab", SearchConfig::default())
            .unwrap();
        session.find_next();

        assert_eq!(
            recv(&rx),
            Highlight {
                position: 0,
                length: 2
            }
        );
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn regex_search_through_session_reveals_and_navigates() {
        let (tx, rx) = flume::unbounded();
        let mut session = SearchSession::new(tx);

        session
            .start_search("cat dog cat", "c.t", regex_config())
            .unwrap();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 0,
                length: 3
            }
        );

        session.find_prev();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 8,
                length: 3
            }
        );
    }

    #[test]
    fn invalid_regex_keeps_previous_search_active() {
        let (tx, rx) = flume::unbounded();
        let mut session = SearchSession::new(tx);

        session
            .start_search("ababab", "ab", SearchConfig::default())
            .unwrap();
        session.find_next();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 0,
                length: 2
            }
        );

        assert!(
            session
                .start_search("ababab", "[invalid", regex_config())
                .is_err()
        );

        // The literal search is still the active one and keeps reporting.
        session.find_next();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 2,
                length: 2
            }
        );
    }

    #[test]
    fn clear_reverts_to_inactive() {
        let (tx, rx) = flume::unbounded();
        let mut session = SearchSession::new(tx);

        session
            .start_search("ababab", "ab", SearchConfig::default())
            .unwrap();
        session.clear();

        session.find_next();
        assert_eq!(session.position(), 0);
        assert_eq!(session.match_length(), 0);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn stale_epoch_reports_are_dropped() {
        let (tx, rx) = flume::unbounded();
        let current = Arc::new(AtomicU64::new(1));
        let sink = EpochSink {
            epoch: 1,
            current: Arc::clone(&current),
            inner: Arc::new(tx),
        };

        sink.on_match(Highlight {
            position: 3,
            length: 1,
        });
        assert_eq!(
            rx.try_recv(),
            Ok(Highlight {
                position: 3,
                length: 1
            })
        );

        // Superseded: same sink, newer current epoch.
        current.store(2, Ordering::Release);
        sink.on_match(Highlight {
            position: 5,
            length: 1,
        });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn restarting_replaces_the_previous_search() {
        let (tx, rx) = flume::unbounded();
        let mut session = SearchSession::new(tx);

        session
            .start_search("cat dog cat", "c.t", regex_config())
            .unwrap();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 0,
                length: 3
            }
        );

        session
            .start_search("ababab", "ab", SearchConfig::default())
            .unwrap();
        session.find_next();
        assert_eq!(
            recv(&rx),
            Highlight {
                position: 0,
                length: 2
            }
        );
    }
}
