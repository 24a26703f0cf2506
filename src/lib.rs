//! Asynchronous pattern search with cyclic forward/backward navigation.
//!
//! A search runs over an immutable snapshot of a document, taken when the
//! search starts. Two strategies implement the same [`Searcher`] contract:
//! [`LiteralSearcher`] re-scans the snapshot on every step, while
//! [`RegexSearcher`] indexes every match up front and navigates in constant
//! time. Navigation is asynchronous: each searcher serializes its steps on a
//! dedicated worker, so results always arrive in the order the requests were
//! issued, and reports them through a [`HighlightSink`] — typically a
//! [`flume`] channel the host drains from its UI loop. [`SearchSession`]
//! manages the strategy lifecycle for a host view and drops reports from
//! superseded searches.

mod engine;
mod highlight;
mod matcher;
mod queue;
mod searcher;
mod session;

pub use engine::{PatternSyntaxError, SearchConfig, SearchMode};
pub use highlight::{Highlight, HighlightSink};
pub use matcher::{MatchRing, SearchMatch};
pub use searcher::{InactiveSearcher, LiteralSearcher, RegexSearcher, Searcher};
pub use session::SearchSession;
