//! Corpus read interface and the snapshot-backed implementation

pub mod snapshot;
pub mod traits;

pub use snapshot::CorpusSnapshot;
pub use traits::{CalendarCycle, CalendarRecord, CalendarSource, Corpus, HistoryLog, HistoryQuery};
