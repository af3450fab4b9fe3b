pub mod watched;

pub use watched::{WatchedEntry, WatchedList, WatchedSummary};
